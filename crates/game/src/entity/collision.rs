use super::cursor::{PoolCursor, Selector};
use super::pool::Pool;

/// Flattened nested loop over two cursors, used to enumerate candidate
/// collision pairs (e.g. upward bullets against live aliens).
///
/// For each outer object the inner cursor sweeps its whole selection before
/// the outer cursor moves on. Callers test the current pair, mutate either
/// pool on a hit, and then call [`CollisionCursor::advance`].
#[derive(Debug, Clone, Copy)]
pub struct CollisionCursor {
    outer: PoolCursor,
    inner: PoolCursor,
}

impl CollisionCursor {
    pub fn new(outer: &Pool, outer_selector: Selector, inner: &Pool, inner_selector: Selector) -> Self {
        Self {
            outer: outer.cursor(outer_selector),
            inner: inner.cursor(inner_selector),
        }
    }

    /// True once either side has nothing left to pair.
    pub fn reached_end(&self) -> bool {
        self.outer.at_end() || self.inner.at_end()
    }

    pub fn current_pair(&self) -> Option<(usize, usize)> {
        Some((self.outer.current_index()?, self.inner.current_index()?))
    }

    pub fn advance(&mut self, outer: &Pool, inner: &Pool) {
        if self.outer.at_end() {
            return;
        }

        // The outer object was consumed by the caller (e.g. the bullet hit
        // something); pairing it with the remaining inner objects is moot.
        if !self.outer.current_matches(outer) {
            self.outer.advance(outer);
            self.inner.reset(inner);
            return;
        }

        self.inner.advance(inner);
        if self.inner.at_end() {
            self.inner.reset(inner);
            self.outer.advance(outer);
        }
    }
}
