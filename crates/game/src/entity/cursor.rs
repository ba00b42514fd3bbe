use super::object::{GameObject, Heading, ObjectState};
use super::pool::Pool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    AnyActive,
    ActiveTowardPlayer,
    ActiveTowardEnemies,
}

impl Selector {
    #[inline]
    pub fn matches(self, object: &GameObject) -> bool {
        if object.state != ObjectState::Active {
            return false;
        }
        match self {
            Self::AnyActive => true,
            Self::ActiveTowardPlayer => object.heading == Heading::TowardPlayer,
            Self::ActiveTowardEnemies => object.heading == Heading::TowardEnemies,
        }
    }
}

/// Cursor over the slots of a [`Pool`] that satisfy a [`Selector`].
///
/// The cursor does not borrow the pool; every movement takes it again, so the
/// caller is free to mutate slots between steps. The selector is re-evaluated
/// at every position, which means slots deactivated behind the caller's back
/// are skipped rather than visited.
#[derive(Debug, Clone, Copy)]
pub struct PoolCursor {
    selector: Selector,
    size: usize,
    index: usize,
}

impl PoolCursor {
    pub fn new(pool: &Pool, selector: Selector) -> Self {
        let mut cursor = Self {
            selector,
            size: pool.len(),
            index: 0,
        };
        cursor.reset(pool);
        cursor
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.index >= self.size
    }

    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        (!self.at_end()).then_some(self.index)
    }

    /// Whether the slot under the cursor still satisfies the selector.
    pub fn current_matches(&self, pool: &Pool) -> bool {
        self.current_index()
            .and_then(|i| pool.get(i))
            .is_some_and(|object| self.selector.matches(object))
    }

    pub fn advance(&mut self, pool: &Pool) {
        if self.at_end() {
            return;
        }
        self.seek(pool, self.index + 1);
    }

    pub fn reset(&mut self, pool: &Pool) {
        self.seek(pool, 0);
    }

    fn seek(&mut self, pool: &Pool, from: usize) {
        let slots = pool.as_slice();
        let end = self.size.min(slots.len());
        self.index = (from..end)
            .find(|&i| self.selector.matches(&slots[i]))
            .unwrap_or(self.size);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::entity::ObjectKind;

    fn pool_with(states: &[(ObjectState, Heading)]) -> Pool {
        let slots = states
            .iter()
            .map(|&(state, heading)| {
                let mut object = GameObject::vacant(ObjectKind::Bullet, Vec2::ONE);
                object.state = state;
                object.heading = heading;
                object
            })
            .collect();
        Pool::new(slots)
    }

    fn visit(pool: &Pool, selector: Selector) -> Vec<usize> {
        let mut cursor = pool.cursor(selector);
        let mut seen = Vec::new();
        while let Some(i) = cursor.current_index() {
            seen.push(i);
            cursor.advance(pool);
        }
        seen
    }

    #[test]
    fn selectors_filter_by_heading() {
        use Heading::*;
        use ObjectState::*;
        let pool = pool_with(&[
            (Active, TowardEnemies),
            (Active, TowardPlayer),
            (Inactive, TowardEnemies),
            (Dead, TowardPlayer),
            (Active, TowardEnemies),
        ]);

        assert_eq!(visit(&pool, Selector::AnyActive), vec![0, 1, 4]);
        assert_eq!(visit(&pool, Selector::ActiveTowardEnemies), vec![0, 4]);
        assert_eq!(visit(&pool, Selector::ActiveTowardPlayer), vec![1]);
    }

    #[test]
    fn empty_selection_starts_at_end() {
        let pool = pool_with(&[(ObjectState::Inactive, Heading::TowardPlayer); 3]);
        let cursor = pool.cursor(Selector::AnyActive);
        assert!(cursor.at_end());
        assert_eq!(cursor.current_index(), None);

        let empty = Pool::new(Vec::new());
        assert!(empty.cursor(Selector::AnyActive).at_end());
    }

    #[test]
    fn advance_past_end_is_noop() {
        let pool = pool_with(&[(ObjectState::Active, Heading::TowardPlayer)]);
        let mut cursor = pool.cursor(Selector::AnyActive);
        cursor.advance(&pool);
        assert!(cursor.at_end());
        cursor.advance(&pool);
        assert!(cursor.at_end());
    }

    #[test]
    fn reset_rewinds_and_sees_mutations() {
        let mut pool = pool_with(&[
            (ObjectState::Active, Heading::TowardPlayer),
            (ObjectState::Active, Heading::TowardPlayer),
        ]);
        let mut cursor = pool.cursor(Selector::AnyActive);
        cursor.advance(&pool);
        assert_eq!(cursor.current_index(), Some(1));

        pool[0].state = ObjectState::Dead;
        cursor.reset(&pool);
        assert_eq!(cursor.current_index(), Some(1));
    }

    #[test]
    fn skips_slots_deactivated_ahead() {
        let mut pool = pool_with(&[(ObjectState::Active, Heading::TowardPlayer); 3]);
        let mut cursor = pool.cursor(Selector::AnyActive);

        pool[1].state = ObjectState::Inactive;
        assert!(cursor.current_matches(&pool));
        cursor.advance(&pool);
        assert_eq!(cursor.current_index(), Some(2));
    }
}
