use std::ops::{Index, IndexMut, Range};

use super::cursor::{PoolCursor, Selector};
use super::object::{GameObject, ObjectState};

/// Fixed-capacity array of game objects.
///
/// Slots are never added, removed or reordered after construction, so an
/// index identifies the same slot for the lifetime of the pool. The wire
/// format relies on this.
#[derive(Debug, Clone)]
pub struct Pool {
    slots: Box<[GameObject]>,
}

impl Pool {
    pub fn new(slots: Vec<GameObject>) -> Self {
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    pub fn filled(capacity: usize, template: GameObject) -> Self {
        Self::new(vec![template; capacity])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GameObject> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut GameObject> {
        self.slots.get_mut(index)
    }

    pub fn as_slice(&self) -> &[GameObject] {
        &self.slots
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.slots.iter_mut()
    }

    /// Claims the first inactive slot, marking it active.
    pub fn claim(&mut self) -> Option<usize> {
        self.claim_in(0..self.slots.len())
    }

    /// Claims the first inactive slot inside `range`.
    pub fn claim_in(&mut self, range: Range<usize>) -> Option<usize> {
        let end = range.end.min(self.slots.len());
        let index = (range.start..end).find(|&i| self.slots[i].state == ObjectState::Inactive)?;
        self.slots[index].state = ObjectState::Active;
        Some(index)
    }

    pub fn cursor(&self, selector: Selector) -> PoolCursor {
        PoolCursor::new(self, selector)
    }

    /// Borrowing iterator over the slots matching `selector`, yielding
    /// `(index, object)` in ascending index order.
    pub fn selected(&self, selector: Selector) -> Selected<'_> {
        Selected {
            pool: self,
            cursor: self.cursor(selector),
        }
    }

    pub fn count(&self, selector: Selector) -> usize {
        self.selected(selector).count()
    }
}

impl Index<usize> for Pool {
    type Output = GameObject;

    fn index(&self, index: usize) -> &GameObject {
        &self.slots[index]
    }
}

impl IndexMut<usize> for Pool {
    fn index_mut(&mut self, index: usize) -> &mut GameObject {
        &mut self.slots[index]
    }
}

pub struct Selected<'a> {
    pool: &'a Pool,
    cursor: PoolCursor,
}

impl<'a> Iterator for Selected<'a> {
    type Item = (usize, &'a GameObject);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.current_index()?;
        self.cursor.advance(self.pool);
        Some((index, &self.pool.slots[index]))
    }
}
