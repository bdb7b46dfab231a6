//! Open lists: min-priority queues ordered by the items' [Ord] implementation.
use crate::node::OpenEntry;

pub mod binary_heap;
pub mod indexed_linked_list;

pub use binary_heap::BinaryMinHeap;
pub use indexed_linked_list::IndexedLinkedList;

/// A min-priority queue. [pop](Self::pop) and [peek](Self::peek) panic on an empty
/// queue; callers are expected to check [is_empty](Self::is_empty) first.
pub trait PriorityQueue<T> {
    fn push(&mut self, item: T);
    /// Removes and returns the smallest item.
    fn pop(&mut self) -> T;
    /// Returns the smallest item without removing it.
    fn peek(&self) -> &T;
    /// Removes all items, keeping allocated capacity for reuse.
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, Q: PriorityQueue<T> + ?Sized> PriorityQueue<T> for Box<Q> {
    fn push(&mut self, item: T) {
        (**self).push(item)
    }
    fn pop(&mut self) -> T {
        (**self).pop()
    }
    fn peek(&self) -> &T {
        (**self).peek()
    }
    fn clear(&mut self) {
        (**self).clear()
    }
    fn len(&self) -> usize {
        (**self).len()
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Selects an open list implementation from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpenListKind {
    /// O(log n) push and pop.
    #[default]
    BinaryHeap,
    /// O(1) pop, push scans from the nearest cost bucket.
    IndexedLinkedList,
}

impl OpenListKind {
    pub fn build(self) -> Box<dyn PriorityQueue<OpenEntry> + Send> {
        match self {
            OpenListKind::BinaryHeap => Box::new(BinaryMinHeap::new()),
            OpenListKind::IndexedLinkedList => Box::new(IndexedLinkedList::for_open_entries()),
        }
    }
}
