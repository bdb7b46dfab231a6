use super::PriorityQueue;
use crate::node::OpenEntry;
use std::collections::BTreeMap;
use std::iter;

#[derive(Clone, Debug)]
struct Link<T> {
    item: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A sorted doubly linked list with a coarse index into it.
///
/// Every item falls into a bucket computed by `bucket_of`; the index maps each
/// non-empty bucket to the first (smallest) link in it. Insertion starts scanning at
/// the nearest indexed bucket at or below its own instead of at the head, and popping
/// the minimum is a constant-time unlink of the head.
///
/// `bucket_of` must be monotone with the ordering: `a < b` implies
/// `bucket_of(a) <= bucket_of(b)`.
///
/// Links live in an arena and freed slots are recycled, so a list that is cleared and
/// refilled every search stops allocating once it has seen its largest search.
#[derive(Clone, Debug)]
pub struct IndexedLinkedList<T, F = fn(&T) -> usize> {
    links: Vec<Link<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    index: BTreeMap<usize, usize>,
    bucket_of: F,
    len: usize,
}

impl IndexedLinkedList<OpenEntry> {
    /// Buckets entries by [OpenEntry::bucket].
    pub fn for_open_entries() -> IndexedLinkedList<OpenEntry> {
        IndexedLinkedList::new(OpenEntry::bucket)
    }
}

impl Default for IndexedLinkedList<OpenEntry> {
    fn default() -> IndexedLinkedList<OpenEntry> {
        IndexedLinkedList::for_open_entries()
    }
}

impl<T: Ord, F: Fn(&T) -> usize> IndexedLinkedList<T, F> {
    pub fn new(bucket_of: F) -> IndexedLinkedList<T, F> {
        IndexedLinkedList {
            links: Vec::new(),
            free: Vec::new(),
            head: None,
            index: BTreeMap::new(),
            bucket_of,
            len: 0,
        }
    }

    /// Iterates the items from smallest to largest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        iter::successors(self.head, move |&slot| self.links[slot].next)
            .map(move |slot| self.item(slot))
    }

    /// Number of distinct buckets currently indexed.
    pub fn indexed_buckets(&self) -> usize {
        self.index.len()
    }

    fn item(&self, slot: usize) -> &T {
        self.links[slot]
            .item
            .as_ref()
            .expect("linked slot without an item")
    }

    fn allocate(&mut self, item: T) -> usize {
        let link = Link {
            item: Some(item),
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.links[slot] = link;
                slot
            }
            None => {
                self.links.push(link);
                self.links.len() - 1
            }
        }
    }

    fn link_after(&mut self, cursor: usize, slot: usize) {
        let next = self.links[cursor].next;
        self.links[slot].prev = Some(cursor);
        self.links[slot].next = next;
        self.links[cursor].next = Some(slot);
        if let Some(next) = next {
            self.links[next].prev = Some(slot);
        }
    }

    fn link_before(&mut self, cursor: usize, slot: usize) {
        let prev = self.links[cursor].prev;
        self.links[slot].prev = prev;
        self.links[slot].next = Some(cursor);
        self.links[cursor].prev = Some(slot);
        match prev {
            Some(prev) => self.links[prev].next = Some(slot),
            None => self.head = Some(slot),
        }
    }
}

impl<T: Ord, F: Fn(&T) -> usize> PriorityQueue<T> for IndexedLinkedList<T, F> {
    fn push(&mut self, item: T) {
        let bucket = (self.bucket_of)(&item);
        let start = self
            .index
            .range(..=bucket)
            .next_back()
            .map(|(_, &slot)| slot);
        let slot = self.allocate(item);
        match start {
            Some(mut cursor) if self.item(cursor) <= self.item(slot) => {
                // Equal items stay in insertion order.
                while let Some(next) = self.links[cursor].next {
                    if self.item(next) > self.item(slot) {
                        break;
                    }
                    cursor = next;
                }
                self.link_after(cursor, slot);
            }
            // Smaller than the first item of its own bucket.
            Some(cursor) => self.link_before(cursor, slot),
            // Smaller than every bucket in the list.
            None => match self.head {
                Some(head) => self.link_before(head, slot),
                None => self.head = Some(slot),
            },
        }
        let becomes_first = match self.index.get(&bucket) {
            Some(&first) => self.item(slot) < self.item(first),
            None => true,
        };
        if becomes_first {
            self.index.insert(bucket, slot);
        }
        self.len += 1;
    }

    fn pop(&mut self) -> T {
        let head = self.head.expect("pop on an empty IndexedLinkedList");
        let next = self.links[head].next;
        let item = self.links[head]
            .item
            .take()
            .expect("linked slot without an item");
        self.head = next;
        if let Some(next) = next {
            self.links[next].prev = None;
        }
        let bucket = (self.bucket_of)(&item);
        if self.index.get(&bucket) == Some(&head) {
            match next {
                Some(next) if (self.bucket_of)(self.item(next)) == bucket => {
                    self.index.insert(bucket, next);
                }
                _ => {
                    self.index.remove(&bucket);
                }
            }
        }
        self.free.push(head);
        self.len -= 1;
        item
    }

    fn peek(&self) -> &T {
        let head = self.head.expect("peek on an empty IndexedLinkedList");
        self.item(head)
    }

    fn clear(&mut self) {
        self.links.clear();
        self.free.clear();
        self.head = None;
        self.index.clear();
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }
}
