use super::PriorityQueue;

/// Array-backed binary min-heap. The sift loops keep their indices on the stack, so a
/// heap holds no scratch state between calls.
#[derive(Clone, Debug)]
pub struct BinaryMinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> BinaryMinHeap<T> {
    pub fn new() -> BinaryMinHeap<T> {
        BinaryMinHeap { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> BinaryMinHeap<T> {
        BinaryMinHeap {
            items: Vec::with_capacity(capacity),
        }
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.items[child] >= self.items[parent] {
                break;
            }
            self.items.swap(child, parent);
            child = parent;
        }
    }

    fn sift_down(&mut self, mut parent: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * parent + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len && self.items[right] < self.items[left] {
                right
            } else {
                left
            };
            if self.items[smallest] >= self.items[parent] {
                break;
            }
            self.items.swap(smallest, parent);
            parent = smallest;
        }
    }
}

impl<T: Ord> Default for BinaryMinHeap<T> {
    fn default() -> BinaryMinHeap<T> {
        BinaryMinHeap::new()
    }
}

impl<T: Ord> PriorityQueue<T> for BinaryMinHeap<T> {
    fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    fn pop(&mut self) -> T {
        assert!(!self.items.is_empty(), "pop on an empty BinaryMinHeap");
        // The last leaf takes the root's place and sinks back down.
        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        top
    }

    fn peek(&self) -> &T {
        self.items.first().expect("peek on an empty BinaryMinHeap")
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
