use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry. `BinaryHeap` is a max-heap, so `Ord` is reversed: the lowest
/// priority, then the earliest insertion, compares greatest.
struct Entry<T> {
    priority: f64,
    sequence: u64,
    value: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority queue over `(priority, value)` pairs. Neither priorities nor
/// values need to be unique.
pub struct OpenList<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> Default for OpenList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OpenList<T> {
    pub fn new() -> Self {
        OpenList {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn insert(&mut self, priority: f64, value: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            priority,
            sequence,
            value,
        });
    }

    /// Removes the value with the smallest priority.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty. Callers check `is_empty` first.
    pub fn remove_min(&mut self) -> T {
        match self.heap.pop() {
            Some(entry) => entry.value,
            None => panic!("remove_min called on an empty open list"),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }

    /// Live values in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.iter().map(|e| &e.value)
    }
}
