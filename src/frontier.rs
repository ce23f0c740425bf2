use std::collections::HashMap;
use std::hash::Hash;

/// Min-priority queue with membership test and key decrease.
///
/// Backed by a binary heap stored in a `Vec`, plus a map from value to its slot in the heap.
/// Equal priorities never swap, so the pop order only depends on the insertion sequence.
#[derive(Debug, Clone)]
pub struct Frontier<V, P>
where
    V: Eq + Hash,
{
    heap: Vec<(V, P)>,
    positions: HashMap<V, usize>,
}

impl<V, P> Default for Frontier<V, P>
where
    V: Eq + Hash,
{
    fn default() -> Frontier<V, P> {
        Frontier {
            heap: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<V, P> Frontier<V, P>
where
    V: Eq + Hash + Copy,
    P: Ord + Copy,
{
    /// Inserts `value` with `priority`. Returns false if the value is already queued.
    pub fn push(&mut self, value: V, priority: P) -> bool {
        if self.positions.contains_key(&value) {
            return false;
        }
        let index = self.heap.len();
        self.heap.push((value, priority));
        self.positions.insert(value, index);
        self.swim(index);
        true
    }

    pub fn pop_min(&mut self) -> Option<V> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (value, _) = self.heap.pop()?;
        self.positions.remove(&value);
        if !self.heap.is_empty() {
            self.sink(0);
        }
        Some(value)
    }

    #[inline]
    pub fn contains(&self, value: &V) -> bool {
        self.positions.contains_key(value)
    }

    /// Lowers the priority of a queued value. Returns false when the value is not queued or the
    /// new priority is not lower than the current one.
    pub fn decrease_priority(&mut self, value: &V, priority: P) -> bool {
        let Some(&index) = self.positions.get(value) else {
            return false;
        };
        if self.heap[index].1 <= priority {
            return false;
        }
        self.heap[index].1 = priority;
        self.swim(index);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn swim(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].1 >= self.heap[parent].1 {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sink(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right].1 < self.heap[left].1 {
                right
            } else {
                left
            };
            if self.heap[child].1 >= self.heap[index].1 {
                break;
            }
            self.swap(index, child);
            index = child;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].0, a);
        self.positions.insert(self.heap[b].0, b);
    }
}
