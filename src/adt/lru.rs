/*!

A least-recently-used doubly-linked list over a fixed array of nodes.

The list starts empty and grows until all `N` nodes are constructed; after that, adding a value
recycles the node at the tail (the least recently used) after handing its payload to an evictor.
Nodes link to one another by index so the structure owns no pointers and performs no allocation.

!*/

/// A handle to a node in an [`LruList`]. Returned by [`LruList::add`] and accepted by
/// [`LruList::touch`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeRef(usize);

#[derive(Clone, Debug)]
struct Node<T> {
    value: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A fixed-capacity LRU list of at most `N` values. `N` must be greater than 1.
#[derive(Clone, Debug)]
pub struct LruList<T, const N: usize> {
    nodes: [Node<T>; N],
    first: Option<usize>,
    last: Option<usize>,
    len: usize,
}

impl<T, const N: usize> Default for LruList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> LruList<T, N> {
    const CAPACITY_OK: () = assert!(N > 1);

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::CAPACITY_OK;
        Self {
            nodes: std::array::from_fn(|_| Node {
                value: None,
                prev: None,
                next: None,
            }),
            first: None,
            last: None,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        for node in self.nodes.iter_mut() {
            node.value = None;
            node.prev = None;
            node.next = None;
        }
        self.first = None;
        self.last = None;
        self.len = 0;
    }

    /// The payload of a node.
    pub fn value(&self, node: NodeRef) -> &T {
        self.nodes[node.0].value.as_ref().expect("node is constructed")
    }

    pub fn value_mut(&mut self, node: NodeRef) -> &mut T {
        self.nodes[node.0].value.as_mut().expect("node is constructed")
    }

    /// Moves a node to the front of the list as the most recently used.
    pub fn touch(&mut self, node: NodeRef) {
        debug_assert!(self.first.is_some() && self.last.is_some());
        let n = node.0;
        if self.first == Some(n) {
            return;
        }
        // Unhook the node from the list in its current position.
        if self.last == Some(n) {
            self.last = self.nodes[n].prev;
        }
        if let Some(next) = self.nodes[n].next {
            self.nodes[next].prev = self.nodes[n].prev;
        }
        if let Some(prev) = self.nodes[n].prev {
            self.nodes[prev].next = self.nodes[n].next;
        }
        // Push it on the front.
        self.nodes[n].prev = None;
        self.nodes[n].next = self.first;
        if let Some(first) = self.first {
            self.nodes[first].prev = Some(n);
        }
        self.first = Some(n);
        self.check_invariants();
    }

    /// Adds a value at the front. While the list has unconstructed nodes, the next one is used;
    /// once the list is full the tail node's payload is passed to `evictor` and the node is
    /// recycled for the new value.
    pub fn add(&mut self, payload: T, mut evictor: impl FnMut(&mut T)) -> NodeRef {
        let result;
        if self.len < N {
            result = self.len;
            self.nodes[result].value = Some(payload);
            self.len += 1;
            if self.last.is_none() {
                self.last = Some(result);
            }
        } else {
            debug_assert!(self.first.is_some() && self.last.is_some());
            // The list is full so the last item must be evicted.
            let last = self.last.expect("a full list has a tail");
            let lru_value = self.nodes[last].value.as_mut().expect("tail is constructed");
            evictor(lru_value);
            *lru_value = payload;
            // Unhook the recycled node from the tail.
            result = last;
            let prev = self.nodes[last].prev.expect("a full list has >= 2 nodes");
            self.last = Some(prev);
            self.nodes[prev].next = None;
        }

        self.nodes[result].prev = None;
        self.nodes[result].next = self.first;
        if let Some(first) = self.first {
            debug_assert!(self.nodes[first].prev.is_none());
            self.nodes[first].prev = Some(result);
        }
        self.first = Some(result);
        self.check_invariants();
        NodeRef(result)
    }

    /// Visits the payloads from the most recently used to the least.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut cursor = self.first;
        std::iter::from_fn(move || {
            let n = cursor?;
            cursor = self.nodes[n].next;
            self.nodes[n].value.as_ref()
        })
    }

    fn check_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(
                self.first.is_none(),
                self.len == 0,
                "first must be none if and only if the container is empty"
            );
            assert_eq!(
                self.first == self.last,
                self.len < 2,
                "with < 2 members, first and last must be equal"
            );
            if let Some(first) = self.first {
                assert!(self.nodes[first].prev.is_none(), "prev of the first element must be none");
            }
            if let Some(last) = self.last {
                assert!(self.nodes[last].next.is_none(), "next of the last element must be none");
            }
            let mut prev: Option<usize> = None;
            let mut count = 0usize;
            let mut cursor = self.first;
            while let Some(n) = cursor {
                assert_eq!(self.nodes[n].prev, prev, "next and prev pointers are inconsistent");
                prev = Some(n);
                count += 1;
                cursor = self.nodes[n].next;
            }
            assert_eq!(self.last, prev, "the last pointer is not correct");
            assert_eq!(count, self.len, "the chain length does not match len");
        }
    }
}

#[cfg(test)]
mod lru_tests {
    use super::*;

    fn contents<const N: usize>(list: &LruList<u32, N>) -> Vec<u32> {
        list.iter().copied().collect()
    }

    #[test]
    fn add_until_full_then_recycle() {
        let mut evicted: Vec<u32> = Vec::new();
        let mut list = LruList::<u32, 3>::new();
        list.add(1, |_| unreachable!());
        list.add(2, |_| unreachable!());
        list.add(3, |_| unreachable!());
        assert_eq!(contents(&list), vec![3, 2, 1]);
        // Full: adding 4 evicts 1 from the tail.
        list.add(4, |v| evicted.push(*v));
        assert_eq!(evicted, vec![1]);
        assert_eq!(contents(&list), vec![4, 3, 2]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn touch_moves_to_front() {
        let mut list = LruList::<u32, 3>::new();
        let a = list.add(1, |_| ());
        let _b = list.add(2, |_| ());
        let _c = list.add(3, |_| ());
        list.touch(a);
        assert_eq!(contents(&list), vec![1, 3, 2]);
        // Touching the front is a no-op.
        list.touch(a);
        assert_eq!(contents(&list), vec![1, 3, 2]);
    }

    #[test]
    fn touch_changes_eviction_order() {
        let mut evicted: Vec<u32> = Vec::new();
        let mut list = LruList::<u32, 3>::new();
        let a = list.add(1, |_| ());
        list.add(2, |_| ());
        list.add(3, |_| ());
        list.touch(a);
        // 2 is now least recently used.
        list.add(4, |v| evicted.push(*v));
        assert_eq!(evicted, vec![2]);
        assert_eq!(contents(&list), vec![4, 1, 3]);
    }

    #[test]
    fn touch_middle_node() {
        let mut list = LruList::<u32, 4>::new();
        list.add(1, |_| ());
        let b = list.add(2, |_| ());
        list.add(3, |_| ());
        assert_eq!(contents(&list), vec![3, 2, 1]);
        list.touch(b);
        assert_eq!(contents(&list), vec![2, 3, 1]);
    }

    #[test]
    fn clear_empties_the_list() {
        let mut list = LruList::<u32, 2>::new();
        list.add(1, |_| ());
        list.add(2, |_| ());
        list.clear();
        assert!(list.is_empty());
        assert_eq!(contents(&list), Vec::<u32>::new());
        list.add(9, |_| ());
        assert_eq!(contents(&list), vec![9]);
    }

    #[test]
    fn recycling_repeatedly_keeps_size_fixed() {
        let mut list = LruList::<u32, 2>::new();
        list.add(0, |_| ());
        list.add(1, |_| ());
        for v in 2..50u32 {
            let mut evicted = None;
            list.add(v, |old| evicted = Some(*old));
            assert_eq!(evicted, Some(v - 2));
            assert_eq!(list.len(), 2);
        }
    }
}
