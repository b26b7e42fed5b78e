//! Ordered event queue backed by an AVL tree.
//!
//! [`EventQueue`] is a priority queue with O(log n) insert, removal of the
//! minimum, and removal of an arbitrary item. Each node tracks its subtree
//! height (for balancing) and subtree size (so `len` is O(1)).
//!
//! Items equal under `Ord` are all kept. A new item that compares equal to an
//! existing one is placed after it in order, so equal items pop in insertion
//! order.
//!
//! # Example
//!
//! ```
//! use logicboard::EventQueue;
//!
//! let mut queue = EventQueue::new();
//! for t in [30, 10, 20] {
//!     queue.insert(t);
//! }
//! assert_eq!(queue.len(), 3);
//! assert_eq!(*queue.peek_min().unwrap(), 10);
//! assert_eq!(queue.pop_min().unwrap(), 10);
//! assert_eq!(queue.pop_min().unwrap(), 20);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::{SimError, SimResult};

type Link<T> = Option<Box<TreeNode<T>>>;

struct TreeNode<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
    height: u32,
    size: usize,
}

impl<T> TreeNode<T> {
    fn leaf(item: T) -> Box<Self> {
        Box::new(Self {
            item,
            left: None,
            right: None,
            height: 1,
            size: 1,
        })
    }

    fn update(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
        self.size = size(&self.left) + size(&self.right) + 1;
    }

    /// Right height minus left height.
    fn slant(&self) -> i64 {
        i64::from(height(&self.right)) - i64::from(height(&self.left))
    }
}

fn height<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn size<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

fn rotate_left<T>(mut node: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            node.update();
            pivot.left = Some(node);
            pivot.update();
            pivot
        }
        None => node,
    }
}

fn rotate_right<T>(mut node: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            node.update();
            pivot.right = Some(node);
            pivot.update();
            pivot
        }
        None => node,
    }
}

/// Restores the AVL property at `node`, assuming both children are balanced.
fn balance<T>(mut node: Box<TreeNode<T>>) -> Box<TreeNode<T>> {
    node.update();
    let slant = node.slant();
    if slant < -1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if left.slant() > 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        rotate_right(node)
    } else if slant > 1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if right.slant() < 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        rotate_left(node)
    } else {
        node
    }
}

fn insert<T: Ord>(link: Link<T>, item: T) -> Box<TreeNode<T>> {
    match link {
        None => TreeNode::leaf(item),
        Some(mut node) => {
            if item < node.item {
                node.left = Some(insert(node.left.take(), item));
            } else {
                node.right = Some(insert(node.right.take(), item));
            }
            balance(node)
        }
    }
}

/// Detaches the leftmost item, rebalancing along the path.
fn pop_min<T>(mut node: Box<TreeNode<T>>) -> (Link<T>, T) {
    match node.left.take() {
        None => {
            let TreeNode { item, right, .. } = *node;
            (right, item)
        }
        Some(left) => {
            let (rest, item) = pop_min(left);
            node.left = rest;
            (Some(balance(node)), item)
        }
    }
}

fn remove<T: Ord>(link: Link<T>, item: &T) -> (Link<T>, Option<T>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    match item.cmp(&node.item) {
        Ordering::Less => {
            let (rest, removed) = remove(node.left.take(), item);
            node.left = rest;
            (Some(balance(node)), removed)
        }
        Ordering::Greater => {
            let (rest, removed) = remove(node.right.take(), item);
            node.right = rest;
            (Some(balance(node)), removed)
        }
        Ordering::Equal => {
            let TreeNode {
                item: removed,
                left,
                right,
                ..
            } = *node;
            let rest = match (left, right) {
                (None, right) => right,
                (left, None) => left,
                (left, Some(right)) => {
                    let (right_rest, successor) = pop_min(right);
                    let mut replacement = TreeNode::leaf(successor);
                    replacement.left = left;
                    replacement.right = right_rest;
                    Some(balance(replacement))
                }
            };
            (rest, Some(removed))
        }
    }
}

/// A priority queue ordered by `T: Ord`, smallest first.
pub struct EventQueue<T> {
    root: Link<T>,
}

impl<T: Ord> EventQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Inserts an item. O(log n).
    pub fn insert(&mut self, item: T) {
        self.root = Some(insert(self.root.take(), item));
    }

    /// Returns the smallest item without removing it.
    ///
    /// Peeking an empty queue is a caller error; check [`len`](Self::len) first.
    pub fn peek_min(&self) -> SimResult<&T> {
        let mut node = self.root.as_deref().ok_or(SimError::EmptyQueue)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.item)
    }

    /// Returns the smallest item, or `None` if the queue is empty.
    pub fn first(&self) -> Option<&T> {
        self.peek_min().ok()
    }

    /// Removes and returns the smallest item. O(log n).
    ///
    /// Popping an empty queue is a caller error; check [`len`](Self::len) first.
    pub fn pop_min(&mut self) -> SimResult<T> {
        let root = self.root.take().ok_or(SimError::EmptyQueue)?;
        let (rest, item) = pop_min(root);
        self.root = rest;
        Ok(item)
    }

    /// Removes one item equal to `item`, returning it if present. O(log n).
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let (rest, removed) = remove(self.root.take(), item);
        self.root = rest;
        removed
    }

    /// Returns true if an item equal to `item` is queued.
    pub fn contains(&self, item: &T) -> bool {
        let mut link = self.root.as_deref();
        while let Some(node) = link {
            match item.cmp(&node.item) {
                Ordering::Less => link = node.left.as_deref(),
                Ordering::Greater => link = node.right.as_deref(),
                Ordering::Equal => return true,
            }
        }
        false
    }
}

impl<T> EventQueue<T> {
    /// Number of queued items. O(1).
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Drops every queued item.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Iterates over queued items in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }
}

impl<T: Ord> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for EventQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for EventQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T: fmt::Debug> fmt::Debug for EventQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// In-order iterator over an [`EventQueue`].
pub struct Iter<'a, T> {
    stack: Vec<&'a TreeNode<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn push_left(&mut self, mut link: Option<&'a TreeNode<T>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.item)
    }
}

impl<'a, T> IntoIterator for &'a EventQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks ordering, heights, sizes and balance of every subtree.
    fn check_node<T: Ord>(link: &Link<T>) -> (u32, usize) {
        match link {
            None => (0, 0),
            Some(node) => {
                let (lh, ls) = check_node(&node.left);
                let (rh, rs) = check_node(&node.right);
                if let Some(left) = &node.left {
                    assert!(left.item <= node.item);
                }
                if let Some(right) = &node.right {
                    assert!(right.item >= node.item);
                }
                assert!((i64::from(lh) - i64::from(rh)).abs() <= 1, "unbalanced node");
                assert_eq!(node.height, lh.max(rh) + 1);
                assert_eq!(node.size, ls + rs + 1);
                (node.height, node.size)
            }
        }
    }

    fn check<T: Ord>(queue: &EventQueue<T>) {
        let (_, size) = check_node(&queue.root);
        assert_eq!(size, queue.len());
    }

    #[test]
    fn test_empty_queue() {
        let mut queue: EventQueue<u32> = EventQueue::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert!(matches!(queue.peek_min(), Err(SimError::EmptyQueue)));
        assert!(matches!(queue.pop_min(), Err(SimError::EmptyQueue)));
        assert!(queue.first().is_none());
    }

    #[test]
    fn test_sorted_inserts_stay_balanced() {
        let mut queue = EventQueue::new();
        for i in 1..=16 {
            queue.insert(i);
            check(&queue);
        }
        assert_eq!(*queue.peek_min().unwrap(), 1);
        assert_eq!(queue.len(), 16);
        assert_eq!(queue.height(), 5);
    }

    #[test]
    fn test_pop_min_rebalances() {
        let mut queue: EventQueue<u32> = (0..100).rev().collect();
        for expected in 0..100 {
            assert_eq!(queue.pop_min().unwrap(), expected);
            check(&queue);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicates_pop_in_insertion_order() {
        let mut queue = EventQueue::new();
        for (i, key) in [5, 1, 5, 3, 5, 1].into_iter().enumerate() {
            queue.insert(Tagged(key, i));
        }
        check(&queue);
        let order: Vec<_> = std::iter::from_fn(|| queue.pop_min().ok())
            .map(|t| (t.0, t.1))
            .collect();
        assert_eq!(order, vec![(1, 1), (1, 5), (3, 3), (5, 0), (5, 2), (5, 4)]);
    }

    #[test]
    fn test_remove_and_contains() {
        let mut queue: EventQueue<u32> = (0..32).collect();
        assert!(queue.contains(&17));
        assert_eq!(queue.remove(&17), Some(17));
        assert!(!queue.contains(&17));
        assert_eq!(queue.remove(&17), None);
        for i in (0..32).step_by(3) {
            queue.remove(&i);
            check(&queue);
        }
        assert_eq!(queue.len(), 32 - 1 - 11);
    }

    #[test]
    fn test_iter_in_order() {
        let queue: EventQueue<i32> = [4, -2, 9, 0, 7].into_iter().collect();
        let items: Vec<_> = queue.iter().copied().collect();
        assert_eq!(items, vec![-2, 0, 4, 7, 9]);
    }

    #[test]
    fn test_clear() {
        let mut queue: EventQueue<u32> = (0..50).collect();
        queue.clear();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.height(), 0);
        queue.insert(5);
        assert_eq!(queue.len(), 1);
    }

    /// Orders by key only, carrying an insertion tag along.
    #[derive(Debug)]
    struct Tagged(u32, usize);

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> Ordering {
            self.0.cmp(&other.0)
        }
    }
}
