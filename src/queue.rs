//! Double-ended ordered container.
//!
//! `Queue<T>` owns its elements: dropping the queue, or removing elements with
//! [`Queue::delete_where`], releases them. A queue that should only borrow its
//! elements is simply a `Queue<&T>`. Filtered copies follow the same policy:
//! [`Queue::select`] deep-copies owned elements through `Clone`, while
//! [`Queue::select_ref`] hands out a borrowing queue over the originals.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Pop or peek on an empty queue.
    #[error("queue underflow")]
    Underflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push_head(&mut self, value: T) {
        self.items.push_front(value);
    }

    pub fn push_tail(&mut self, value: T) {
        self.items.push_back(value);
    }

    pub fn pop_head(&mut self) -> Result<T, QueueError> {
        self.items.pop_front().ok_or(QueueError::Underflow)
    }

    pub fn pop_tail(&mut self) -> Result<T, QueueError> {
        self.items.pop_back().ok_or(QueueError::Underflow)
    }

    pub fn peek_head(&self) -> Result<&T, QueueError> {
        self.items.front().ok_or(QueueError::Underflow)
    }

    pub fn peek_tail(&self) -> Result<&T, QueueError> {
        self.items.back().ok_or(QueueError::Underflow)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Returns the first element matching `condition`, head to tail.
    pub fn find<F>(&self, mut condition: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().find(|value| condition(value))
    }

    pub fn find_mut<F>(&mut self, mut condition: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter_mut().find(|value| condition(value))
    }

    /// Removes and drops every element matching `condition`, keeping the
    /// relative order of the survivors. Returns how many were removed.
    pub fn delete_where<F>(&mut self, mut condition: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|value| !condition(value));
        before - self.items.len()
    }

    /// Copies the matching elements into a new owning queue.
    pub fn select<F>(&self, mut condition: F) -> Queue<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|value| condition(value))
            .cloned()
            .collect()
    }

    /// Like [`select`](Self::select) but borrows the matching elements.
    pub fn select_ref<F>(&self, mut condition: F) -> Queue<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().filter(|value| condition(value)).collect()
    }

    /// Visits elements head to tail until `visit` breaks.
    ///
    /// The break value, if any, is handed back to the caller.
    pub fn for_each_until<B, F>(&self, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&T) -> ControlFlow<B>,
    {
        for value in &self.items {
            if let ControlFlow::Break(signal) = visit(value) {
                return ControlFlow::Break(signal);
            }
        }
        ControlFlow::Continue(())
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = std::collections::vec_deque::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
