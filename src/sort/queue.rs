//! FIFO queue of owned lines used by the two-queue merge.
use std::collections::VecDeque;

use super::core::SortError;

/// An owned input line with its terminator removed. The empty line is an
/// ordinary zero-length buffer.
pub type Line = Vec<u8>;

/// FIFO container of owned lines with O(1) append, peek and pop.
///
/// Moving a line out of a queue hands over the only reference to it, so a
/// line is never reachable from both queues at once.
#[derive(Debug, Default)]
pub struct LineQueue {
    lines: VecDeque<Line>,
}

impl LineQueue {
    pub fn new() -> Self {
        LineQueue {
            lines: VecDeque::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Append at the tail. Fails only when the backing storage cannot grow.
    #[inline]
    pub fn push(&mut self, line: Line) -> Result<(), SortError> {
        self.lines.try_reserve(1)?;
        self.lines.push_back(line);
        Ok(())
    }

    /// Borrow the head line.
    #[inline]
    pub fn head(&self) -> Result<&Line, SortError> {
        self.lines.front().ok_or(SortError::EmptyQueue { op: "head" })
    }

    /// Remove and return the head line.
    #[inline]
    pub fn pop(&mut self) -> Result<Line, SortError> {
        self.lines.pop_front().ok_or(SortError::EmptyQueue { op: "pop" })
    }

    /// Release every remaining line. Returns how many were dropped.
    pub fn destroy(&mut self) -> usize {
        let n = self.lines.len();
        self.lines.clear();
        self.lines.shrink_to_fit();
        n
    }
}
