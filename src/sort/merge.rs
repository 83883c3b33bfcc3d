//! Bottom-up two-queue merge.
//!
//! After distribution both queues hold sorted runs of `group_size` lines,
//! alternating A, B, A, B in input order. Each pass merges the k-th run of A
//! with the k-th run of B into one run of twice the size and appends it to
//! A or B, again alternating and starting with A. Queue A therefore always
//! holds the earlier run of every pair, which is what makes "ties go to A"
//! a stable merge. The last pass writes merged lines to the sink instead of
//! re-queueing them.
use std::io::Write;

use log::debug;

use super::compare::in_order;
use super::core::SortError;
use super::distribute::DistributionStats;
use super::key::KeySpec;
use super::queue::LineQueue;

/// Counts produced by the merge stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Merge passes performed (0 for inputs of up to two lines).
    pub passes: usize,
    /// Lines written to the sink.
    pub lines_written: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Per-pass cursor state.
struct Pass {
    /// Lines of A not yet consumed in this pass.
    left_a: usize,
    /// Lines of B not yet consumed in this pass.
    left_b: usize,
    /// Destination of the run currently being built.
    to_a: bool,
    /// Final pass: emit instead of re-queueing.
    emit: bool,
}

impl Pass {
    #[inline]
    fn left(&self, side: Side) -> usize {
        match side {
            Side::A => self.left_a,
            Side::B => self.left_b,
        }
    }

    #[inline]
    fn consume(&mut self, side: Side) {
        match side {
            Side::A => self.left_a -= 1,
            Side::B => self.left_b -= 1,
        }
    }
}

/// Merges the two seeded queues and streams the result to `out`.
pub struct MergeEngine<'q, W: Write> {
    spec: KeySpec,
    a: &'q mut LineQueue,
    b: &'q mut LineQueue,
    out: W,
    total_lines: usize,
    /// Lines attributed to A at the start of the next pass.
    a_len: usize,
    /// Lines attributed to B at the start of the next pass.
    b_len: usize,
    written: usize,
}

impl<'q, W: Write> MergeEngine<'q, W> {
    pub fn new(
        spec: KeySpec,
        stats: &DistributionStats,
        a: &'q mut LineQueue,
        b: &'q mut LineQueue,
        out: W,
    ) -> Self {
        MergeEngine {
            spec,
            a,
            b,
            out,
            total_lines: stats.total_lines,
            a_len: stats.a_len,
            b_len: stats.b_len,
            written: 0,
        }
    }

    /// Run every pass. Returns once all lines have been written.
    pub fn run(mut self) -> Result<MergeStats, SortError> {
        let mut stats = MergeStats::default();

        if self.total_lines <= 2 {
            // The single pair (or line) was already ordered during distribution.
            while !self.a.is_empty() {
                let line = self.a.pop()?;
                self.emit(&line)?;
            }
        } else {
            let mut group_size = 2;
            while group_size < self.total_lines {
                let emit = group_size * 2 >= self.total_lines;
                debug!(
                    "merge pass {}: group_size={} a={} b={} final={}",
                    stats.passes + 1,
                    group_size,
                    self.a_len,
                    self.b_len,
                    emit
                );
                self.merge_pass(group_size, emit)?;
                stats.passes += 1;
                group_size *= 2;
            }
        }

        self.out.flush()?;
        stats.lines_written = self.written;
        if self.written != self.total_lines {
            return Err(SortError::LineCountMismatch {
                expected: self.total_lines,
                written: self.written,
            });
        }
        Ok(stats)
    }

    /// One sweep over both queues at a fixed run size.
    fn merge_pass(&mut self, group_size: usize, emit: bool) -> Result<(), SortError> {
        let mut pass = Pass {
            left_a: self.a_len,
            left_b: self.b_len,
            to_a: true,
            emit,
        };

        while pass.left_a > 0 && pass.left_b > 0 {
            let mut from_a = 0;
            let mut from_b = 0;

            while pass.left_a > 0 && pass.left_b > 0 && from_a < group_size && from_b < group_size
            {
                if in_order(self.a.head()?, self.b.head()?, &self.spec) {
                    self.transfer(Side::A, &mut pass)?;
                    from_a += 1;
                } else {
                    self.transfer(Side::B, &mut pass)?;
                    from_b += 1;
                }
            }

            // One run is spent; the rest of the other needs no comparisons.
            from_a += self.drain(Side::A, group_size - from_a, &mut pass)?;
            from_b += self.drain(Side::B, group_size - from_b, &mut pass)?;
            debug_assert!(from_a <= group_size && from_b <= group_size);

            pass.to_a = !pass.to_a;
        }

        // Uneven totals: a trailing run has no partner this pass.
        self.drain(Side::A, usize::MAX, &mut pass)?;
        self.drain(Side::B, usize::MAX, &mut pass)?;
        Ok(())
    }

    /// Move up to `limit` lines from `side` without comparing. Returns the
    /// number moved.
    fn drain(&mut self, side: Side, limit: usize, pass: &mut Pass) -> Result<usize, SortError> {
        let mut moved = 0;
        while moved < limit && pass.left(side) > 0 {
            self.transfer(side, pass)?;
            moved += 1;
        }
        Ok(moved)
    }

    /// Move the head of `from` to the pass destination, or to the sink on
    /// the final pass, keeping the per-queue size attribution in step.
    fn transfer(&mut self, from: Side, pass: &mut Pass) -> Result<(), SortError> {
        let line = match from {
            Side::A => self.a.pop()?,
            Side::B => self.b.pop()?,
        };
        pass.consume(from);

        if pass.emit {
            match from {
                Side::A => self.a_len -= 1,
                Side::B => self.b_len -= 1,
            }
            return self.emit(&line);
        }

        match (from, pass.to_a) {
            (Side::A, true) => self.a.push(line)?,
            (Side::B, false) => self.b.push(line)?,
            (Side::A, false) => {
                self.b.push(line)?;
                self.a_len -= 1;
                self.b_len += 1;
            }
            (Side::B, true) => {
                self.a.push(line)?;
                self.b_len -= 1;
                self.a_len += 1;
            }
        }
        Ok(())
    }

    #[inline]
    fn emit(&mut self, line: &[u8]) -> Result<(), SortError> {
        self.out.write_all(line)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}
