//! Distribution pass: turn the input stream into sorted pairs dealt
//! round-robin onto two queues.
use log::debug;

use super::compare::{in_order, trim_line};
use super::core::SortError;
use super::key::KeySpec;
use super::queue::LineQueue;
use crate::common::io::LineSource;

/// Counts produced by the distribution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistributionStats {
    /// Lines read across all sources.
    pub total_lines: usize,
    /// Lines placed on queue A.
    pub a_len: usize,
    /// Lines placed on queue B.
    pub b_len: usize,
    /// Sources consumed.
    pub sources: usize,
}

/// Read every source in order as one logical stream, sort each consecutive
/// pair and append it to queue A or B, alternating after every pair.
///
/// A source that ends on an odd line keeps that line pending and pairs it
/// with the first line of the next source. Only after the last source is the
/// leftover line appended alone, to whichever queue is current.
pub fn distribute<I, S>(
    sources: I,
    spec: &KeySpec,
    a: &mut LineQueue,
    b: &mut LineQueue,
) -> Result<DistributionStats, SortError>
where
    I: IntoIterator<Item = Result<S, SortError>>,
    S: LineSource,
{
    let mut stats = DistributionStats::default();
    let mut to_a = true;
    let mut pending: Option<Vec<u8>> = None;

    for source in sources {
        let mut source = source?;
        stats.sources += 1;
        let carried = pending.is_some();
        let mut read = 0usize;

        while let Some(raw) = source.next_line()? {
            read += 1;
            let line = trim_line(raw);
            let Some(first) = pending.take() else {
                pending = Some(line);
                continue;
            };

            let dest = if to_a { &mut *a } else { &mut *b };
            if in_order(&first, &line, spec) {
                dest.push(first)?;
                dest.push(line)?;
            } else {
                dest.push(line)?;
                dest.push(first)?;
            }
            if to_a {
                stats.a_len += 2;
            } else {
                stats.b_len += 2;
            }
            stats.total_lines += 2;
            to_a = !to_a;
        }
        debug!(
            "source {}: {} lines read, odd line carried in: {}",
            stats.sources, read, carried
        );
    }

    if let Some(last) = pending {
        if to_a {
            a.push(last)?;
            stats.a_len += 1;
        } else {
            b.push(last)?;
            stats.b_len += 1;
        }
        stats.total_lines += 1;
    }

    Ok(stats)
}
