//! Core sorting entry points for msort.
//!
//! Input lines are dealt into two queues as sorted pairs, then merged
//! bottom-up until one run covers the whole input. Everything is held in
//! memory; there is no spill to disk.
use std::collections::TryReserveError;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;

use super::distribute::distribute;
use super::key::{InvalidKeySpec, KeySpec};
use super::merge::MergeEngine;
use super::queue::LineQueue;
use crate::common::io::{LineSource, open_lines};
use crate::common::io_error_msg;

/// 4MB buffer for output — reduces flush frequency for large inputs.
const OUTPUT_BUF_SIZE: usize = 4 * 1024 * 1024;

/// Errors raised while sorting.
///
/// Validation errors carry the fixed diagnostics printed by the binary;
/// the rest indicate memory exhaustion, an output failure or a broken
/// queue invariant.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("Invalid -POS,[LEN]")]
    InvalidKeySpec,

    #[error("Nonexistent file name")]
    NonexistentFile { path: PathBuf },

    #[error("missing file operand")]
    MissingOperand,

    #[error("queue allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("{op}() called on an empty queue")]
    EmptyQueue { op: &'static str },

    #[error("wrote {written} lines but read {expected}")]
    LineCountMismatch { expected: usize, written: usize },

    #[error("{}", io_error_msg(.0))]
    Io(#[from] io::Error),
}

impl SortError {
    /// True for bad arguments or unreadable inputs, as opposed to
    /// resource exhaustion and internal faults.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SortError::InvalidKeySpec
                | SortError::NonexistentFile { .. }
                | SortError::MissingOperand
        )
    }
}

impl From<InvalidKeySpec> for SortError {
    fn from(_: InvalidKeySpec) -> Self {
        SortError::InvalidKeySpec
    }
}

/// Configuration for a sort operation.
#[derive(Debug, Clone, Default)]
pub struct SortConfig {
    pub key: KeySpec,
    pub files: Vec<PathBuf>,
}

impl SortConfig {
    /// Build a config from command-line operands: an optional leading
    /// `-POS[,LEN]` followed by at least one file.
    pub fn from_operands(operands: &[String]) -> Result<SortConfig, SortError> {
        let (first, rest) = operands.split_first().ok_or(SortError::MissingOperand)?;

        let (key, files) = if first.starts_with('-') {
            // A key spec with nothing to sort is reported as a bad spec.
            if rest.is_empty() {
                return Err(SortError::InvalidKeySpec);
            }
            (KeySpec::parse(first)?, rest)
        } else {
            (KeySpec::WHOLE_LINE, operands)
        };

        Ok(SortConfig {
            key,
            files: files.iter().map(PathBuf::from).collect(),
        })
    }
}

/// Totals reported after a successful sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub total_lines: usize,
    pub passes: usize,
}

/// Sort the concatenation of `sources` by `spec` and write one
/// newline-terminated record per line to `out`.
pub fn sort_sources<I, S, W>(sources: I, spec: &KeySpec, out: W) -> Result<SortSummary, SortError>
where
    I: IntoIterator<Item = Result<S, SortError>>,
    S: LineSource,
    W: Write,
{
    let mut a = LineQueue::new();
    let mut b = LineQueue::new();

    let result = run_queues(sources, spec, &mut a, &mut b, out);

    // Empty on success; on error this releases whatever was still queued.
    let released = a.destroy() + b.destroy();
    if released > 0 {
        debug!("released {} queued lines during teardown", released);
    }
    result
}

fn run_queues<I, S, W>(
    sources: I,
    spec: &KeySpec,
    a: &mut LineQueue,
    b: &mut LineQueue,
    out: W,
) -> Result<SortSummary, SortError>
where
    I: IntoIterator<Item = Result<S, SortError>>,
    S: LineSource,
    W: Write,
{
    let dist = distribute(sources, spec, a, b)?;
    debug!(
        "distributed {} lines from {} sources (a={}, b={})",
        dist.total_lines, dist.sources, dist.a_len, dist.b_len
    );

    let merged = MergeEngine::new(*spec, &dist, a, b, out).run()?;
    Ok(SortSummary {
        total_lines: dist.total_lines,
        passes: merged.passes,
    })
}

/// Sort the configured files and write the result to stdout.
pub fn sort_and_output(config: &SortConfig) -> Result<SortSummary, SortError> {
    let sources = config.files.iter().map(|path| {
        debug!("opening {}", path.display());
        open_lines(path).map_err(|e| {
            debug!("open failed: {}: {}", path.display(), io_error_msg(&e));
            SortError::NonexistentFile { path: path.clone() }
        })
    });

    let stdout = io::stdout();
    let mut writer = BufWriter::with_capacity(OUTPUT_BUF_SIZE, stdout.lock());
    let summary = sort_sources(sources, &config.key, &mut writer)?;
    writer.flush()?;

    info!(
        "sorted {} lines from {} files in {} merge passes",
        summary.total_lines,
        config.files.len(),
        summary.passes
    );
    Ok(summary)
}
