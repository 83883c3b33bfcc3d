//! Line comparison and newline trimming.
//! Comparison is byte-wise; no locale or numeric collation.
use std::cmp::Ordering;

use super::key::KeySpec;

/// Compare two lines by their keys.
///
/// Keys are compared as byte slices, so a key that is a proper prefix of the
/// other sorts first and two empty keys are equal. Since `KeySpec::key`
/// already stops at `len` bytes, this is the bounded-length comparison.
#[inline]
pub fn compare_lines(a: &[u8], b: &[u8], spec: &KeySpec) -> Ordering {
    if spec.is_whole_line() {
        return a.cmp(b);
    }
    spec.key(a).cmp(spec.key(b))
}

/// True when `a` may be emitted before `b` without breaking stability.
#[inline]
pub fn in_order(a: &[u8], b: &[u8], spec: &KeySpec) -> bool {
    compare_lines(a, b, spec) != Ordering::Greater
}

/// Strip one trailing `\n` from a raw line. A bare terminator becomes the
/// empty line; a line without one is returned unchanged.
#[inline]
pub fn trim_line(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    line
}
