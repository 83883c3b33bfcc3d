//! Sort key specification and extraction for `-POS[,LEN]`.
//!
//! POS is a 0-based byte offset, LEN a byte count. Both are plain
//! non-negative decimal integers.

/// Byte range of each line used for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySpec {
    /// Byte offset where the key starts.
    pub pos: usize,
    /// Maximum key length in bytes; `None` runs to end of line.
    pub len: Option<usize>,
}

/// The `-POS[,LEN]` argument was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidKeySpec;

impl KeySpec {
    /// Key covering the whole line.
    pub const WHOLE_LINE: KeySpec = KeySpec { pos: 0, len: None };

    pub fn new(pos: usize, len: Option<usize>) -> Self {
        KeySpec { pos, len }
    }

    /// Parse an argument like "-2", "-2,3" or "-0,1".
    ///
    /// The leading `-` is required. The body holds digits and at most one
    /// comma, which may not be its first or last character.
    pub fn parse(arg: &str) -> Result<KeySpec, InvalidKeySpec> {
        let body = arg.strip_prefix('-').ok_or(InvalidKeySpec)?;
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit() || b == b',') {
            return Err(InvalidKeySpec);
        }

        let (pos_str, len_str) = match body.split_once(',') {
            Some((p, l)) => (p, Some(l)),
            None => (body, None),
        };

        let pos = parse_count(pos_str)?;
        let len = match len_str {
            Some(l) => Some(parse_count(l)?),
            None => None,
        };

        Ok(KeySpec { pos, len })
    }

    /// Returns true when the key is the whole line.
    #[inline]
    pub fn is_whole_line(&self) -> bool {
        self.pos == 0 && self.len.is_none()
    }

    /// Extract the key bytes of `line`.
    ///
    /// Strictly truncated: a line shorter than `pos + len` gives only the
    /// bytes it has, and a line no longer than `pos` gives an empty key.
    #[inline]
    pub fn key<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        let start = self.pos.min(line.len());
        let end = match self.len {
            Some(len) => self.pos.saturating_add(len).min(line.len()),
            None => line.len(),
        };
        &line[start..end.max(start)]
    }
}

/// Parse one numeric component. A second comma lands here as a non-digit.
fn parse_count(s: &str) -> Result<usize, InvalidKeySpec> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidKeySpec);
    }
    s.parse::<usize>().map_err(|_| InvalidKeySpec)
}
