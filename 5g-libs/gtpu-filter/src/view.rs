//! view - bounds-checked access to packet headers

use thiserror::Error;

/// A header did not fit between its offset and the end of the view.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{needed} byte header at offset {offset} exceeds the {available} bytes available")]
pub struct Truncated {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

/// Read-only window over a single packet buffer.
///
/// `start <= end <= buf.len()` always holds.  Headers are only ever borrowed through
/// [`check_header`](Self::check_header), which refuses any header ending past `end`.
#[derive(Debug, Clone, Copy)]
pub struct BoundedView<'a> {
    buf: &'a [u8],
    start: usize,
    end: usize,
}

impl<'a> BoundedView<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            start: 0,
            end: buf.len(),
        }
    }

    /// View `start..end` of `buf`.  Bounds past the buffer are clamped to it, and a start beyond
    /// the end is clamped to the end, giving an empty view.
    pub fn with_bounds(buf: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(buf.len());
        let start = start.min(end);
        Self { buf, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrow the `N` byte header found `offset` bytes into the view.
    #[inline]
    pub fn check_header<const N: usize>(&self, offset: usize) -> Result<&'a [u8; N], Truncated> {
        let truncated = Truncated {
            offset,
            needed: N,
            available: self.len().saturating_sub(offset),
        };
        let header_start = self.start.checked_add(offset).ok_or(truncated)?;
        let header_end = header_start.checked_add(N).ok_or(truncated)?;
        if header_end > self.end {
            return Err(truncated);
        }
        self.buf
            .get(header_start..header_end)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(truncated)
    }
}
