//! Genomic intervals and coordinate arithmetic
//!
//! All coordinates are 0-based, half-open and measured in base pairs.

use crate::core::error::{InputResult, InvalidInputError};

/// Anything that occupies a span on a chromosome
pub trait Located {
    fn chrom(&self) -> &str;
    fn start(&self) -> u64;
    fn end(&self) -> u64;
}

/// A half-open interval `[start, end)` on one chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicInterval {
    /// Create an interval, rejecting `start > end`
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> InputResult<Self> {
        let chrom = chrom.into();
        if start > end {
            return Err(InvalidInputError::InvalidInterval { chrom, start, end });
        }
        Ok(Self { chrom, start, end })
    }

    /// Zero-length interval at a single coordinate
    pub fn point(chrom: impl Into<String>, pos: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start: pos,
            end: pos,
        }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Located for GenomicInterval {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Bin index of a coordinate: `floor(coord / bin_size)`
#[inline]
pub fn bin_index(coord: u64, bin_size: u64) -> u64 {
    coord / bin_size
}

/// Subtract `subtrahends` from `minuend`, returning the remaining pieces in
/// coordinate order.
///
/// Subtrahends on other chromosomes are ignored. A zero-length subtrahend
/// strictly inside the minuend cuts it in two; one at or beyond its edges
/// leaves it untouched. Zero-length pieces are never returned.
pub fn subtract(minuend: &GenomicInterval, subtrahends: &[GenomicInterval]) -> Vec<GenomicInterval> {
    let mut cuts: Vec<(u64, u64)> = subtrahends
        .iter()
        .filter(|s| s.chrom == minuend.chrom)
        .map(|s| (s.start, s.end))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::new();
    let mut cursor = minuend.start;

    for (start, end) in cuts {
        if cursor >= minuend.end {
            break;
        }
        if start == end {
            // point cut
            if start > cursor && start < minuend.end {
                pieces.push(span(&minuend.chrom, cursor, start));
                cursor = start;
            }
            continue;
        }
        if end <= cursor {
            continue;
        }
        if start > cursor {
            pieces.push(span(&minuend.chrom, cursor, start.min(minuend.end)));
        }
        cursor = cursor.max(end);
    }

    if cursor < minuend.end {
        pieces.push(span(&minuend.chrom, cursor, minuend.end));
    }

    pieces
}

#[inline]
fn span(chrom: &str, start: u64, end: u64) -> GenomicInterval {
    GenomicInterval {
        chrom: chrom.to_string(),
        start,
        end,
    }
}
