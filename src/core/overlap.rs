//! Bin-level overlap detection
//!
//! Reduces both interval sets to `(chrom, bin)` keys at a fixed bin size and
//! flags primary intervals whose start bin is touched by any secondary
//! interval. This is containment at bin granularity: two intervals sharing a
//! bin are flagged even without base-pair overlap.

use crate::core::error::{InputResult, InvalidInputError};
use crate::core::interval::{bin_index, Located};
use std::collections::HashSet;

/// A primary row paired with its overlap flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flagged<'a, T> {
    pub row: &'a T,
    pub flag: bool,
}

/// Bin-key overlap index over a secondary interval set
#[derive(Debug, Clone)]
pub struct BinOverlapIndexer<'a> {
    bin_size: u64,
    keys: HashSet<(&'a str, u64)>,
}

impl<'a> BinOverlapIndexer<'a> {
    /// Index `secondary` at `bin_size`
    ///
    /// Each secondary interval contributes the bin of its start and the bin
    /// of its end, so intervals crossing a bin edge mark both bins.
    pub fn new<S: Located>(secondary: &'a [S], bin_size: u64) -> InputResult<Self> {
        if bin_size == 0 {
            return Err(InvalidInputError::ZeroBinSize);
        }
        let mut keys = HashSet::with_capacity(secondary.len() * 2);
        for iv in secondary {
            keys.insert((iv.chrom(), bin_index(iv.start(), bin_size)));
            keys.insert((iv.chrom(), bin_index(iv.end(), bin_size)));
        }
        Ok(Self { bin_size, keys })
    }

    pub fn bin_size(&self) -> u64 {
        self.bin_size
    }

    /// Number of distinct `(chrom, bin)` keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether the start bin of `primary` is covered. The end of the primary
    /// interval is not consulted.
    #[inline]
    pub fn contains<P: Located>(&self, primary: &P) -> bool {
        self.keys
            .contains(&(primary.chrom(), bin_index(primary.start(), self.bin_size)))
    }

    /// One flag per primary row, in input order
    pub fn flags<P: Located>(&self, primary: &[P]) -> Vec<bool> {
        primary.iter().map(|p| self.contains(p)).collect()
    }
}

/// Flag each primary row that shares a bin with any secondary interval
pub fn flag_overlap<'p, P: Located, S: Located>(
    primary: &'p [P],
    secondary: &[S],
    bin_size: u64,
) -> InputResult<Vec<Flagged<'p, P>>> {
    let index = BinOverlapIndexer::new(secondary, bin_size)?;
    Ok(primary
        .iter()
        .map(|row| Flagged {
            row,
            flag: index.contains(row),
        })
        .collect())
}
