//! Chromosome-arm views
//!
//! A view is an ordered set of named, non-overlapping regions. Insulation
//! scores are computed independently within each region.

use crate::core::arms::{write_bed4, Arm};
use crate::core::error::ViewValidationError;
use crate::core::interval::Located;
use rust_lapper::{Interval, Lapper};
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// A validated, ordered set of arms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    regions: Vec<Arm>,
}

impl View {
    /// Validate `regions` as a view: non-empty regions, unique names, and no
    /// overlaps between regions on the same chromosome.
    pub fn new(regions: Vec<Arm>) -> Result<Self, ViewValidationError> {
        let mut names = HashSet::with_capacity(regions.len());
        let mut by_chrom: HashMap<&str, Vec<Interval<u64, usize>>> = HashMap::new();

        for (idx, arm) in regions.iter().enumerate() {
            if arm.interval.is_empty() {
                return Err(ViewValidationError::EmptyRegion(arm.name.clone()));
            }
            if !names.insert(arm.name.as_str()) {
                return Err(ViewValidationError::DuplicateName(arm.name.clone()));
            }
            by_chrom.entry(arm.chrom()).or_default().push(Interval {
                start: arm.start(),
                stop: arm.end(),
                val: idx,
            });
        }

        for intervals in by_chrom.into_values() {
            let lapper = Lapper::new(intervals);
            for iv in lapper.iter() {
                if let Some(other) = lapper.find(iv.start, iv.stop).find(|o| o.val != iv.val) {
                    let (first, second) = if iv.val < other.val {
                        (iv.val, other.val)
                    } else {
                        (other.val, iv.val)
                    };
                    return Err(ViewValidationError::Overlapping {
                        first: regions[first].name.clone(),
                        second: regions[second].name.clone(),
                    });
                }
            }
        }

        Ok(Self { regions })
    }

    /// Select arms in the order of `chromnames` and validate the result.
    ///
    /// Every arm of a listed chromosome is taken, keeping their relative
    /// order; arms on unlisted chromosomes are dropped. A listed chromosome
    /// with no arm is an error.
    pub fn for_chromosomes(arms: &[Arm], chromnames: &[String]) -> Result<Self, ViewValidationError> {
        let mut by_chrom: HashMap<&str, Vec<&Arm>> = HashMap::new();
        for arm in arms {
            by_chrom.entry(arm.chrom()).or_default().push(arm);
        }

        let mut regions = Vec::with_capacity(chromnames.len() * 2);
        for chrom in chromnames {
            match by_chrom.get(chrom.as_str()) {
                Some(chrom_arms) => regions.extend(chrom_arms.iter().map(|a| (*a).clone())),
                None => return Err(ViewValidationError::MissingChromosome(chrom.clone())),
            }
        }

        let view = Self::new(regions)?;
        view.check_chromosomes(chromnames)?;
        Ok(view)
    }

    /// Every region must lie on one of `chromnames`
    pub fn check_chromosomes(&self, chromnames: &[String]) -> Result<(), ViewValidationError> {
        let known: HashSet<&str> = chromnames.iter().map(String::as_str).collect();
        match self.regions.iter().find(|a| !known.contains(a.chrom())) {
            Some(arm) => Err(ViewValidationError::UnknownChromosome {
                name: arm.name.clone(),
                chrom: arm.chrom().to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn regions(&self) -> &[Arm] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Write as headerless BED4
    pub fn write_bed<W: Write>(&self, writer: W) -> std::io::Result<()> {
        write_bed4(&self.regions, writer)
    }
}
