// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::Error;

/// Promotion happens with probability `1/2` per level unless told otherwise.
pub const DEFAULT_PROBABILITY_BASE: f64 = 2.0;

/// Validated parameters for a [`crate::skiplist::SkipList`].
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Config {
    /// The `b` in `1/b`, the chance a node is promoted one more level.
    probability_base: f64,
    /// The tallest tower any node can have.
    max_tower_height: usize,
}

impl Config {
    /// Build a config for `probability_base` with the default tower cap of
    /// `ceil(b^5)`.
    ///
    /// The cap only bounds how tall towers may get; the head grows with the
    /// tallest tower actually drawn, so a large cap costs nothing up front.
    pub fn new(probability_base: f64) -> Result<Self, Error> {
        if !probability_base.is_finite() || probability_base <= 1.0 {
            return Err(Error::InvalidProbabilityBase(probability_base));
        }

        // b > 1 so this is at least 2, and the cast saturates for huge bases
        let max_tower_height = probability_base.powi(5).ceil() as usize;

        Ok(Config {
            probability_base,
            max_tower_height,
        })
    }

    /// Replace the tower cap with an explicit one.
    pub fn with_max_tower_height(mut self, max_tower_height: usize) -> Result<Self, Error> {
        if max_tower_height == 0 {
            return Err(Error::InvalidTowerHeight(max_tower_height));
        }
        self.max_tower_height = max_tower_height;
        Ok(self)
    }

    /// The per-level promotion probability, `1/b`.
    #[inline]
    pub fn promotion_probability(&self) -> f64 {
        self.probability_base.recip()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            probability_base: DEFAULT_PROBABILITY_BASE,
            max_tower_height: 32,
        }
    }
}
