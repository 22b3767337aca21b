// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

/// Running counters for a single engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Stats {
    /// Inserts that created a node.
    structural_inserts: usize,
    /// Inserts that only bumped a count.
    duplicate_inserts: usize,
    /// Forward links followed while locating predecessors.
    steps: usize,
}

impl Stats {
    pub(crate) fn record_structural(&mut self, steps: usize) {
        self.structural_inserts += 1;
        self.steps += steps;
    }

    pub(crate) fn record_duplicate(&mut self) {
        self.duplicate_inserts += 1;
    }

    /// Every insert seen, duplicate or not.
    pub fn inserts(&self) -> usize {
        self.structural_inserts + self.duplicate_inserts
    }
}
