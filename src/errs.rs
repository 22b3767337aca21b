// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("probability base must be a finite number greater than 1, got {0}")]
    InvalidProbabilityBase(f64),
    #[error("max tower height must be at least 1, got {0}")]
    InvalidTowerHeight(usize),
    #[error("element at index {index} cannot be ordered against the rest of the input")]
    TypeMismatch { index: usize },
    #[error("skiplist invariant violated at level {level}: {reason}")]
    InvariantViolation { level: usize, reason: &'static str },
    #[error("could not allocate a new node")]
    AllocationFailed,
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::AllocationFailed
    }
}

impl From<hashbrown::TryReserveError> for Error {
    fn from(_: hashbrown::TryReserveError) -> Self {
        Error::AllocationFailed
    }
}

impl Error {
    /// Whether the error came from constructing an engine rather than using one.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidProbabilityBase(_) | Error::InvalidTowerHeight(_)
        )
    }
}
