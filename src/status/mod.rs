//! Execution status lifecycle
//!
//! Status values form a total order driven by an explicit ordinal mapping:
//! NO_STATUS(0) < STORE(1) < STORE_AND_UPDATE(2) < DONE(3) < ERROR(4).
//! Threshold comparisons (`status >= STORE_AND_UPDATE`) gate persistence
//! and cleanup side effects.

use std::cmp::Ordering;

/// Reserved percentage value denoting process failure rather than progress.
pub const FAILURE_SENTINEL: i8 = -1;

/// Execution status of a WPS process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// No status reporting requested
    NoStatus,
    /// Store the status document once
    StoreStatus,
    /// Store the status document and keep updating it as the run progresses
    StoreAndUpdateStatus,
    /// Run completed successfully
    DoneStatus,
    /// Run failed
    ErrorStatus,
}

impl ExecutionStatus {
    /// Explicit ordinal for threshold comparisons.
    ///
    /// The ordering is part of the status-file contract; never rely on
    /// declaration order.
    pub fn ordinal(&self) -> u8 {
        match self {
            ExecutionStatus::NoStatus => 0,
            ExecutionStatus::StoreStatus => 1,
            ExecutionStatus::StoreAndUpdateStatus => 2,
            ExecutionStatus::DoneStatus => 3,
            ExecutionStatus::ErrorStatus => 4,
        }
    }

    /// Check if this status is terminal (the run will not progress further).
    pub fn is_terminal(&self) -> bool {
        *self >= ExecutionStatus::DoneStatus
    }
}

impl PartialOrd for ExecutionStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExecutionStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

/// Progress percentage of a run: 0-100, or the failure sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPercentage(i8);

impl StatusPercentage {
    /// Zero progress (the "accepted" condition).
    pub const ZERO: StatusPercentage = StatusPercentage(0);

    /// Construct a validated percentage.
    ///
    /// Accepts 0-100 and the failure sentinel; anything else is rejected.
    pub fn new(value: i8) -> Result<Self, StatusError> {
        if value == FAILURE_SENTINEL || (0..=100).contains(&value) {
            Ok(StatusPercentage(value))
        } else {
            Err(StatusError::PercentageOutOfRange(value))
        }
    }

    /// The failure sentinel.
    pub fn failure() -> Self {
        StatusPercentage(FAILURE_SENTINEL)
    }

    /// Raw value (0-100, or -1 for failure).
    pub fn value(&self) -> i8 {
        self.0
    }

    /// Check if this is the failure sentinel.
    pub fn is_failure(&self) -> bool {
        self.0 == FAILURE_SENTINEL
    }
}

impl Default for StatusPercentage {
    fn default() -> Self {
        StatusPercentage::ZERO
    }
}

/// Errors for status values
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("percentage out of range: {0} (expected 0-100 or the failure sentinel)")]
    PercentageOutOfRange(i8),
}
