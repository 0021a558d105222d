//! Enrollment status state machine.
//!
//! A missing row is the implicit "pending" state. Once a row exists it moves
//! between the three persisted states below and is never deleted.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persisted status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Access given by an administrator without payment.
    Granted,

    /// Access bought through a confirmed payment.
    Active,

    /// Access withdrawn by an administrator.
    Revoked,
}

impl EnrollmentStatus {
    /// Returns true if this status grants access to paid lectures.
    pub fn grants_access(&self) -> bool {
        matches!(self, EnrollmentStatus::Granted | EnrollmentStatus::Active)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Granted => "granted",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Revoked => "revoked",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "granted" => Ok(EnrollmentStatus::Granted),
            "active" => Ok(EnrollmentStatus::Active),
            "revoked" => Ok(EnrollmentStatus::Revoked),
            other => Err(format!("unknown enrollment status: {}", other)),
        }
    }
}

impl StateMachine for EnrollmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, target),
            (Granted, Active)
                | (Granted, Revoked)
                | (Active, Revoked)
                | (Revoked, Granted)
                | (Revoked, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EnrollmentStatus::*;
        match self {
            Granted => vec![Active, Revoked],
            Active => vec![Revoked],
            Revoked => vec![Granted, Active],
        }
    }
}
