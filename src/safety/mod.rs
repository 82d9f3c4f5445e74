//! URL safety classification
//!
//! This module contains:
//! - The HTTP probe that turns one request into a [`ProbeOutcome`]
//! - The decision table mapping a pair of outcomes to a [`SafetyVerdict`]
//! - The [`Classifier`] that probes a host over both schemes

mod classifier;
mod probe;

pub use classifier::{verdict_for, Classifier};
pub use probe::{build_http_client, HttpProber, ProbeOutcome, Prober};

use std::fmt;

/// Whether a host is safe to recommend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyVerdict {
    /// Plain HTTP is upgraded to HTTPS and no certificate errors were seen
    Safe,
    /// Reachable, but serves plaintext or has a broken certificate
    Unsafe,
    /// Unreachable over both schemes
    Dead,
}

impl SafetyVerdict {
    /// Text stored in the `safety` field of a record
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Safe => "True",
            Self::Unsafe => "False",
            Self::Dead => "None",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "True" => Some(Self::Safe),
            "False" => Some(Self::Unsafe),
            "None" => Some(Self::Dead),
            _ => None,
        }
    }
}

impl fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Safe => "SAFE",
            Self::Unsafe => "UNSAFE",
            Self::Dead => "DEAD",
        };
        write!(f, "{}", label)
    }
}
