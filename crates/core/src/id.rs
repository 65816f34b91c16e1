//! Strongly-typed identifiers used across the domain.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a work permit.
///
/// Canonical format is `PTS-<YYMMDD>-<seq>`: a six-digit date segment taken
/// from the permit's start date (two-digit year) and a per-day sequence
/// number, zero-padded to three digits at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermitId(String);

impl PermitId {
    /// Wrap an id exactly as supplied by a caller (e.g. a lookup request).
    ///
    /// No format check happens here: an unknown id resolves to not-found at
    /// the store, and sequence extraction tolerates foreign shapes by
    /// returning `None`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the canonical id for a permit starting on `date` with the given
    /// per-day sequence number.
    pub fn generate(date: NaiveDate, sequence: u32) -> Self {
        Self(format!("PTS-{}-{sequence:03}", date.format("%y%m%d")))
    }

    /// The per-day sequence number, if this id is in canonical form.
    ///
    /// Any other shape (including the eight-digit date segment some
    /// historical records carried) returns `None`, so scans over stored
    /// ids skip rather than fail.
    pub fn sequence(&self) -> Option<u32> {
        let rest = self.0.strip_prefix("PTS-")?;
        let (date, seq) = rest.split_once('-')?;
        if date.len() != 6 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        seq.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a permit `startDate` field.
///
/// Accepts exactly `YYYY-MM-DD`; anything else is a validation error. The
/// parsed date feeds [`PermitId::generate`].
pub fn parse_start_date(s: &str) -> DomainResult<NaiveDate> {
    let raw = s.trim();
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-';
    if !shaped {
        return Err(DomainError::validation(format!(
            "startDate must be YYYY-MM-DD, got {raw:?}"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DomainError::validation(format!("startDate must be YYYY-MM-DD, got {raw:?}"))
    })
}

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

/// Tag of a physical plant asset (e.g. `K7451`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentTag(String);

/// Employee badge/file number ("legajo"), also used as the principal id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl_string_newtype!(EquipmentTag);
impl_string_newtype!(EmployeeId);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn generates_six_digit_date_segment_with_padded_sequence() {
        let id = PermitId::generate(date(2025, 11, 7), 1);
        assert_eq!(id.as_str(), "PTS-251107-001");
    }

    #[test]
    fn sequence_round_trips_through_generation() {
        let id = PermitId::generate(date(2025, 11, 7), 42);
        assert_eq!(id.sequence(), Some(42));
    }

    #[test]
    fn sequence_is_none_for_eight_digit_date_segment() {
        assert_eq!(PermitId::new("PTS-20251107-001").sequence(), None);
    }

    #[test]
    fn sequence_is_none_for_foreign_shapes() {
        for raw in ["PTS-001", "WO-251107-001", "PTS-2511a7-001", "PTS-251107-", ""] {
            assert_eq!(PermitId::new(raw).sequence(), None, "accepted {raw:?}");
        }
    }

    #[test]
    fn start_date_parses_strict_iso() {
        assert_eq!(parse_start_date("2025-11-07").unwrap(), date(2025, 11, 7));
    }

    #[test]
    fn start_date_rejects_malformed_input() {
        for raw in ["2025/11/07", "25-11-07", "2025-13-07", "2025-11-7", "", "hoy"] {
            assert!(parse_start_date(raw).is_err(), "accepted {raw:?}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any generated id parses back to its own sequence number.
        #[test]
        fn generated_ids_expose_their_sequence(
            y in 2000i32..2100,
            m in 1u32..=12,
            d in 1u32..=28,
            seq in 1u32..=999,
        ) {
            let id = PermitId::generate(date(y, m, d), seq);
            prop_assert_eq!(id.sequence(), Some(seq));
        }
    }
}
