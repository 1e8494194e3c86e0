//! Caller-side status policy.
//!
//! Some callers treat particular failures as a no-op, most often a 409 from
//! adding a tag or observable that already exists. The client still reports
//! those as errors; `ResultExt::ignoring` turns the matching ones into
//! `Ok(None)` at the call site.

use serde_json::Value;

use crate::error::ApiError;

/// Set of HTTP statuses a caller considers benign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorableStatus {
    statuses: Vec<u16>,
}

impl IgnorableStatus {
    pub fn any_of(statuses: &[u16]) -> Self {
        Self {
            statuses: statuses.to_vec(),
        }
    }

    /// 409: the resource already exists.
    pub fn conflict() -> Self {
        Self::any_of(&[409])
    }

    pub fn matches(&self, err: &ApiError) -> bool {
        err.status().is_some_and(|s| self.statuses.contains(&s))
    }
}

pub trait ResultExt {
    /// `Ok(Some(body))` on success, `Ok(None)` when the failure's status is
    /// ignorable, the original error otherwise.
    fn ignoring(self, policy: &IgnorableStatus) -> Result<Option<Value>, ApiError>;
}

impl ResultExt for Result<Value, ApiError> {
    fn ignoring(self, policy: &IgnorableStatus) -> Result<Option<Value>, ApiError> {
        match self {
            Ok(body) => Ok(Some(body)),
            Err(e) if policy.matches(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
