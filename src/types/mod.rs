//! Shared configuration types
//!
//! The circuit fixes its array bounds when it is compiled; witness generation
//! must use the same bounds or the encoded inputs will not satisfy the
//! constraints. `CircuitProfile` carries those bounds explicitly through every
//! call instead of relying on module-level constants, so several circuit
//! profiles can coexist in one process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum haystack length in bytes, matching the shipped email circuit
pub const DEFAULT_MAX_HAYSTACK_LEN: usize = 1088;

/// Default maximum matched-window length in bytes, matching the shipped email circuit
pub const DEFAULT_MAX_MATCH_LEN: usize = 36;

/// Profile construction and compatibility errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("invalid circuit profile: {0}")]
    InvalidProfile(String),

    #[error(
        "circuit artifact declares max_haystack_len={artifact_haystack}, \
         max_match_len={artifact_match}, but the prover is configured with \
         max_haystack_len={profile_haystack}, max_match_len={profile_match}"
    )]
    ProfileMismatch {
        artifact_haystack: usize,
        artifact_match: usize,
        profile_haystack: usize,
        profile_match: usize,
    },
}

/// Fixed array bounds shared between witness generation and the compiled circuit
///
/// `max_haystack_len` bounds the raw input buffer; `max_match_len` bounds the
/// state-trace and capture arrays, which cover only the matched window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitProfile {
    /// Maximum haystack length in bytes
    pub max_haystack_len: usize,
    /// Maximum matched-window length in bytes
    pub max_match_len: usize,
}

impl CircuitProfile {
    /// Create a profile, rejecting bounds the circuit could never have
    pub fn new(max_haystack_len: usize, max_match_len: usize) -> Result<Self, ProfileError> {
        if max_haystack_len == 0 || max_match_len == 0 {
            return Err(ProfileError::InvalidProfile(
                "max_haystack_len and max_match_len must be non-zero".to_string(),
            ));
        }
        if max_match_len > max_haystack_len {
            return Err(ProfileError::InvalidProfile(format!(
                "max_match_len ({}) cannot exceed max_haystack_len ({})",
                max_match_len, max_haystack_len
            )));
        }
        Ok(Self {
            max_haystack_len,
            max_match_len,
        })
    }

    /// Check this profile against bounds declared by a compiled circuit artifact
    pub fn check_declared(
        &self,
        artifact_haystack: usize,
        artifact_match: usize,
    ) -> Result<(), ProfileError> {
        if artifact_haystack != self.max_haystack_len || artifact_match != self.max_match_len {
            return Err(ProfileError::ProfileMismatch {
                artifact_haystack,
                artifact_match,
                profile_haystack: self.max_haystack_len,
                profile_match: self.max_match_len,
            });
        }
        Ok(())
    }
}

impl Default for CircuitProfile {
    fn default() -> Self {
        Self {
            max_haystack_len: DEFAULT_MAX_HAYSTACK_LEN,
            max_match_len: DEFAULT_MAX_MATCH_LEN,
        }
    }
}
