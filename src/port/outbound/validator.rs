//! Advisory opportunity validation port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::opportunity::Opportunity;
use crate::error::Result;

/// Outcome of an advisory check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDecision {
    pub confirmed: bool,
    pub rationale: String,
}

impl ValidationDecision {
    #[must_use]
    pub fn confirm(rationale: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            rationale: rationale.into(),
        }
    }

    #[must_use]
    pub fn reject(rationale: impl Into<String>) -> Self {
        Self {
            confirmed: false,
            rationale: rationale.into(),
        }
    }
}

/// Second opinion on whether an opportunity's two events really resolve
/// identically.
///
/// Validators only see the opportunity. They cannot place, size, or
/// release capital.
#[async_trait]
pub trait OpportunityValidator: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error if the validator's backend is unreachable or its
    /// answer cannot be parsed.
    async fn validate(&self, opportunity: &Opportunity) -> Result<ValidationDecision>;
}
