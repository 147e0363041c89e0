//! Advisory validation gate in front of the execution engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::opportunity::Opportunity;
use crate::error::ValidationError;
use crate::port::outbound::validator::{OpportunityValidator, ValidationDecision};

/// Wraps an optional validator with a timeout.
///
/// A validator error or timeout is surfaced as
/// [`ValidationError::ValidatorUnavailable`], which callers must treat as
/// "not confirmed".
#[derive(Clone)]
pub struct ValidationGate {
    validator: Option<Arc<dyn OpportunityValidator>>,
    timeout: Duration,
}

impl ValidationGate {
    #[must_use]
    pub fn new(validator: Arc<dyn OpportunityValidator>, timeout: Duration) -> Self {
        Self {
            validator: Some(validator),
            timeout,
        }
    }

    /// A gate that confirms everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            validator: None,
            timeout: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.validator.is_some()
    }

    /// Ask the validator about `opportunity`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ValidatorUnavailable`] if the validator
    /// errors or does not answer within the timeout.
    pub async fn check(
        &self,
        opportunity: &Opportunity,
    ) -> Result<ValidationDecision, ValidationError> {
        let Some(validator) = &self.validator else {
            return Ok(ValidationDecision::confirm("validation disabled"));
        };

        match timeout(self.timeout, validator.validate(opportunity)).await {
            Ok(Ok(decision)) => {
                debug!(
                    key = %opportunity.key(),
                    validator = validator.name(),
                    confirmed = decision.confirmed,
                    "Validation answered"
                );
                Ok(decision)
            }
            Ok(Err(e)) => {
                warn!(
                    key = %opportunity.key(),
                    validator = validator.name(),
                    error = %e,
                    "Validator failed"
                );
                Err(ValidationError::ValidatorUnavailable(e.to_string()))
            }
            Err(_) => {
                warn!(
                    key = %opportunity.key(),
                    validator = validator.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Validator timed out"
                );
                Err(ValidationError::ValidatorUnavailable(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

impl std::fmt::Debug for ValidationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationGate")
            .field("validator", &self.validator.as_ref().map(|v| v.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
