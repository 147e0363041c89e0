//! Opportunity validators.
//!
//! - [`LlmValidator`] asks a language model whether both questions
//!   describe the same outcome
//! - [`ThresholdValidator`] is the rule-based fallback

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::opportunity::Opportunity;
use crate::error::{Error, Result};
use crate::port::outbound::llm::Llm;
use crate::port::outbound::validator::{OpportunityValidator, ValidationDecision};

/// Validator backed by an [`Llm`].
pub struct LlmValidator {
    llm: Arc<dyn Llm>,
}

impl LlmValidator {
    #[must_use]
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    fn prompt(opportunity: &Opportunity) -> String {
        format!(
            "Venue A ({venue_a}): {question_a}\n\
             Venue B ({venue_b}): {question_b}\n\
             Planned trade: {orientation}, net edge {edge}.\n\
             Do both questions resolve on the same outcome?",
            venue_a = opportunity.leg_a().venue,
            question_a = opportunity.question(),
            venue_b = opportunity.leg_b().venue,
            question_b = opportunity.counterpart_question(),
            orientation = opportunity.orientation(),
            edge = opportunity.net_edge(),
        )
    }
}

/// Parse a `YES`/`NO` first line followed by an optional rationale.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the first non-empty line is neither.
pub fn parse_verdict(answer: &str) -> Result<ValidationDecision> {
    let mut lines = answer.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next().unwrap_or_default();
    let verdict: String = first
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();

    let rest: Vec<&str> = lines.collect();
    let rationale = if rest.is_empty() {
        first.to_string()
    } else {
        rest.join(" ")
    };

    match verdict.as_str() {
        "YES" => Ok(ValidationDecision::confirm(rationale)),
        "NO" => Ok(ValidationDecision::reject(rationale)),
        _ => Err(Error::Parse(format!("unrecognized validator answer: {first:?}"))),
    }
}

#[async_trait]
impl OpportunityValidator for LlmValidator {
    fn name(&self) -> &'static str {
        self.llm.name()
    }

    async fn validate(&self, opportunity: &Opportunity) -> Result<ValidationDecision> {
        let answer = self.llm.complete(&Self::prompt(opportunity)).await?;
        debug!(key = %opportunity.key(), llm = self.llm.name(), answer = %answer, "LLM answered");
        parse_verdict(&answer)
    }
}

/// Confirms any opportunity whose net edge clears a floor.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdValidator {
    min_net_edge: Decimal,
}

impl ThresholdValidator {
    #[must_use]
    pub const fn new(min_net_edge: Decimal) -> Self {
        Self { min_net_edge }
    }
}

#[async_trait]
impl OpportunityValidator for ThresholdValidator {
    fn name(&self) -> &'static str {
        "threshold"
    }

    async fn validate(&self, opportunity: &Opportunity) -> Result<ValidationDecision> {
        let edge = opportunity.net_edge();
        if edge >= self.min_net_edge {
            Ok(ValidationDecision::confirm(format!(
                "net edge {edge} clears {}",
                self.min_net_edge
            )))
        } else {
            Ok(ValidationDecision::reject(format!(
                "net edge {edge} below {}",
                self.min_net_edge
            )))
        }
    }
}
