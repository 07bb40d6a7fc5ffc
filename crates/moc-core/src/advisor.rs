//! Technical advice for change requests.
//!
//! The advisor is an optional collaborator. A failure never blocks the
//! workflow: `advice_or_fallback` logs it and returns [`FALLBACK_ADVICE`].

use thiserror::Error;

use crate::entities::ChangeRequest;

/// Text shown when no advisor answer is available.
pub const FALLBACK_ADVICE: &str =
    "Technical advisory is unavailable. Follow the site engineering standards and consult the process safety engineer.";

/// Failure of an advisory backend.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// No backend is configured.
    #[error("No advisor configured")]
    Unavailable,

    /// The backend answered with an error.
    #[error("Advisor request failed: {0}")]
    Request(String),
}

/// Source of free-text technical advice.
pub trait Advisor {
    /// Answer `prompt`, given a plain-text summary of the change as context.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError` if no answer could be produced.
    fn technical_advice(&self, prompt: &str, context: &str) -> Result<String, AdvisorError>;
}

/// Offline advisor. Always `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdvisor;

impl Advisor for NullAdvisor {
    fn technical_advice(&self, _prompt: &str, _context: &str) -> Result<String, AdvisorError> {
        Err(AdvisorError::Unavailable)
    }
}

/// Ask `advisor`, falling back to [`FALLBACK_ADVICE`] on any failure.
pub fn advice_or_fallback(advisor: &impl Advisor, prompt: &str, context: &str) -> String {
    match advisor.technical_advice(prompt, context) {
        Ok(answer) => answer,
        Err(error) => {
            tracing::warn!(%error, "advisor failed, using fallback advice");
            FALLBACK_ADVICE.to_string()
        }
    }
}

/// Plain-text context describing a change request for an advisor prompt.
#[must_use]
pub fn context_for(record: &ChangeRequest) -> String {
    let impacts = record.impacts().active();
    let impacts = if impacts.is_empty() {
        "none".to_string()
    } else {
        impacts.join(", ")
    };
    format!(
        "Change {id}: {title}\nStatus: {status}\nPriority: {priority}\nImpacts: {impacts}\nRisk: {score} ({tier})\n\n{description}",
        id = record.id(),
        title = record.title(),
        status = record.status(),
        priority = record.priority(),
        score = record.risk_score(),
        tier = record.risk_tier().label(),
        description = record.description(),
    )
}
