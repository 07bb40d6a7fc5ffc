//! Risk scoring.
//!
//! Two input shapes produce a single integer score:
//!
//! - quick estimate: `base(priority) + 2 * impacts.count()`
//! - detailed assessment: `probability * severity`, both in `1..=5`
//!
//! `classify` is the only place that knows the tier thresholds. The emergency
//! paths pin the score to [`EMERGENCY_SCORE`]; that override is applied by
//! [`derive_score`] as its own branch, never through either formula.

use chrono::Utc;

use crate::entities::{ChangeRequest, Impacts, RiskAssessment};
use crate::enums::{Priority, RiskTier};
use crate::errors::RiskError;

/// Fixed score of an emergency fast-track or bypass.
pub const EMERGENCY_SCORE: u32 = 25;

/// Points added per impact flag in the quick estimate.
pub const IMPACT_WEIGHT: u32 = 2;

const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Base score of a priority in the quick estimate.
#[must_use]
pub const fn base_score(priority: Priority) -> u32 {
    match priority {
        Priority::Critical => 15,
        Priority::High => 10,
        Priority::Medium => 5,
        Priority::Low => 2,
    }
}

/// Quick-estimate score from priority and impact flags.
#[must_use]
pub fn estimate(priority: Priority, impacts: Impacts) -> u32 {
    base_score(priority) + IMPACT_WEIGHT * impacts.count()
}

/// Probability × severity score.
///
/// # Errors
///
/// Returns `RiskError::InvalidScoreInput` if either rating is outside `1..=5`.
pub fn compute_pxs(probability: i64, severity: i64) -> Result<u32, RiskError> {
    let probability = rating("probability", probability)?;
    let severity = rating("severity", severity)?;
    Ok(u32::from(probability) * u32::from(severity))
}

fn rating(field: &'static str, value: i64) -> Result<u8, RiskError> {
    if !RATING_RANGE.contains(&value) {
        return Err(RiskError::InvalidScoreInput { field, value });
    }
    u8::try_from(value).map_err(|_| RiskError::InvalidScoreInput { field, value })
}

/// Tier of a score.
///
/// | score | tier |
/// |---|---|
/// | ≥ 15 | critical |
/// | 8–14 | high |
/// | 4–7 | medium |
/// | < 4 | low |
#[must_use]
pub const fn classify(score: u32) -> RiskTier {
    if score >= 15 {
        RiskTier::Critical
    } else if score >= 8 {
        RiskTier::High
    } else if score >= 4 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// The score a record must carry given its inputs.
///
/// Precedence: emergency override, then detailed assessment, then estimate.
#[must_use]
pub fn derive_score(record: &ChangeRequest) -> u32 {
    if record.emergency_override {
        return EMERGENCY_SCORE;
    }
    match &record.risk_assessment {
        Some(assessment) => assessment.score,
        None => estimate(record.priority, record.impacts),
    }
}

impl RiskAssessment {
    /// Build a validated assessment stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::InvalidScoreInput` if either rating is outside `1..=5`.
    pub fn new(
        probability: i64,
        severity: i64,
        rationale: impl Into<String>,
    ) -> Result<Self, RiskError> {
        let score = compute_pxs(probability, severity)?;
        Ok(Self {
            probability: rating("probability", probability)?,
            severity: rating("severity", severity)?,
            score,
            rationale: rationale.into(),
            assessed_at: Utc::now(),
        })
    }

    #[must_use]
    pub const fn tier(&self) -> RiskTier {
        classify(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn impacts_from_mask(mask: u8) -> Impacts {
        Impacts {
            safety: mask & 0b00001 != 0,
            environmental: mask & 0b00010 != 0,
            operational: mask & 0b00100 != 0,
            regulatory: mask & 0b01000 != 0,
            emergency: mask & 0b10000 != 0,
        }
    }

    #[test]
    fn estimate_over_all_priorities_and_impact_subsets() {
        for priority in Priority::ALL {
            for mask in 0u8..32 {
                let impacts = impacts_from_mask(mask);
                let expected = base_score(priority) + 2 * mask.count_ones();
                assert_eq!(
                    estimate(priority, impacts),
                    expected,
                    "{priority} with mask {mask:05b}"
                );
            }
        }
    }

    #[rstest]
    #[case(Priority::Critical, 15)]
    #[case(Priority::High, 10)]
    #[case(Priority::Medium, 5)]
    #[case(Priority::Low, 2)]
    fn base_table(#[case] priority: Priority, #[case] base: u32) {
        assert_eq!(base_score(priority), base);
        assert_eq!(estimate(priority, Impacts::default()), base);
    }

    #[rstest]
    #[case(0, RiskTier::Low)]
    #[case(3, RiskTier::Low)]
    #[case(4, RiskTier::Medium)]
    #[case(7, RiskTier::Medium)]
    #[case(8, RiskTier::High)]
    #[case(14, RiskTier::High)]
    #[case(15, RiskTier::Critical)]
    #[case(25, RiskTier::Critical)]
    #[case(u32::MAX, RiskTier::Critical)]
    fn classify_boundaries(#[case] score: u32, #[case] tier: RiskTier) {
        assert_eq!(classify(score), tier);
    }

    #[test]
    fn pxs_is_product_for_valid_ratings() {
        for p in 1..=5 {
            for s in 1..=5 {
                let expected = u32::try_from(p * s).unwrap();
                assert_eq!(compute_pxs(p, s).unwrap(), expected);
            }
        }
    }

    #[rstest]
    #[case(0, 3, "probability", 0)]
    #[case(6, 3, "probability", 6)]
    #[case(3, -1, "severity", -1)]
    #[case(3, 0, "severity", 0)]
    #[case(-4, 9, "probability", -4)]
    fn pxs_rejects_out_of_range(
        #[case] p: i64,
        #[case] s: i64,
        #[case] field: &'static str,
        #[case] value: i64,
    ) {
        let err = compute_pxs(p, s).unwrap_err();
        assert_eq!(err, RiskError::InvalidScoreInput { field, value });
    }

    #[test]
    fn critical_safety_regulatory_scenario() {
        let impacts = Impacts {
            safety: true,
            regulatory: true,
            ..Impacts::default()
        };
        let score = estimate(Priority::Critical, impacts);
        assert_eq!(score, 19);
        assert_eq!(classify(score), RiskTier::Critical);
    }

    #[test]
    fn assessment_carries_product_and_tier() {
        let assessment = RiskAssessment::new(4, 3, "corrosion under insulation").unwrap();
        assert_eq!(assessment.probability, 4);
        assert_eq!(assessment.severity, 3);
        assert_eq!(assessment.score, 12);
        assert_eq!(assessment.tier(), RiskTier::High);
    }

    #[test]
    fn assessment_rejects_bad_rating() {
        assert!(RiskAssessment::new(5, 6, "").is_err());
    }
}
