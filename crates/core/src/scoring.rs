//! Final score and risk classification for a completed assessment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── RISK LEVEL ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown risk level: {0}")]
pub struct UnknownRiskLevel(pub String);

/// Coarse severity band derived from the final score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Exclusive upper bounds, checked in ascending order; anything above is `Low`.
const RISK_BANDS: [(u8, RiskLevel); 3] = [
    (40, RiskLevel::VeryHigh),
    (60, RiskLevel::High),
    (75, RiskLevel::Moderate),
];

impl RiskLevel {
    /// Classify a score percentage.
    #[must_use]
    pub fn from_score(score_percentage: u8) -> Self {
        RISK_BANDS
            .iter()
            .find(|(bound, _)| score_percentage < *bound)
            .map_or(RiskLevel::Low, |(_, level)| *level)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }

    #[must_use]
    pub fn is_low(self) -> bool {
        matches!(self, RiskLevel::Low)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            "very_high" => Ok(RiskLevel::VeryHigh),
            other => Err(UnknownRiskLevel(other.to_owned())),
        }
    }
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Percentage of correct answers, rounded half-up to an integer in `0..=100`.
///
/// Returns 0 when no questions were answered. A `correct` larger than `total`
/// is clamped to `total`.
#[must_use]
pub fn score_percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    // round(100c/t) == floor((200c + t) / 2t) for non-negative values
    let pct = (200 * correct + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100)
}

/// Derived fields written onto a session when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score_percentage: u8,
    pub risk_level: RiskLevel,
}

impl FinalScore {
    #[must_use]
    pub fn from_totals(correct: u32, total: u32) -> Self {
        let score_percentage = score_percentage(correct, total);
        Self {
            score_percentage,
            risk_level: RiskLevel::from_score(score_percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(74), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
    }

    #[test]
    fn empty_session_scores_zero_and_very_high() {
        let score = FinalScore::from_totals(0, 0);
        assert_eq!(score.score_percentage, 0);
        assert_eq!(score.risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(score_percentage(7, 10), 70);
        assert_eq!(score_percentage(1, 8), 13); // 12.5
        assert_eq!(score_percentage(2, 3), 67); // 66.67
        assert_eq!(score_percentage(1, 3), 33); // 33.33
        assert_eq!(score_percentage(10, 10), 100);
        assert_eq!(score_percentage(0, 10), 0);
    }

    #[test]
    fn overfull_totals_are_clamped() {
        assert_eq!(score_percentage(12, 10), 100);
    }

    #[test]
    fn seven_of_ten_is_moderate() {
        let score = FinalScore::from_totals(7, 10);
        assert_eq!(score.score_percentage, 70);
        assert_eq!(score.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn risk_level_tags_round_trip() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::VeryHigh,
        ] {
            assert_eq!(level.as_str().parse::<RiskLevel>().unwrap(), level);
        }
        assert_eq!(
            serde_json::to_string(&RiskLevel::VeryHigh).unwrap(),
            "\"very_high\""
        );
    }
}
