//! Remediation guidance derived from a finished session.

use std::collections::HashSet;

use crate::scoring::RiskLevel;
use crate::skills::SkillAnalysisEntry;

/// Skills below this accuracy get a targeted-practice line.
const WEAK_SKILL_ACCURACY: f64 = 50.0;

/// Scores below this suggest involving a specialist.
const SPECIALIST_SCORE: u8 = 60;

pub const SPECIALIST_RECOMMENDATION: &str =
    "Consider working with a reading specialist or educational therapist for personalized support.";

pub const DAILY_PRACTICE_RECOMMENDATION: &str =
    "Regular practice sessions (15-20 minutes daily) can help improve reading skills.";

fn weak_skill_recommendation(entry: &SkillAnalysisEntry) -> String {
    format!(
        "Focus on improving {} skills through targeted practice exercises.",
        entry.skill.display_name()
    )
}

/// Build the ordered recommendation list.
///
/// Rules run in a fixed order:
/// 1. one line per weak skill (accuracy < 50), in the order of `entries`;
/// 2. the specialist line when `score_percentage < 60`;
/// 3. the daily-practice line when the risk level is not low.
#[must_use]
pub fn generate_recommendations(
    entries: &[SkillAnalysisEntry],
    risk_level: RiskLevel,
    score_percentage: u8,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for entry in entries {
        if entry.accuracy < WEAK_SKILL_ACCURACY && seen.insert(entry.skill) {
            out.push(weak_skill_recommendation(entry));
        }
    }

    if score_percentage < SPECIALIST_SCORE {
        out.push(SPECIALIST_RECOMMENDATION.to_owned());
    }

    if !risk_level.is_low() {
        out.push(DAILY_PRACTICE_RECOMMENDATION.to_owned());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SkillType;

    fn entry(skill: SkillType, correct: u32, total: u32) -> SkillAnalysisEntry {
        SkillAnalysisEntry::from_counts(skill, correct, total).unwrap()
    }

    #[test]
    fn worked_example_ordering() {
        let entries = vec![
            entry(SkillType::PhonemeIsolation, 15, 20),
            entry(SkillType::Blending, 5, 15),
        ];
        let recs = generate_recommendations(&entries, RiskLevel::Moderate, 55);
        assert_eq!(
            recs,
            vec![
                "Focus on improving blending skills through targeted practice exercises.",
                "Consider working with a reading specialist or educational therapist for personalized support.",
                "Regular practice sessions (15-20 minutes daily) can help improve reading skills.",
            ]
        );
    }

    #[test]
    fn low_risk_high_score_yields_nothing() {
        let entries = vec![entry(SkillType::Rhyme, 9, 10)];
        assert!(generate_recommendations(&entries, RiskLevel::Low, 90).is_empty());
    }

    #[test]
    fn multi_word_skill_names_are_spaced() {
        let entries = vec![entry(SkillType::LetterSound, 1, 4)];
        let recs = generate_recommendations(&entries, RiskLevel::Low, 80);
        assert_eq!(
            recs,
            vec!["Focus on improving letter sound skills through targeted practice exercises."]
        );
    }

    #[test]
    fn weak_skills_follow_input_order_and_dedupe() {
        let entries = vec![
            entry(SkillType::Segmentation, 0, 2),
            entry(SkillType::Blending, 1, 4),
            entry(SkillType::Segmentation, 1, 3),
        ];
        let recs = generate_recommendations(&entries, RiskLevel::VeryHigh, 20);
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("segmentation"));
        assert!(recs[1].contains("blending"));
        assert_eq!(recs[2], SPECIALIST_RECOMMENDATION);
        assert_eq!(recs[3], DAILY_PRACTICE_RECOMMENDATION);
    }

    #[test]
    fn exactly_fifty_percent_is_not_weak() {
        let entries = vec![entry(SkillType::Comprehension, 1, 2)];
        let recs = generate_recommendations(&entries, RiskLevel::High, 50);
        assert_eq!(recs, vec![SPECIALIST_RECOMMENDATION, DAILY_PRACTICE_RECOMMENDATION]);
    }
}
