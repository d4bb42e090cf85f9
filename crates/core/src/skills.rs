//! Per-skill breakdown of a session's responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::SkillType;

/// Strength band for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTier {
    Strong,
    Developing,
    NeedsSupport,
}

impl StrengthTier {
    /// Classify an accuracy percentage: `< 50` needs support, `< 75` developing, else strong.
    #[must_use]
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy < 50.0 {
            StrengthTier::NeedsSupport
        } else if accuracy < 75.0 {
            StrengthTier::Developing
        } else {
            StrengthTier::Strong
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StrengthTier::Strong => "strong",
            StrengthTier::Developing => "developing",
            StrengthTier::NeedsSupport => "needs_support",
        }
    }
}

/// Accuracy statistics for one skill type within one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysisEntry {
    pub skill: SkillType,
    pub correct: u32,
    pub total: u32,
    pub accuracy: f64,
    pub strength: StrengthTier,
}

impl SkillAnalysisEntry {
    /// Build an entry from raw counts. Returns `None` when `total` is zero.
    #[must_use]
    pub fn from_counts(skill: SkillType, correct: u32, total: u32) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let correct = correct.min(total);
        let accuracy = 100.0 * f64::from(correct) / f64::from(total);
        Some(Self {
            skill,
            correct,
            total,
            accuracy,
            strength: StrengthTier::from_accuracy(accuracy),
        })
    }
}

/// Group `(skill, is_correct)` pairs by skill and classify each group.
///
/// Output is sorted by the skill's tag name so repeated calls over the same
/// responses are identical regardless of input order.
pub fn analyze_skills<I>(answers: I) -> Vec<SkillAnalysisEntry>
where
    I: IntoIterator<Item = (SkillType, bool)>,
{
    let mut counts: BTreeMap<&'static str, (SkillType, u32, u32)> = BTreeMap::new();
    for (skill, is_correct) in answers {
        let entry = counts.entry(skill.as_str()).or_insert((skill, 0, 0));
        entry.2 = entry.2.saturating_add(1);
        if is_correct {
            entry.1 = entry.1.saturating_add(1);
        }
    }

    counts
        .into_values()
        .filter_map(|(skill, correct, total)| SkillAnalysisEntry::from_counts(skill, correct, total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(skill: SkillType, correct: u32, total: u32) -> SkillAnalysisEntry {
        SkillAnalysisEntry::from_counts(skill, correct, total).unwrap()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(entry(SkillType::Rhyme, 49, 100).strength, StrengthTier::NeedsSupport);
        assert_eq!(entry(SkillType::Rhyme, 50, 100).strength, StrengthTier::Developing);
        assert_eq!(entry(SkillType::Rhyme, 74, 100).strength, StrengthTier::Developing);
        assert_eq!(entry(SkillType::Rhyme, 75, 100).strength, StrengthTier::Strong);
        assert_eq!(StrengthTier::from_accuracy(74.99), StrengthTier::Developing);
    }

    #[test]
    fn zero_total_yields_no_entry() {
        assert!(SkillAnalysisEntry::from_counts(SkillType::Blending, 0, 0).is_none());
    }

    #[test]
    fn groups_and_sorts_by_tag_name() {
        let answers = vec![
            (SkillType::SightWord, true),
            (SkillType::Blending, false),
            (SkillType::SightWord, false),
            (SkillType::Blending, true),
            (SkillType::Blending, false),
            (SkillType::Comprehension, true),
        ];
        let entries = analyze_skills(answers);

        let skills: Vec<_> = entries.iter().map(|e| e.skill).collect();
        assert_eq!(
            skills,
            vec![SkillType::Blending, SkillType::Comprehension, SkillType::SightWord]
        );
        assert_eq!((entries[0].correct, entries[0].total), (1, 3));
        assert_eq!(entries[0].strength, StrengthTier::NeedsSupport);
        assert_eq!(entries[1].accuracy, 100.0);
        assert_eq!(entries[2].strength, StrengthTier::Developing);
    }

    #[test]
    fn analysis_is_stable_across_input_order() {
        let forward = vec![
            (SkillType::Rhyme, true),
            (SkillType::LetterSound, false),
            (SkillType::Segmentation, true),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(analyze_skills(forward), analyze_skills(reversed));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(analyze_skills(Vec::new()).is_empty());
    }
}
