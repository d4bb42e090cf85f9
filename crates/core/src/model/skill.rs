use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown skill type: {0}")]
pub struct UnknownSkillType(pub String);

/// Reading sub-skill a question measures.
///
/// The snake_case tag is the stored and serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    PhonemeIsolation,
    Blending,
    Segmentation,
    Rhyme,
    SightWord,
    LetterSound,
    ReadingFluency,
    Comprehension,
}

impl SkillType {
    pub const ALL: [SkillType; 8] = [
        SkillType::PhonemeIsolation,
        SkillType::Blending,
        SkillType::Segmentation,
        SkillType::Rhyme,
        SkillType::SightWord,
        SkillType::LetterSound,
        SkillType::ReadingFluency,
        SkillType::Comprehension,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::PhonemeIsolation => "phoneme_isolation",
            SkillType::Blending => "blending",
            SkillType::Segmentation => "segmentation",
            SkillType::Rhyme => "rhyme",
            SkillType::SightWord => "sight_word",
            SkillType::LetterSound => "letter_sound",
            SkillType::ReadingFluency => "reading_fluency",
            SkillType::Comprehension => "comprehension",
        }
    }

    /// Human-readable name: underscores become spaces, lower-cased.
    #[must_use]
    pub fn display_name(self) -> String {
        self.as_str().replace('_', " ").to_lowercase()
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillType {
    type Err = UnknownSkillType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillType::ALL
            .into_iter()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| UnknownSkillType(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        for skill in SkillType::ALL {
            assert_eq!(skill.as_str().parse::<SkillType>().unwrap(), skill);
        }
        assert!("phonics".parse::<SkillType>().is_err());
    }

    #[test]
    fn display_name_replaces_underscores() {
        assert_eq!(SkillType::PhonemeIsolation.display_name(), "phoneme isolation");
        assert_eq!(SkillType::Blending.display_name(), "blending");
    }

    #[test]
    fn serde_uses_snake_case_tag() {
        let json = serde_json::to_string(&SkillType::SightWord).unwrap();
        assert_eq!(json, "\"sight_word\"");
    }
}
