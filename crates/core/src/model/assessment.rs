use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::AssessmentId;
use crate::model::skill::SkillType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment title cannot be empty")]
    EmptyTitle,

    #[error("assessment kind cannot be empty")]
    EmptyKind,

    #[error("difficulty level must be >= 1")]
    InvalidDifficulty,

    #[error("passing score must be between 0 and 100, got {0}")]
    InvalidPassingScore(u8),
}

/// Descriptive metadata for a standardized assessment.
///
/// Scoring does not depend on any of these fields; they are surfaced to the
/// presentation layer when listing assessments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    id: AssessmentId,
    title: String,
    description: Option<String>,
    kind: String,
    target_skills: Vec<SkillType>,
    difficulty_level: u32,
    estimated_minutes: Option<u32>,
    question_count: u32,
    passing_score: u8,
    created_at: DateTime<Utc>,
}

/// Builder-style input for `Assessment::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDraft {
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub target_skills: Vec<SkillType>,
    pub difficulty_level: u32,
    pub estimated_minutes: Option<u32>,
    pub question_count: u32,
    pub passing_score: u8,
}

impl AssessmentDraft {
    /// Draft with the defaults the question bank uses (difficulty 1, passing score 70).
    #[must_use]
    pub fn new(title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind: kind.into(),
            target_skills: Vec::new(),
            difficulty_level: 1,
            estimated_minutes: None,
            question_count: 0,
            passing_score: 70,
        }
    }

    /// Validate the draft and attach an identifier.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` when a field is out of range.
    pub fn validate(
        self,
        id: AssessmentId,
        created_at: DateTime<Utc>,
    ) -> Result<Assessment, AssessmentError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(AssessmentError::EmptyTitle);
        }
        let kind = self.kind.trim().to_owned();
        if kind.is_empty() {
            return Err(AssessmentError::EmptyKind);
        }
        if self.difficulty_level == 0 {
            return Err(AssessmentError::InvalidDifficulty);
        }
        if self.passing_score > 100 {
            return Err(AssessmentError::InvalidPassingScore(self.passing_score));
        }

        Ok(Assessment {
            id,
            title,
            description: self
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            kind,
            target_skills: self.target_skills,
            difficulty_level: self.difficulty_level,
            estimated_minutes: self.estimated_minutes,
            question_count: self.question_count,
            passing_score: self.passing_score,
            created_at,
        })
    }
}

impl Assessment {
    #[must_use]
    pub fn id(&self) -> AssessmentId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn target_skills(&self) -> &[SkillType] {
        &self.target_skills
    }

    #[must_use]
    pub fn difficulty_level(&self) -> u32 {
        self.difficulty_level
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> Option<u32> {
        self.estimated_minutes
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn passing_score(&self) -> u8 {
        self.passing_score
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Converts back into a draft, e.g. to re-insert under a new id.
    #[must_use]
    pub fn to_draft(&self) -> AssessmentDraft {
        AssessmentDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind.clone(),
            target_skills: self.target_skills.clone(),
            difficulty_level: self.difficulty_level,
            estimated_minutes: self.estimated_minutes,
            question_count: self.question_count,
            passing_score: self.passing_score,
        }
    }
}
