use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AssessmentId, QuestionId};
use crate::model::skill::SkillType;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question instruction cannot be empty")]
    EmptyInstruction,

    #[error("correct answer cannot be empty")]
    EmptyAnswer,

    #[error("difficulty must be >= 1")]
    InvalidDifficulty,
}

//
// ─── ANSWER MATCHING ───────────────────────────────────────────────────────────
//

/// Canonical form used for answer comparison: trimmed and lower-cased.
#[must_use]
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns true when `submitted` matches `canonical` after normalization.
#[must_use]
pub fn answers_match(submitted: &str, canonical: &str) -> bool {
    normalize_answer(submitted) == normalize_answer(canonical)
}

//
// ─── CONTENT ───────────────────────────────────────────────────────────────────
//

/// Presentation payload of a question. Opaque to scoring.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionContent {
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<String>,
}

impl QuestionContent {
    #[must_use]
    pub fn with_choices<I, S>(instruction: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            instruction: instruction.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            passage: None,
            media: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_passage(mut self, passage: impl Into<String>) -> Self {
        self.passage = Some(passage.into());
        self
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question from the question bank. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    assessment_id: AssessmentId,
    skill: SkillType,
    content: QuestionContent,
    correct_answer: String,
    difficulty: u32,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the instruction or answer is blank, or the
    /// difficulty is zero.
    pub fn new(
        id: QuestionId,
        assessment_id: AssessmentId,
        skill: SkillType,
        content: QuestionContent,
        correct_answer: impl Into<String>,
        difficulty: u32,
    ) -> Result<Self, QuestionError> {
        let correct_answer = correct_answer.into();
        if content.instruction.trim().is_empty() {
            return Err(QuestionError::EmptyInstruction);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if difficulty == 0 {
            return Err(QuestionError::InvalidDifficulty);
        }

        Ok(Self {
            id,
            assessment_id,
            skill,
            content,
            correct_answer,
            difficulty,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    #[must_use]
    pub fn skill(&self) -> SkillType {
        self.skill
    }

    #[must_use]
    pub fn content(&self) -> &QuestionContent {
        &self.content
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Checks a submitted answer against the canonical one.
    #[must_use]
    pub fn is_correct(&self, submitted: &str) -> bool {
        answers_match(submitted, &self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sight_word(answer: &str) -> Question {
        Question::new(
            QuestionId::new(1),
            AssessmentId::new(2),
            SkillType::SightWord,
            QuestionContent::with_choices("Which word says 'the'?", ["the", "a", "an", "is"]),
            answer,
            1,
        )
        .unwrap()
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let q = sight_word("the");
        assert!(q.is_correct(" The "));
        assert!(q.is_correct("THE"));
        assert!(!q.is_correct("a"));
        assert!(!q.is_correct("th e"));
    }

    #[test]
    fn canonical_answer_is_normalized_too() {
        let q = sight_word(" Brown ");
        assert!(q.is_correct("brown"));
    }

    #[test]
    fn rejects_invalid_questions() {
        let err = Question::new(
            QuestionId::new(1),
            AssessmentId::new(1),
            SkillType::Rhyme,
            QuestionContent::default(),
            "cat",
            1,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyInstruction);

        let err = Question::new(
            QuestionId::new(1),
            AssessmentId::new(1),
            SkillType::Rhyme,
            QuestionContent::with_choices("Which rhymes with hat?", ["cat", "dog"]),
            "cat",
            0,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::InvalidDifficulty);
    }

    #[test]
    fn content_serializes_without_empty_fields() {
        let content = QuestionContent::with_choices("Pick one", Vec::<String>::new());
        let json = serde_json::to_string(&content).unwrap();
        assert_eq!(json, r#"{"instruction":"Pick one"}"#);
    }
}
