use std::sync::Arc;

use assess_core::model::SessionId;
use assess_core::skills::{SkillAnalysisEntry, analyze_skills};
use storage::repository::{ResponseRepository, SessionRepository};

use crate::error::AssessmentError;

/// Per-skill accuracy over a session's recorded responses.
#[derive(Clone)]
pub struct SkillAnalyzer {
    sessions: Arc<dyn SessionRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl SkillAnalyzer {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            sessions,
            responses,
        }
    }

    /// Group the session's responses by skill type, sorted by tag name.
    ///
    /// A session with no responses yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the session does not exist.
    pub async fn analyze_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<SkillAnalysisEntry>, AssessmentError> {
        if self.sessions.get_session(session_id).await?.is_none() {
            return Err(AssessmentError::SessionNotFound(session_id));
        }
        let scored = self.responses.responses_with_skills(session_id).await?;
        Ok(analyze_skills(
            scored.iter().map(|r| (r.skill, r.response.is_correct)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{NewResponse, UserId};
    use assess_core::skills::StrengthTier;
    use assess_core::time::fixed_now;
    use storage::repository::{NewSessionRecord, Storage};
    use storage::seed::seed_screening;

    #[tokio::test]
    async fn groups_seeded_answers_by_skill() {
        let storage = Storage::in_memory();
        let assessment_id = seed_screening(&storage, fixed_now()).await.unwrap();
        let questions = storage
            .questions
            .questions_for_assessment(assessment_id)
            .await
            .unwrap();
        let session_id = storage
            .sessions
            .insert_session(NewSessionRecord {
                user_id: UserId::new("reader").unwrap(),
                assessment_id,
                started_at: fixed_now(),
            })
            .await
            .unwrap();

        // sight words 2/3, letter sounds 0/2, fluency 1/1, comprehension 0/1
        let answers = ["the", "and", "cap", "b", "m", "completed", "black"];
        for (question, answer) in questions.iter().zip(answers) {
            storage
                .sessions
                .record_response(NewResponse {
                    session_id,
                    question_id: question.id(),
                    submitted_answer: answer.into(),
                    is_correct: question.is_correct(answer),
                    elapsed_secs: 1,
                    answered_at: fixed_now(),
                })
                .await
                .unwrap();
        }

        let analyzer = SkillAnalyzer::new(
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.responses),
        );
        let entries = analyzer.analyze_session(session_id).await.unwrap();
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.skill.as_str(), e.correct, e.total, e.strength))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("comprehension", 0, 1, StrengthTier::NeedsSupport),
                ("letter_sound", 0, 2, StrengthTier::NeedsSupport),
                ("reading_fluency", 1, 1, StrengthTier::Strong),
                ("sight_word", 2, 3, StrengthTier::Developing),
            ]
        );
    }

    #[tokio::test]
    async fn empty_and_missing_sessions() {
        let storage = Storage::in_memory();
        let assessment_id = seed_screening(&storage, fixed_now()).await.unwrap();
        let session_id = storage
            .sessions
            .insert_session(NewSessionRecord {
                user_id: UserId::new("reader").unwrap(),
                assessment_id,
                started_at: fixed_now(),
            })
            .await
            .unwrap();
        let analyzer = SkillAnalyzer::new(
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.responses),
        );

        assert!(analyzer.analyze_session(session_id).await.unwrap().is_empty());
        let err = analyzer
            .analyze_session(SessionId::new(4_040))
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::SessionNotFound(_)));
    }
}
