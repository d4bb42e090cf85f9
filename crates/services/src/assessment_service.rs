use std::sync::Arc;

use assess_core::generate_recommendations;
use assess_core::model::{AssessmentId, AssessmentSession, SessionId, UserId};
use assess_core::scoring::{FinalScore, RiskLevel};
use assess_core::skills::SkillAnalysisEntry;
use assess_core::time::Clock;
use storage::repository::{AssessmentRepository, NewSessionRecord, SessionRepository, StorageError};

use crate::access::load_owned_session;
use crate::analysis::SkillAnalyzer;
use crate::error::AssessmentError;
use crate::scoring::ScoringService;

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Everything shown to the user once a session is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentReport {
    pub session: AssessmentSession,
    pub score: FinalScore,
    pub skill_analysis: Vec<SkillAnalysisEntry>,
    pub recommendations: Vec<String>,
    /// Number of recorded responses the breakdown was computed from.
    pub response_count: u32,
}

impl AssessmentReport {
    #[must_use]
    pub fn score_percentage(&self) -> u8 {
        self.score.score_percentage
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.score.risk_level
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Session lifecycle around a single assessment: start, finish, report, history.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    assessments: Arc<dyn AssessmentRepository>,
    sessions: Arc<dyn SessionRepository>,
    scoring: ScoringService,
    analyzer: SkillAnalyzer,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        assessments: Arc<dyn AssessmentRepository>,
        sessions: Arc<dyn SessionRepository>,
        scoring: ScoringService,
        analyzer: SkillAnalyzer,
    ) -> Self {
        Self {
            clock,
            assessments,
            sessions,
            scoring,
            analyzer,
        }
    }

    /// Open a new in-progress session for `user`.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentNotFound` if the assessment does not exist.
    pub async fn start_session(
        &self,
        user: &UserId,
        assessment_id: AssessmentId,
    ) -> Result<AssessmentSession, AssessmentError> {
        self.ensure_assessment(assessment_id).await?;

        let started_at = self.clock.now();
        let session_id = self
            .sessions
            .insert_session(NewSessionRecord {
                user_id: user.clone(),
                assessment_id,
                started_at,
            })
            .await
            .map_err(|e| match e {
                StorageError::NotFound => AssessmentError::AssessmentNotFound(assessment_id),
                other => other.into(),
            })?;

        tracing::info!(%session_id, %assessment_id, user = %user, "session started");
        Ok(AssessmentSession::start(
            session_id,
            user.clone(),
            assessment_id,
            started_at,
        ))
    }

    /// Finalize the session, then assemble its report.
    ///
    /// The terminal write commits before analysis runs; a failure while
    /// building the report leaves the session completed and the report can
    /// be fetched again with [`AssessmentService::session_report`].
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session is missing or belongs to another assessment.
    /// - `NotOwner`, `Completed` as for [`ScoringService::finalize`].
    pub async fn complete_session(
        &self,
        user: &UserId,
        assessment_id: AssessmentId,
        session_id: SessionId,
        time_taken_secs: u32,
    ) -> Result<AssessmentReport, AssessmentError> {
        let session = load_owned_session(self.sessions.as_ref(), user, session_id).await?;
        if session.assessment_id() != assessment_id {
            return Err(AssessmentError::SessionNotFound(session_id));
        }

        let completed = self
            .scoring
            .finalize(user, session_id, time_taken_secs)
            .await?;
        self.build_report(completed).await
    }

    /// Recompute the report of an already completed session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound`, `NotOwner` as usual.
    /// - `InProgress` if the session has not been finalized.
    pub async fn session_report(
        &self,
        user: &UserId,
        session_id: SessionId,
    ) -> Result<AssessmentReport, AssessmentError> {
        let session = load_owned_session(self.sessions.as_ref(), user, session_id).await?;
        self.build_report(session).await
    }

    /// The user's sessions for one assessment, completed ones first by completion time.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentNotFound` if the assessment does not exist.
    pub async fn list_results(
        &self,
        user: &UserId,
        assessment_id: AssessmentId,
    ) -> Result<Vec<AssessmentSession>, AssessmentError> {
        self.ensure_assessment(assessment_id).await?;
        Ok(self.sessions.sessions_for_user(user, assessment_id).await?)
    }

    async fn ensure_assessment(&self, assessment_id: AssessmentId) -> Result<(), AssessmentError> {
        match self.assessments.get_assessment(assessment_id).await? {
            Some(_) => Ok(()),
            None => Err(AssessmentError::AssessmentNotFound(assessment_id)),
        }
    }

    async fn build_report(
        &self,
        session: AssessmentSession,
    ) -> Result<AssessmentReport, AssessmentError> {
        let score = session
            .outcome()
            .map(|o| o.score)
            .ok_or(AssessmentError::InProgress)?;
        let skill_analysis = self.analyzer.analyze_session(session.id()).await?;
        let recommendations =
            generate_recommendations(&skill_analysis, score.risk_level, score.score_percentage);
        let response_count = skill_analysis.iter().map(|entry| entry.total).sum();

        Ok(AssessmentReport {
            session,
            score,
            skill_analysis,
            recommendations,
            response_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::ResponseRecorder;
    use assess_core::model::QuestionId;
    use assess_core::recommendations::{DAILY_PRACTICE_RECOMMENDATION, SPECIALIST_RECOMMENDATION};
    use assess_core::time::{fixed_clock, fixed_now};
    use storage::repository::Storage;
    use storage::seed::seed_screening;

    struct Harness {
        service: AssessmentService,
        recorder: ResponseRecorder,
        assessment_id: AssessmentId,
        questions: Vec<QuestionId>,
        user: UserId,
    }

    async fn harness() -> Harness {
        let storage = Storage::in_memory();
        let assessment_id = seed_screening(&storage, fixed_now()).await.unwrap();
        let questions = storage
            .questions
            .questions_for_assessment(assessment_id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id())
            .collect();
        let clock = fixed_clock();
        let scoring = ScoringService::new(clock, Arc::clone(&storage.sessions));
        let analyzer = SkillAnalyzer::new(
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.responses),
        );
        let service = AssessmentService::new(
            clock,
            Arc::clone(&storage.assessments),
            Arc::clone(&storage.sessions),
            scoring,
            analyzer,
        );
        let recorder = ResponseRecorder::new(
            clock,
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.questions),
        );
        Harness {
            service,
            recorder,
            assessment_id,
            questions,
            user: UserId::new("reader").unwrap(),
        }
    }

    #[tokio::test]
    async fn complete_session_builds_report() {
        let h = harness().await;
        let session = h
            .service
            .start_session(&h.user, h.assessment_id)
            .await
            .unwrap();

        // two of three sight words, both letter sounds wrong
        for (idx, answer) in [(0, "the"), (1, "and"), (2, "cap"), (3, "w"), (4, "h")] {
            h.recorder
                .record_response(&h.user, session.id(), h.questions[idx], answer, 4)
                .await
                .unwrap();
        }

        let report = h
            .service
            .complete_session(&h.user, h.assessment_id, session.id(), 120)
            .await
            .unwrap();
        assert_eq!(report.score_percentage(), 40);
        assert_eq!(report.risk_level(), RiskLevel::High);
        assert_eq!(report.session.total_questions(), 5);
        assert_eq!(report.skill_analysis.len(), 2);
        assert_eq!(report.response_count, 5);
        assert_eq!(
            report.recommendations,
            vec![
                "Focus on improving letter sound skills through targeted practice exercises."
                    .to_owned(),
                SPECIALIST_RECOMMENDATION.to_owned(),
                DAILY_PRACTICE_RECOMMENDATION.to_owned(),
            ]
        );

        let again = h.service.session_report(&h.user, session.id()).await.unwrap();
        assert_eq!(again, report);
    }

    #[tokio::test]
    async fn report_requires_completion() {
        let h = harness().await;
        let session = h
            .service
            .start_session(&h.user, h.assessment_id)
            .await
            .unwrap();
        let err = h
            .service
            .session_report(&h.user, session.id())
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::InProgress));
    }

    #[tokio::test]
    async fn complete_checks_assessment_scope() {
        let h = harness().await;
        let session = h
            .service
            .start_session(&h.user, h.assessment_id)
            .await
            .unwrap();
        let err = h
            .service
            .complete_session(&h.user, AssessmentId::new(9_999), session.id(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn start_and_list_results() {
        let h = harness().await;
        let err = h
            .service
            .start_session(&h.user, AssessmentId::new(9_999))
            .await
            .unwrap_err();
        assert!(matches!(err, AssessmentError::AssessmentNotFound(_)));

        let first = h
            .service
            .start_session(&h.user, h.assessment_id)
            .await
            .unwrap();
        let second = h
            .service
            .start_session(&h.user, h.assessment_id)
            .await
            .unwrap();
        h.service
            .complete_session(&h.user, h.assessment_id, second.id(), 3)
            .await
            .unwrap();

        let results = h
            .service
            .list_results(&h.user, h.assessment_id)
            .await
            .unwrap();
        let ids: Vec<_> = results.iter().map(AssessmentSession::id).collect();
        assert_eq!(ids, vec![second.id(), first.id()]);

        let stranger = UserId::new("someone-else").unwrap();
        assert!(
            h.service
                .list_results(&stranger, h.assessment_id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
