//! JSON shapes exchanged over HTTP.

use assess_core::model::{
    Assessment, AssessmentId, AssessmentSession, Question, QuestionContent, QuestionId, Response,
    ResponseId, SessionId, SessionStatus, SkillType,
};
use assess_core::scoring::RiskLevel;
use assess_core::skills::SkillAnalysisEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services::{AssessmentDetail, AssessmentReport};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDto {
    pub id: AssessmentId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub assessment_type: String,
    pub target_skills: Vec<SkillType>,
    pub difficulty_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    pub question_count: u32,
    pub passing_score: u8,
    pub created_at: DateTime<Utc>,
}

impl From<&Assessment> for AssessmentDto {
    fn from(a: &Assessment) -> Self {
        Self {
            id: a.id(),
            title: a.title().to_owned(),
            description: a.description().map(ToOwned::to_owned),
            assessment_type: a.kind().to_owned(),
            target_skills: a.target_skills().to_vec(),
            difficulty_level: a.difficulty_level(),
            estimated_duration: a.estimated_minutes(),
            question_count: a.question_count(),
            passing_score: a.passing_score(),
            created_at: a.created_at(),
        }
    }
}

/// A question as shown to the test taker; the canonical answer is withheld.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: QuestionId,
    pub skill_type: SkillType,
    pub content: QuestionContent,
    pub difficulty_level: u32,
}

impl From<&Question> for QuestionDto {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id(),
            skill_type: q.skill(),
            content: q.content().clone(),
            difficulty_level: q.difficulty(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetailDto {
    pub assessment: AssessmentDto,
    pub questions: Vec<QuestionDto>,
}

impl From<&AssessmentDetail> for AssessmentDetailDto {
    fn from(detail: &AssessmentDetail) -> Self {
        Self {
            assessment: AssessmentDto::from(&detail.assessment),
            questions: detail.questions.iter().map(QuestionDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDto {
    pub id: SessionId,
    pub assessment_id: AssessmentId,
    pub status: SessionStatus,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub score_percentage: Option<u8>,
    pub risk_level: Option<RiskLevel>,
    pub time_taken: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&AssessmentSession> for ResultDto {
    fn from(s: &AssessmentSession) -> Self {
        let outcome = s.outcome();
        Self {
            id: s.id(),
            assessment_id: s.assessment_id(),
            status: s.status(),
            total_questions: s.total_questions(),
            correct_answers: s.correct_answers(),
            score_percentage: outcome.map(|o| o.score_percentage()),
            risk_level: outcome.map(|o| o.risk_level()),
            time_taken: outcome.map(|o| o.time_taken_secs),
            started_at: s.started_at(),
            completed_at: s.completed_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAnalysisDto {
    pub skill_type: SkillType,
    pub correct: u32,
    pub total: u32,
    pub accuracy: f64,
    pub strength: assess_core::skills::StrengthTier,
}

impl From<&SkillAnalysisEntry> for SkillAnalysisDto {
    fn from(e: &SkillAnalysisEntry) -> Self {
        Self {
            skill_type: e.skill,
            correct: e.correct,
            total: e.total,
            accuracy: e.accuracy,
            strength: e.strength,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub result: ResultDto,
    pub skill_analysis: Vec<SkillAnalysisDto>,
    pub recommendations: Vec<String>,
    pub responses: u32,
}

impl From<&AssessmentReport> for ReportDto {
    fn from(report: &AssessmentReport) -> Self {
        Self {
            result: ResultDto::from(&report.session),
            skill_analysis: report.skill_analysis.iter().map(SkillAnalysisDto::from).collect(),
            recommendations: report.recommendations.clone(),
            responses: report.response_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: ResponseId,
    pub result_id: SessionId,
    pub question_id: QuestionId,
    pub user_answer: String,
    pub is_correct: bool,
    pub time_taken: u32,
    pub answered_at: DateTime<Utc>,
}

impl From<Response> for AnswerDto {
    fn from(r: Response) -> Self {
        Self {
            id: r.id,
            result_id: r.session_id,
            question_id: r.question_id,
            user_answer: r.submitted_answer,
            is_correct: r.is_correct,
            time_taken: r.elapsed_secs,
            answered_at: r.answered_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub result_id: SessionId,
    pub question_id: QuestionId,
    pub user_answer: String,
    #[serde(default)]
    pub time_taken: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub result_id: SessionId,
    #[serde(default)]
    pub time_taken: u32,
}
