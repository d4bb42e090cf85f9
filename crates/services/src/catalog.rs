use std::sync::Arc;

use assess_core::model::{Assessment, AssessmentId, Question};
use storage::repository::{AssessmentRepository, QuestionRepository};

use crate::error::AssessmentError;

/// An assessment together with its question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDetail {
    pub assessment: Assessment,
    pub questions: Vec<Question>,
}

/// Read-only access to the available assessments.
#[derive(Clone)]
pub struct AssessmentCatalog {
    assessments: Arc<dyn AssessmentRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl AssessmentCatalog {
    #[must_use]
    pub fn new(
        assessments: Arc<dyn AssessmentRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            assessments,
            questions,
        }
    }

    /// All assessments, easiest first.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Storage` on backend failures.
    pub async fn list_assessments(&self) -> Result<Vec<Assessment>, AssessmentError> {
        Ok(self.assessments.list_assessments().await?)
    }

    /// # Errors
    ///
    /// Returns `AssessmentNotFound` if the assessment does not exist.
    pub async fn assessment_with_questions(
        &self,
        id: AssessmentId,
    ) -> Result<AssessmentDetail, AssessmentError> {
        let assessment = self
            .assessments
            .get_assessment(id)
            .await?
            .ok_or(AssessmentError::AssessmentNotFound(id))?;
        let questions = self.questions.questions_for_assessment(id).await?;
        Ok(AssessmentDetail {
            assessment,
            questions,
        })
    }
}
