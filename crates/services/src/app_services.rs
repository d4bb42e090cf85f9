use std::sync::Arc;

use storage::repository::Storage;

use crate::analysis::SkillAnalyzer;
use crate::assessment_service::AssessmentService;
use crate::catalog::AssessmentCatalog;
use crate::error::AppServicesError;
use crate::responses::ResponseRecorder;
use crate::scoring::ScoringService;
use crate::Clock;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<AssessmentCatalog>,
    recorder: Arc<ResponseRecorder>,
    assessments: Arc<AssessmentService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let scoring = ScoringService::new(clock, Arc::clone(&storage.sessions));
        let analyzer = SkillAnalyzer::new(
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.responses),
        );
        let assessments = Arc::new(AssessmentService::new(
            clock,
            Arc::clone(&storage.assessments),
            Arc::clone(&storage.sessions),
            scoring,
            analyzer,
        ));
        let recorder = Arc::new(ResponseRecorder::new(
            clock,
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.questions),
        ));
        let catalog = Arc::new(AssessmentCatalog::new(
            Arc::clone(&storage.assessments),
            Arc::clone(&storage.questions),
        ));

        Self {
            catalog,
            recorder,
            assessments,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<AssessmentCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn recorder(&self) -> Arc<ResponseRecorder> {
        Arc::clone(&self.recorder)
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }
}
