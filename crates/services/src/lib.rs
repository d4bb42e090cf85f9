#![forbid(unsafe_code)]

mod access;
pub mod analysis;
pub mod app_services;
pub mod assessment_service;
pub mod catalog;
pub mod error;
pub mod responses;
pub mod scoring;

pub use assess_core::Clock;

pub use analysis::SkillAnalyzer;
pub use app_services::AppServices;
pub use assessment_service::{AssessmentReport, AssessmentService};
pub use catalog::{AssessmentCatalog, AssessmentDetail};
pub use error::{AppServicesError, AssessmentError, ErrorKind};
pub use responses::ResponseRecorder;
pub use scoring::ScoringService;
