#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod recommendations;
pub mod scoring;
pub mod skills;
pub mod time;

pub use error::Error;
pub use recommendations::generate_recommendations;
pub use scoring::{FinalScore, RiskLevel, score_percentage};
pub use skills::{SkillAnalysisEntry, StrengthTier, analyze_skills};
pub use time::Clock;
