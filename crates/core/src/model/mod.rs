mod assessment;
mod ids;
pub mod question;
mod response;
mod session;
mod skill;

pub use assessment::{Assessment, AssessmentDraft, AssessmentError};
pub use ids::{AssessmentId, ParseIdError, QuestionId, ResponseId, SessionId, UserId, UserIdError};
pub use question::{Question, QuestionContent, QuestionError};
pub use response::{NewResponse, Response};
pub use session::{AssessmentSession, SessionOutcome, SessionStateError, SessionStatus};
pub use skill::{SkillType, UnknownSkillType};
