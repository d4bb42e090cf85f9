use assess_core::model::{AssessmentSession, SessionId, UserId};
use storage::repository::SessionRepository;

use crate::error::AssessmentError;

/// Load a session and check that `user` owns it.
pub(crate) async fn load_owned_session(
    sessions: &dyn SessionRepository,
    user: &UserId,
    session_id: SessionId,
) -> Result<AssessmentSession, AssessmentError> {
    let session = sessions
        .get_session(session_id)
        .await?
        .ok_or(AssessmentError::SessionNotFound(session_id))?;
    if !session.is_owned_by(user) {
        tracing::warn!(%session_id, user = %user, "session access denied");
        return Err(AssessmentError::NotOwner(session_id));
    }
    Ok(session)
}
