//! Shared test utilities for sp-db unit tests.

use sp_core::enums::SessionStatus;
use sp_core::identity::ParticipantIdentity;

use crate::SpDb;
use crate::repos::session::SessionProposal;
use crate::service::VoteService;

/// Create an in-memory `VoteService`.
pub async fn test_service() -> VoteService {
    let db = SpDb::open_local(":memory:").await.unwrap();
    VoteService::from_db(db)
}

pub fn host() -> ParticipantIdentity {
    ParticipantIdentity::new("usr-host").with_display_name("Host")
}

/// Propose a session and approve it so it accepts votes. Returns its ID.
pub async fn approved_session(svc: &VoteService, title: &str) -> String {
    let session = svc
        .propose_session(&host(), &SessionProposal::new(title))
        .await
        .unwrap();
    svc.transition_session(&session.id, SessionStatus::Approved)
        .await
        .unwrap();
    session.id
}
