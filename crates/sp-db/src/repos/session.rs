//! Session repository: proposals, lookup, filtered listing, status transitions.

use chrono::Utc;

use sp_core::entities::Session;
use sp_core::enums::{SessionFormat, SessionSort, SessionStatus};
use sp_core::identity::ParticipantIdentity;

use crate::error::DatabaseError;
use crate::helpers::{
    encode_tags, get_credits, get_opt_string, parse_datetime, parse_enum, parse_tags,
};
use crate::service::VoteService;

/// ID prefix for sessions, e.g. `"ses-a3f8b2c1"`.
pub const PREFIX_SESSION: &str = "ses";

const SELECT_COLS: &str = "id, title, description, format, duration_minutes, host_id, host_name, \
     topic_tags, status, total_votes, voter_count, total_credits, created_at, updated_at";

fn row_to_session(row: &libsql::Row) -> Result<Session, DatabaseError> {
    let duration = row.get::<i64>(4)?;
    Ok(Session {
        id: row.get(0)?,
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        format: parse_enum(&row.get::<String>(3)?)?,
        duration_minutes: u32::try_from(duration)
            .map_err(|_| DatabaseError::Query(format!("Invalid duration_minutes {duration}")))?,
        host_id: get_opt_string(row, 5)?,
        host_name: get_opt_string(row, 6)?,
        topic_tags: parse_tags(get_opt_string(row, 7)?.as_deref())?,
        status: parse_enum(&row.get::<String>(8)?)?,
        total_votes: get_credits(row, 9, "total_votes")?,
        voter_count: get_credits(row, 10, "voter_count")?,
        total_credits: get_credits(row, 11, "total_credits")?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

/// Every session, unordered. Used by the aggregate rebuild.
pub(crate) async fn all_sessions(conn: &libsql::Connection) -> Result<Vec<Session>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM sessions"), ())
        .await?;
    let mut sessions = Vec::new();
    while let Some(row) = rows.next().await? {
        sessions.push(row_to_session(&row)?);
    }
    Ok(sessions)
}

/// Status of one session, read on the given connection or transaction.
pub(crate) async fn session_status(
    conn: &libsql::Connection,
    session_id: &str,
) -> Result<SessionStatus, DatabaseError> {
    let mut rows = conn
        .query("SELECT status FROM sessions WHERE id = ?1", [session_id])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    parse_enum(&row.get::<String>(0)?)
}

/// Fields a participant supplies when proposing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProposal {
    pub title: String,
    pub description: Option<String>,
    pub format: SessionFormat,
    pub duration_minutes: u32,
    /// Overrides the proposer's display name as host.
    pub host_name: Option<String>,
    pub topic_tags: Vec<String>,
}

impl SessionProposal {
    /// A 60-minute talk with no description or tags.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            format: SessionFormat::Talk,
            duration_minutes: 60,
            host_name: None,
            topic_tags: Vec::new(),
        }
    }
}

/// Filters for [`VoteService::list_sessions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub format: Option<SessionFormat>,
    /// Case-insensitive substring match on title and description.
    pub search: Option<String>,
    pub sort: SessionSort,
    pub limit: u32,
}

impl VoteService {
    /// Record a new proposal in `pending` status with an empty tally.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` if the proposal fails validation.
    pub async fn propose_session(
        &self,
        proposer: &ParticipantIdentity,
        proposal: &SessionProposal,
    ) -> Result<Session, DatabaseError> {
        let topic_tags = Session::normalize_proposal(
            &proposal.title,
            proposal.duration_minutes,
            &proposal.topic_tags,
        )?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SESSION).await?;
        let host_name = proposal
            .host_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| proposer.host_name().to_string());
        let description = proposal
            .description
            .clone()
            .filter(|text| !text.trim().is_empty());

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO sessions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 0, 0, ?10, ?11)"
                ),
                libsql::params![
                    id.as_str(),
                    proposal.title.trim(),
                    description.as_deref(),
                    proposal.format.as_str(),
                    i64::from(proposal.duration_minutes),
                    proposer.participant_id.as_str(),
                    host_name.as_str(),
                    encode_tags(&topic_tags)?,
                    SessionStatus::Pending.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Session {
            id,
            title: proposal.title.trim().to_string(),
            description,
            format: proposal.format,
            duration_minutes: proposal.duration_minutes,
            host_id: Some(proposer.participant_id.clone()),
            host_name: Some(host_name),
            topic_tags,
            status: SessionStatus::Pending,
            total_votes: 0,
            voter_count: 0,
            total_credits: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no session has this ID.
    pub async fn get_session(&self, id: &str) -> Result<Session, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM sessions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_session(&row)
    }

    /// List sessions matching `filter`, ordered by `filter.sort`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, DatabaseError> {
        let mut clauses = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(status) = filter.status {
            clauses.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(format) = filter.format {
            clauses.push(format!("format = ?{idx}"));
            params.push(format.as_str().into());
            idx += 1;
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            clauses.push(format!(
                "(title LIKE ?{idx} COLLATE NOCASE OR description LIKE ?{idx} COLLATE NOCASE)"
            ));
            params.push(format!("%{search}%").into());
            idx += 1;
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        params.push(i64::from(filter.limit).into());
        let sql = format!(
            "SELECT {SELECT_COLS} FROM sessions {where_clause} ORDER BY {} LIMIT ?{idx}",
            filter.sort.order_by()
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }

    /// Move a session along its moderation state machine.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` for an unknown session, or
    /// `DatabaseError::Core` wrapping `CoreError::InvalidTransition` if the
    /// move is not allowed from the current status.
    pub async fn transition_session(
        &self,
        id: &str,
        new_status: SessionStatus,
    ) -> Result<Session, DatabaseError> {
        let current = self.get_session(id).await?;
        current.status.ensure_transition(id, new_status)?;

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE sessions SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![new_status.as_str(), now.to_rfc3339(), id],
            )
            .await?;
        tracing::debug!(session_id = id, from = %current.status, to = %new_status, "session transitioned");

        Ok(Session {
            status: new_status,
            updated_at: now,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sp_core::errors::CoreError;

    use super::*;
    use crate::test_support::{approved_session, host, test_service};

    #[tokio::test]
    async fn propose_and_get() {
        let svc = test_service().await;
        let mut proposal = SessionProposal::new("  Quadratic funding  ");
        proposal.description = Some("Three rounds of lessons".into());
        proposal.format = SessionFormat::Workshop;
        proposal.duration_minutes = 90;
        proposal.topic_tags = vec!["DeFi".into(), "defi ".into(), "Governance".into()];

        let created = svc.propose_session(&host(), &proposal).await.unwrap();
        assert!(created.id.starts_with("ses-"));
        assert_eq!(created.title, "Quadratic funding");
        assert_eq!(created.status, SessionStatus::Pending);
        assert_eq!(created.host_name.as_deref(), Some("Host"));
        assert_eq!(created.topic_tags, vec!["defi", "governance"]);

        let fetched = svc.get_session(&created.id).await.unwrap();
        assert_eq!(fetched.title, created.title);
        assert_eq!(fetched.format, SessionFormat::Workshop);
        assert_eq!(fetched.duration_minutes, 90);
        assert_eq!(fetched.topic_tags, created.topic_tags);
        assert_eq!(fetched.tally(), created.tally());
    }

    #[tokio::test]
    async fn propose_rejects_invalid_duration() {
        let svc = test_service().await;
        let mut proposal = SessionProposal::new("Too long");
        proposal.duration_minutes = 45;
        let result = svc.propose_session(&host(), &proposal).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn host_name_override() {
        let svc = test_service().await;
        let mut proposal = SessionProposal::new("Panel");
        proposal.host_name = Some("Guest Speaker".into());
        let created = svc.propose_session(&host(), &proposal).await.unwrap();
        assert_eq!(created.host_name.as_deref(), Some("Guest Speaker"));
        assert_eq!(created.host_id.as_deref(), Some("usr-host"));
    }

    #[tokio::test]
    async fn get_missing_session() {
        let svc = test_service().await;
        assert!(matches!(
            svc.get_session("ses-00000000").await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn transition_valid_and_invalid() {
        let svc = test_service().await;
        let session = svc
            .propose_session(&host(), &SessionProposal::new("Intro"))
            .await
            .unwrap();

        let rejected = svc
            .transition_session(&session.id, SessionStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(rejected.status, SessionStatus::Rejected);

        let result = svc
            .transition_session(&session.id, SessionStatus::Approved)
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::InvalidTransition { .. }))
        ));
        assert_eq!(
            svc.get_session(&session.id).await.unwrap().status,
            SessionStatus::Rejected
        );
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let svc = test_service().await;
        let alpha = approved_session(&svc, "alpha talk").await;
        let _beta = approved_session(&svc, "Beta workshop").await;
        svc.propose_session(&host(), &SessionProposal::new("Gamma pending"))
            .await
            .unwrap();

        let all = svc
            .list_sessions(&SessionFilter {
                sort: SessionSort::Alpha,
                limit: 10,
                ..SessionFilter::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = all.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha talk", "Beta workshop", "Gamma pending"]);

        let approved = svc
            .list_sessions(&SessionFilter {
                status: Some(SessionStatus::Approved),
                limit: 10,
                ..SessionFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(approved.len(), 2);

        let searched = svc
            .list_sessions(&SessionFilter {
                search: Some("ALPHA".into()),
                limit: 10,
                ..SessionFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].id, alpha);

        let limited = svc
            .list_sessions(&SessionFilter {
                limit: 1,
                ..SessionFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }
}
