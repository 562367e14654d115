use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's judgment on one alert. The ledger holds at most one row per
/// (alert, user) pair; switching sides replaces the row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlertVote {
    pub id: Uuid,
    pub alert_id: Uuid,
    pub user_id: Uuid,
    pub kind: VoteKind,
    pub created_at: DateTime<Utc>,
}

/// Vote kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "vote_kind", rename_all = "UPPERCASE")]
pub enum VoteKind {
    #[serde(rename = "CONFIRM")]
    Confirm,
    #[serde(rename = "REPORT")]
    Report,
}

impl VoteKind {
    /// Parse the wire representation; anything else is rejected upstream
    pub fn parse(value: &str) -> Option<VoteKind> {
        match value.to_uppercase().as_str() {
            "CONFIRM" => Some(VoteKind::Confirm),
            "REPORT" => Some(VoteKind::Report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(VoteKind::parse("CONFIRM"), Some(VoteKind::Confirm));
        assert_eq!(VoteKind::parse("REPORT"), Some(VoteKind::Report));
        assert_eq!(VoteKind::parse("report"), Some(VoteKind::Report));
    }

    #[test]
    fn rejects_anything_else() {
        assert_eq!(VoteKind::parse(""), None);
        assert_eq!(VoteKind::parse("UPVOTE"), None);
        assert_eq!(VoteKind::parse("CONFIRMED"), None);
    }
}
