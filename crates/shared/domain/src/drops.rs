use crate::identity::DomainName;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub u64);

impl fmt::Display for DropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Drop lifecycle. Only `Pending -> Captured` and `Pending -> Missed` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropStatus {
    Pending,
    Captured,
    Missed,
}

impl DropStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Captured => "captured",
            Self::Missed => "missed",
        }
    }
}

impl fmt::Display for DropStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered identifier. Exists only once somebody has claimed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: DomainName,
    pub created_at: DateTime<Utc>,
}

/// One scheduled claim opportunity for an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drop {
    pub id: DropId,
    pub domain: DomainName,
    pub drop_time: DateTime<Utc>,
    pub grace_minutes: u32,
    pub status: DropStatus,
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Drop {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == DropStatus::Pending
    }

    /// `true` once the scheduled instant has been reached.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.drop_time <= now
    }

    /// Instant after which an unclaimed drop counts as missed. Saturates at the end of time.
    #[must_use]
    pub fn grace_deadline(&self) -> DateTime<Utc> {
        self.drop_time
            .checked_add_signed(Duration::minutes(i64::from(self.grace_minutes)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    #[must_use]
    pub fn grace_elapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.grace_deadline()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub drop_id: DropId,
    pub name: String,
    pub attempts: u32,
    pub delay_ms: u64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn drop_at(minute: u32, grace: u32) -> Drop {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap();
        Drop {
            id: DropId(1),
            domain: DomainName::parse("alpha.com").unwrap(),
            drop_time: t,
            grace_minutes: grace,
            status: DropStatus::Pending,
            winner: None,
            created_at: t,
        }
    }

    #[test]
    fn test_grace_window_is_inclusive() {
        let drop = drop_at(0, 5);
        let start = drop.drop_time;
        assert!(drop.is_due(start));
        assert!(!drop.grace_elapsed(start + Duration::minutes(4)));
        assert!(drop.grace_elapsed(start + Duration::minutes(5)));
    }

    #[test]
    fn test_grace_deadline_saturates() {
        let mut drop = drop_at(0, 60);
        drop.drop_time = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        assert_eq!(drop.grace_deadline(), DateTime::<Utc>::MAX_UTC);
        assert!(!drop.grace_elapsed(drop.drop_time));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DropStatus::Captured).unwrap(), "\"captured\"");
    }
}
