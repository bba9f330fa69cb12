use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the microsecond precision PostgreSQL stores, so
/// a stamp bound into several rows compares equal after a round trip.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
