use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;
use super::user::UserProfile;

/// One check-in/check-out pair.
///
/// A record without `check_out` is an open session: the user has checked in
/// and not yet out. Records are created by check-in, completed once by the
/// matching check-out and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    /// The working day the record belongs to.
    pub date: Timestamp,
    pub check_in: Timestamp,
    #[serde(default)]
    pub check_out: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Time between check-in and check-out.
    ///
    /// `None` for open records, unparseable timestamps, or a check-out that
    /// is not strictly after the check-in.
    pub fn worked_duration(&self) -> Option<Duration> {
        worked(&self.check_in, self.check_out.as_ref())
    }
}

/// An attendance record joined with its owner, as returned by the admin
/// history endpoint. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAttendanceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub date: Timestamp,
    pub check_in: Timestamp,
    #[serde(default)]
    pub check_out: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user: UserProfile,
}

impl AdminAttendanceRecord {
    /// The record without the embedded owner.
    pub fn record(&self) -> AttendanceRecord {
        AttendanceRecord {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            date: self.date.clone(),
            check_in: self.check_in.clone(),
            check_out: self.check_out.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    pub fn worked_duration(&self) -> Option<Duration> {
        worked(&self.check_in, self.check_out.as_ref())
    }
}

/// Today's check-in/check-out pair for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendance {
    pub check_in: Timestamp,
    #[serde(default)]
    pub check_out: Option<Timestamp>,
}

/// The server's summary of the current user's attendance state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    pub status: String,
    #[serde(default)]
    pub last_record: Option<String>,
}

fn worked(check_in: &Timestamp, check_out: Option<&Timestamp>) -> Option<Duration> {
    let start = check_in.as_datetime()?;
    let end = check_out?.as_datetime()?;
    (end > start).then(|| end - start)
}
