use serde::{Deserialize, Serialize};

use super::attendance::{AdminAttendanceRecord, AttendanceRecord, TodayAttendance};
use super::user::{AuthenticatedUser, Role, UserProfile};

/// The plain `{message}` body most mutating endpoints return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<AuthenticatedUser>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Where a caller should go after logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    AdminDashboard,
    Attendance,
}

impl LoginBody {
    /// Administrators land on the dashboard, everyone else on their own
    /// attendance view.
    pub fn landing(&self) -> Landing {
        match self.user.as_ref().and_then(|user| user.role.as_ref()) {
            Some(Role::Admin) => Landing::AdminDashboard,
            _ => Landing::Attendance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilesBody {
    #[serde(default)]
    pub message: String,
    pub profiles: Vec<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendanceBody {
    pub has_attendance: bool,
    #[serde(default)]
    pub attendance: Option<TodayAttendance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceHistoryBody {
    pub attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminHistoryBody {
    pub history: Vec<AdminAttendanceRecord>,
}
