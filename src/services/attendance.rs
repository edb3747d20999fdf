use http::Method;

use crate::{
    client::AttendanceClient,
    error::Result,
    models::attendance::{AdminAttendanceRecord, AttendanceRecord, AttendanceStatus},
    models::responses::{AdminHistoryBody, AttendanceHistoryBody, Message, TodayAttendanceBody},
};

const CHECK_IN_PATH: &str = "/api/attendance/check-in";
const CHECK_OUT_PATH: &str = "/api/attendance/check-out";
const STATUS_PATH: &str = "/api/attendance/status";
const TODAY_PATH: &str = "/api/attendance/today/";
const USER_HISTORY_PATH: &str = "/api/attendance/user/all/";
const ADMIN_HISTORY_PATH: &str = "/api/attendance/admin/history";

impl AttendanceClient {
    /// Opens today's attendance session.
    ///
    /// The server decides whether a check-in is allowed; a refusal comes back
    /// as `ApiError::Application`.
    pub async fn register_check_in(&self) -> Result<Message> {
        let url = self.endpoint(CHECK_IN_PATH)?;
        let message: Message = self.call(Method::POST, url).await?;
        tracing::info!("✅ Check-in registered");
        Ok(message)
    }

    /// Closes the open attendance session. Without an open check-in the
    /// server answers with an application error.
    pub async fn register_check_out(&self) -> Result<Message> {
        let url = self.endpoint(CHECK_OUT_PATH)?;
        let message: Message = self.call(Method::POST, url).await?;
        tracing::info!("✅ Check-out registered");
        Ok(message)
    }

    pub async fn get_attendance_status(&self) -> Result<AttendanceStatus> {
        let url = self.endpoint(STATUS_PATH)?;
        self.call(Method::GET, url).await
    }

    pub async fn get_today_attendance(&self) -> Result<TodayAttendanceBody> {
        let url = self.endpoint(TODAY_PATH)?;
        self.call(Method::GET, url).await
    }

    /// The current user's attendance records.
    pub async fn get_user_attendance_history(&self) -> Result<Vec<AttendanceRecord>> {
        let url = self.endpoint(USER_HISTORY_PATH)?;
        let body: AttendanceHistoryBody = self.call(Method::GET, url).await?;
        tracing::debug!("📋 Loaded {} attendance records", body.attendance.len());
        Ok(body.attendance)
    }

    /// Every user's attendance records, each joined with its owner. Admin only.
    pub async fn get_admin_attendance_history(&self) -> Result<Vec<AdminAttendanceRecord>> {
        let url = self.endpoint(ADMIN_HISTORY_PATH)?;
        let body: AdminHistoryBody = self.call(Method::GET, url).await?;
        tracing::debug!("📋 Loaded {} admin history records", body.history.len());
        Ok(body.history)
    }
}
