//! Client for the attendance-tracking API.
//!
//! Users log in, check in and out, and read their attendance history;
//! administrators manage accounts and read everyone's history. Every
//! operation lives on [`AttendanceClient`] and resolves to either a typed
//! payload or one [`ApiError`].

pub mod client;
pub mod config;
pub mod error;
pub mod session;

pub mod models {
    pub mod attendance;
    pub mod envelope;
    pub mod responses;
    pub mod timestamp;
    pub mod user;
}

pub mod services {
    pub mod attendance;
    pub mod auth;
    pub mod profiles;
}

pub mod middleware_layer {
    pub mod auth;
}

pub use client::AttendanceClient;
pub use config::Config;
pub use error::{ApiError, Result};
pub use models::attendance::{AdminAttendanceRecord, AttendanceRecord, AttendanceStatus, TodayAttendance};
pub use models::responses::{Landing, LoginBody};
pub use models::timestamp::Timestamp;
pub use models::user::{AuthenticatedUser, Credentials, ProfileUpdate, Registration, Role, UserProfile};
pub use session::{FileTokenSlot, MemoryTokenSlot, SessionStore, TokenSlot};
