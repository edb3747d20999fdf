use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_client::{ApiError, AttendanceClient, Config, Credentials, Landing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded for {}", config.api_url);

    let client = AttendanceClient::from_config(&config).context("Failed to build API client")?;

    if let Err(e) = client.test_connection().await {
        tracing::error!("❌ {}", e.user_message());
        return Err(e.into());
    }

    if !client.session().is_logged_in() {
        let (Ok(email), Ok(password)) = (
            std::env::var("ATTENDANCE_EMAIL"),
            std::env::var("ATTENDANCE_PASSWORD"),
        ) else {
            tracing::info!("ℹ️ No session and no ATTENDANCE_EMAIL/ATTENDANCE_PASSWORD, stopping here");
            return Ok(());
        };

        let login = client.login(&Credentials::new(email, password)).await.map_err(report)?;
        tracing::info!("➡️ Landing: {:?}", login.landing());

        if login.landing() == Landing::AdminDashboard {
            let history = client.get_admin_attendance_history().await.map_err(report)?;
            tracing::info!("📋 {} attendance records across all users", history.len());
            return Ok(());
        }
    }

    let status = client.get_attendance_status().await.map_err(report)?;
    tracing::info!("📍 Attendance status: {}", status.status);

    let today = client.get_today_attendance().await.map_err(report)?;
    match today.attendance {
        Some(attendance) if today.has_attendance => tracing::info!(
            "🕒 Today: in {} / out {}",
            attendance.check_in.display_or("%H:%M:%S", "--:--:--"),
            attendance
                .check_out
                .map(|out| out.display_or("%H:%M:%S", "--:--:--"))
                .unwrap_or_else(|| "open".to_string())
        ),
        _ => tracing::info!("🕒 No attendance registered today"),
    }

    Ok(())
}

fn report(err: ApiError) -> anyhow::Error {
    tracing::error!("❌ {}", err.user_message());
    err.into()
}
