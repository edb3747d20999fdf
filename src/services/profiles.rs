use http::Method;

use crate::{
    client::AttendanceClient,
    error::Result,
    models::responses::{Message, ProfilesBody},
    models::user::{ProfileUpdate, UserProfile},
};

const ALL_PROFILES_PATH: &str = "/api/profile/all";
const ADMIN_DELETE_PATH: &str = "/api/profile/admin/delete/";
const ADMIN_UPDATE_PATH: &str = "/api/profile/admin/update";
const SELF_UPDATE_PATH: &str = "/api/profile/user/update";

impl AttendanceClient {
    /// Lists every account. Admin only.
    pub async fn get_all_profiles(&self) -> Result<Vec<UserProfile>> {
        let url = self.endpoint(ALL_PROFILES_PATH)?;
        let body: ProfilesBody = self.call(Method::GET, url).await?;
        tracing::debug!("👥 Loaded {} profiles", body.profiles.len());
        Ok(body.profiles)
    }

    /// Deletes an account. Admin only.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The `_id` of the account, sent as a single path segment.
    pub async fn delete_user(&self, user_id: &str) -> Result<Message> {
        let url = self.endpoint_with(ADMIN_DELETE_PATH, user_id)?;
        let message: Message = self.call(Method::DELETE, url).await?;
        tracing::info!("🗑️ User deleted: {}", user_id);
        Ok(message)
    }

    /// Updates any account's email and display name. Admin only.
    pub async fn update_user(&self, update: &ProfileUpdate) -> Result<Message> {
        let url = self.endpoint(ADMIN_UPDATE_PATH)?;
        let message: Message = self.call_json(Method::PUT, url, update).await?;
        tracing::info!("✅ User updated: {}", update.id);
        Ok(message)
    }

    /// Updates the caller's own email and display name.
    pub async fn update_user_profile(&self, update: &ProfileUpdate) -> Result<Message> {
        let url = self.endpoint(SELF_UPDATE_PATH)?;
        let message: Message = self.call_json(Method::PUT, url, update).await?;
        tracing::info!("✅ Profile updated: {}", update.id);
        Ok(message)
    }
}
