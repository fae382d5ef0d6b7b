use crate::cache::CacheService;
use crate::models::user::UserProfile;
use tracing::warn;

fn profile_key(user_id: i32) -> String {
    format!("profile:{}", user_id)
}

impl CacheService {
    pub async fn cached_profile(&self, user_id: i32) -> Option<UserProfile> {
        match self.get_json(&profile_key(user_id)).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id, error = %e, "profile cache read failed");
                None
            }
        }
    }

    pub async fn cache_profile(&self, user_id: i32, profile: &UserProfile) {
        if let Err(e) = self.put_json(&profile_key(user_id), profile).await {
            warn!(user_id, error = %e, "failed to cache profile");
        }
    }
}
