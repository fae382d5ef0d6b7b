use crate::cache::CacheService;

pub const CAROUSEL_KEY: &str = "browse:carousel";
pub const SHOWS_KEY: &str = "browse:shows";

pub fn show_key(show_id: i32) -> String {
    format!("browse:show:{}", show_id)
}

pub fn movie_crew_key(movie_id: i32) -> String {
    format!("browse:movie:{}:crew", movie_id)
}

pub fn person_key(actor_crew_id: i32) -> String {
    format!("browse:person:{}", actor_crew_id)
}

pub fn person_movies_key(actor_crew_id: i32) -> String {
    format!("browse:person:{}:movies", actor_crew_id)
}

impl CacheService {
    /// Drops all cached browse pages. Called after any catalogue change.
    pub async fn invalidate_browse_pages(&self) {
        self.invalidate_prefix("browse:").await;
    }
}
