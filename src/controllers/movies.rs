use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::controllers::positive_id;
use crate::error::ApiResult;
use crate::services::movies;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/home", get(home))
        .route("/explore/movies", get(explore_movies))
        .route("/movies/{movie_name}/{show_id}", get(movie_show))
        .route("/person/{person_name}/{actor_crew_id}", get(person))
}

// GET /api/v1/home
async fn home(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let page = movies::home(&state.db, &state.cache).await?;
    Ok(Json(json!({
        "success": true,
        "carousel_images": page.carousel_images,
        "shows": page.shows,
    })))
}

// GET /api/v1/explore/movies
async fn explore_movies(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let shows = movies::all_shows(&state.db, &state.cache).await?;
    Ok(Json(json!({ "success": true, "shows": shows })))
}

// GET /api/v1/movies/{movie_name}/{show_id}
// The movie name only makes the URL readable.
async fn movie_show(
    State(state): State<Arc<AppState>>,
    Path((_movie_name, show_id)): Path<(String, i32)>,
) -> ApiResult<impl IntoResponse> {
    let show_id = positive_id(show_id, "show_id")?;
    let page = movies::show_page(&state.db, &state.cache, show_id).await?;
    Ok(Json(json!({
        "success": true,
        "show": page.show,
        "actors_crew": page.actors_crew,
    })))
}

// GET /api/v1/person/{person_name}/{actor_crew_id}
async fn person(
    State(state): State<Arc<AppState>>,
    Path((_person_name, actor_crew_id)): Path<(String, i32)>,
) -> ApiResult<impl IntoResponse> {
    let actor_crew_id = positive_id(actor_crew_id, "actor_crew_id")?;
    let page = movies::person_page(&state.db, &state.cache, actor_crew_id).await?;
    Ok(Json(json!({
        "success": true,
        "person": page.person,
        "movies": page.movies,
    })))
}
