use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::controllers::{positive_id, validated};
use crate::error::ApiResult;
use crate::middleware::AdminUser;
use crate::models::hall::{HallFields, SeatFields};
use crate::models::movie::MovieFields;
use crate::models::person::PersonFields;
use crate::models::show::ShowFields;
use crate::services::admin;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/movie/all", get(all_movies))
        .route("/admin/movie/new", post(new_movie))
        .route("/admin/movie/edit", put(edit_movie))
        .route("/admin/movie/delete", delete(delete_movie))
        .route("/admin/movie/{movie_id}", get(movie))
        .route("/admin/movie/actor-crew/new", post(new_actor_crew))
        .route("/admin/movie/actor-crew/edit", put(edit_actor_crew))
        .route("/admin/movie/actor-crew/delete", delete(delete_actor_crew))
        .route("/admin/movie/actor-crew/{actor_crew_id}", get(actor_crew))
        .route("/admin/cinema-hall/new", post(new_cinema_hall))
        .route("/admin/cinema-hall/all", get(all_cinema_halls))
        .route("/admin/cinema-hall/delete", delete(delete_cinema_hall))
        .route("/admin/cinema-hall/{cinema_hall_id}", get(cinema_hall))
        .route("/admin/cinema-hall-seat/new", post(new_cinema_hall_seat))
        .route("/admin/cinema-hall-seat/delete", delete(delete_cinema_hall_seat))
        .route("/admin/show/all", get(all_shows))
        .route("/admin/show/new", post(new_show))
        .route("/admin/show/edit", put(edit_show))
        .route("/admin/show/delete", delete(delete_show))
        .route("/admin/show-seats/{show_id}", get(show_seats))
        .route("/admin/show-seat-price/edit", put(edit_show_seat_price))
}

/* ---------- request bodies ---------- */

#[derive(Debug, Deserialize, Validate)]
pub struct EditMovie {
    pub movie_id: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: MovieFields,
}

#[derive(Debug, Deserialize)]
pub struct MovieId {
    pub movie_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewActorCrew {
    pub movie_id: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: PersonFields,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditActorCrew {
    pub actor_crew_id: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: PersonFields,
}

#[derive(Debug, Deserialize)]
pub struct ActorCrewId {
    pub actor_crew_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct CinemaHallId {
    pub cinema_hall_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct CinemaSeatId {
    pub cinema_seat_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditShow {
    pub show_id: i32,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ShowFields,
}

#[derive(Debug, Deserialize)]
pub struct ShowId {
    pub show_id: i32,
}

/// Price in currency units.
#[derive(Debug, Deserialize, Validate)]
pub struct EditSeatPrice {
    pub show_seat_id: i32,
    #[validate(range(min = 0.0, max = 100000.0))]
    pub price: f64,
}

fn created(id_field: &str, id: i32) -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "success": true, id_field: id })))
}

fn done() -> impl IntoResponse {
    Json(json!({ "success": true }))
}

/* ---------- movies ---------- */

async fn all_movies(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
) -> ApiResult<impl IntoResponse> {
    let movies = admin::movie_titles(&state.db).await?;
    Ok(Json(json!({ "success": true, "movies": movies })))
}

async fn movie(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Path(movie_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let movie = admin::movie(&state.db, positive_id(movie_id, "movie_id")?).await?;
    Ok(Json(json!({ "success": true, "movie": movie })))
}

async fn new_movie(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<MovieFields>,
) -> ApiResult<impl IntoResponse> {
    let fields = validated(body)?;
    let id = admin::create_movie(&state.db, &state.cache, &fields).await?;
    Ok(created("movie_id", id))
}

async fn edit_movie(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<EditMovie>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(body)?;
    let movie_id = positive_id(req.movie_id, "movie_id")?;
    admin::update_movie(&state.db, &state.cache, movie_id, &req.fields).await?;
    Ok(done())
}

async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Json(req): Json<MovieId>,
) -> ApiResult<impl IntoResponse> {
    let movie_id = positive_id(req.movie_id, "movie_id")?;
    admin::delete_movie(&state.db, &state.cache, movie_id).await?;
    Ok(done())
}

/* ---------- actors and crew ---------- */

async fn actor_crew(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Path(actor_crew_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let person = admin::person(&state.db, positive_id(actor_crew_id, "actor_crew_id")?).await?;
    Ok(Json(json!({ "success": true, "actor_crew": person })))
}

async fn new_actor_crew(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<NewActorCrew>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(body)?;
    let movie_id = positive_id(req.movie_id, "movie_id")?;
    let id = admin::create_person(&state.db, &state.cache, movie_id, &req.fields).await?;
    Ok(created("actor_crew_id", id))
}

async fn edit_actor_crew(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<EditActorCrew>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(body)?;
    let id = positive_id(req.actor_crew_id, "actor_crew_id")?;
    admin::update_person(&state.db, &state.cache, id, &req.fields).await?;
    Ok(done())
}

async fn delete_actor_crew(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Json(req): Json<ActorCrewId>,
) -> ApiResult<impl IntoResponse> {
    let id = positive_id(req.actor_crew_id, "actor_crew_id")?;
    admin::delete_person(&state.db, &state.cache, id).await?;
    Ok(done())
}

/* ---------- cinema halls and seats ---------- */

async fn all_cinema_halls(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
) -> ApiResult<impl IntoResponse> {
    let halls = admin::halls(&state.db).await?;
    Ok(Json(json!({ "success": true, "cinema_halls": halls })))
}

async fn cinema_hall(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Path(cinema_hall_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let hall = admin::hall(&state.db, positive_id(cinema_hall_id, "cinema_hall_id")?).await?;
    Ok(Json(json!({ "success": true, "cinema_hall": hall })))
}

async fn new_cinema_hall(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<HallFields>,
) -> ApiResult<impl IntoResponse> {
    let fields = validated(body)?;
    let id = admin::create_hall(&state.db, &fields).await?;
    Ok(created("cinema_hall_id", id))
}

async fn delete_cinema_hall(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Json(req): Json<CinemaHallId>,
) -> ApiResult<impl IntoResponse> {
    admin::delete_hall(&state.db, positive_id(req.cinema_hall_id, "cinema_hall_id")?).await?;
    Ok(done())
}

async fn new_cinema_hall_seat(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<SeatFields>,
) -> ApiResult<impl IntoResponse> {
    let fields = validated(body)?;
    let id = admin::create_seat(&state.db, &fields).await?;
    Ok(created("cinema_seat_id", id))
}

async fn delete_cinema_hall_seat(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Json(req): Json<CinemaSeatId>,
) -> ApiResult<impl IntoResponse> {
    admin::delete_seat(&state.db, positive_id(req.cinema_seat_id, "cinema_seat_id")?).await?;
    Ok(done())
}

/* ---------- shows ---------- */

async fn all_shows(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
) -> ApiResult<impl IntoResponse> {
    let shows = admin::shows(&state.db).await?;
    Ok(Json(json!({ "success": true, "shows": shows })))
}

async fn new_show(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<ShowFields>,
) -> ApiResult<impl IntoResponse> {
    let fields = validated(body)?;
    let id = admin::create_show(&state.db, &state.cache, &fields).await?;
    Ok(created("show_id", id))
}

async fn edit_show(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<EditShow>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(body)?;
    let show_id = positive_id(req.show_id, "show_id")?;
    admin::update_show(&state.db, &state.cache, show_id, &req.fields).await?;
    Ok(done())
}

async fn delete_show(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Json(req): Json<ShowId>,
) -> ApiResult<impl IntoResponse> {
    admin::delete_show(&state.db, &state.cache, positive_id(req.show_id, "show_id")?).await?;
    Ok(done())
}

async fn show_seats(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    Path(show_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let seats = admin::show_seats(&state.db, positive_id(show_id, "show_id")?).await?;
    Ok(Json(json!({ "success": true, "show_seats": seats })))
}

async fn edit_show_seat_price(
    State(state): State<Arc<AppState>>,
    _: AdminUser,
    body: Json<EditSeatPrice>,
) -> ApiResult<impl IntoResponse> {
    let req = validated(body)?;
    let show_seat_id = positive_id(req.show_seat_id, "show_seat_id")?;
    admin::update_seat_price(&state.db, show_seat_id, req.price).await?;
    Ok(done())
}
