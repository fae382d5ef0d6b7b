use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::controllers::positive_id;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::services::booking;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/buytickets/movie/{show_id}/show-times", get(show_times))
        .route("/buytickets/movie/{show_id}/available-seats", get(available_seats))
        .route("/buytickets/payment", post(book_seats))
}

#[derive(Debug, Deserialize)]
pub struct BookSeatsRequest {
    pub show_id: i32,
    pub show_seats_id: Vec<i32>,
}

// GET /api/v1/buytickets/movie/{show_id}/show-times
async fn show_times(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let show_id = positive_id(show_id, "show_id")?;
    let times = booking::show_times(&state.db, show_id).await?;
    Ok(Json(json!({
        "success": true,
        "movie": times.movie,
        "halls": times.halls,
    })))
}

// GET /api/v1/buytickets/movie/{show_id}/available-seats
async fn available_seats(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let show_id = positive_id(show_id, "show_id")?;
    let seat_map = booking::seat_map(&state.db, show_id).await?;
    Ok(Json(json!({ "success": true, "seat_map": seat_map })))
}

// POST /api/v1/buytickets/payment
async fn book_seats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<BookSeatsRequest>,
) -> ApiResult<impl IntoResponse> {
    let show_id = positive_id(req.show_id, "show_id")?;
    for &seat_id in &req.show_seats_id {
        positive_id(seat_id, "show_seats_id")?;
    }

    let confirmation = state
        .booking
        .create_booking(show_id, user.user_id, &req.show_seats_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Booking successful! Your seats are reserved, and payment has been completed. Enjoy the show!",
        "booking_ids": confirmation.booking_ids,
    })))
}
