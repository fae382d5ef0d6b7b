//! Catalogue, hall and schedule administration.
//!
//! Every write that changes what the browse pages show drops the cached
//! browse pages afterwards.

use serde::Serialize;
use tracing::info;

use crate::cache::CacheService;
use crate::database::Database;
use crate::error::{is_foreign_key_violation, is_unique_violation, ApiResult, AppError};
use crate::models::hall::{HallFields, SeatFields, SeatInsert};
use crate::models::movie::{MovieFields, MovieTitle};
use crate::models::person::PersonFields;
use crate::models::show::{ShowFields, ShowUpdate};
use crate::models::{CinemaHall, CinemaSeat, Movie, Person, Show, ShowSeat};
use crate::services::{price_from_cents, price_to_cents};

#[derive(Debug, Serialize, PartialEq)]
pub struct ShowSeatView {
    pub show_seat_id: i32,
    pub cinema_seat_id: i32,
    pub status: String,
    pub price: f64,
    pub show_id: i32,
}

impl From<ShowSeat> for ShowSeatView {
    fn from(seat: ShowSeat) -> Self {
        Self {
            show_seat_id: seat.show_seat_id,
            cinema_seat_id: seat.cinema_seat_id,
            status: seat.status,
            price: price_from_cents(seat.price),
            show_id: seat.show_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HallWithSeats {
    #[serde(flatten)]
    pub hall: CinemaHall,
    pub seats: Vec<CinemaSeat>,
}

fn require(found: bool, what: &str, id: i32) -> ApiResult<()> {
    if found {
        Ok(())
    } else {
        Err(AppError::not_found(format!("{} {} not found", what, id)))
    }
}

fn conflict_on_duplicate(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if is_unique_violation(&e) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::from(e)
        }
    }
}

fn conflict_when_referenced(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if is_foreign_key_violation(&e) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::from(e)
        }
    }
}

fn hall_full(hall: &CinemaHall) -> AppError {
    AppError::bad_request(format!(
        "hall {} is full: capacity is {} seats",
        hall.hall_name, hall.capacity
    ))
}

// movies

pub async fn movie_titles(db: &Database) -> ApiResult<Vec<MovieTitle>> {
    Ok(Movie::titles(db).await?)
}

pub async fn movie(db: &Database, movie_id: i32) -> ApiResult<Movie> {
    Movie::find(movie_id, db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("movie {} not found", movie_id)))
}

pub async fn create_movie(
    db: &Database,
    cache: &CacheService,
    fields: &MovieFields,
) -> ApiResult<i32> {
    let id = Movie::insert(fields, db).await?;
    cache.invalidate_browse_pages().await;
    info!(movie_id = id, "movie created");
    Ok(id)
}

pub async fn update_movie(
    db: &Database,
    cache: &CacheService,
    movie_id: i32,
    fields: &MovieFields,
) -> ApiResult<()> {
    require(Movie::update(movie_id, fields, db).await?, "movie", movie_id)?;
    cache.invalidate_browse_pages().await;
    Ok(())
}

pub async fn delete_movie(db: &Database, cache: &CacheService, movie_id: i32) -> ApiResult<()> {
    let deleted = Movie::delete(movie_id, db)
        .await
        .map_err(conflict_when_referenced("movie still has scheduled shows"))?;
    require(deleted, "movie", movie_id)?;
    cache.invalidate_browse_pages().await;
    info!(movie_id, "movie deleted");
    Ok(())
}

// actors and crew

pub async fn person(db: &Database, actor_crew_id: i32) -> ApiResult<Person> {
    Person::find(actor_crew_id, db)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("actor or crew member {} not found", actor_crew_id))
        })
}

pub async fn create_person(
    db: &Database,
    cache: &CacheService,
    movie_id: i32,
    fields: &PersonFields,
) -> ApiResult<i32> {
    let id = Person::insert_for_movie(movie_id, fields, db).await?;
    cache.invalidate_browse_pages().await;
    Ok(id)
}

pub async fn update_person(
    db: &Database,
    cache: &CacheService,
    actor_crew_id: i32,
    fields: &PersonFields,
) -> ApiResult<()> {
    let updated = Person::update(actor_crew_id, fields, db).await?;
    require(updated, "actor or crew member", actor_crew_id)?;
    cache.invalidate_browse_pages().await;
    Ok(())
}

pub async fn delete_person(
    db: &Database,
    cache: &CacheService,
    actor_crew_id: i32,
) -> ApiResult<()> {
    require(Person::delete(actor_crew_id, db).await?, "actor or crew member", actor_crew_id)?;
    cache.invalidate_browse_pages().await;
    Ok(())
}

// halls and seats

pub async fn halls(db: &Database) -> ApiResult<Vec<CinemaHall>> {
    Ok(CinemaHall::all(db).await?)
}

pub async fn hall(db: &Database, hall_id: i32) -> ApiResult<HallWithSeats> {
    let hall = CinemaHall::find(hall_id, db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("cinema hall {} not found", hall_id)))?;
    let seats = CinemaSeat::for_hall(hall_id, db).await?;
    Ok(HallWithSeats { hall, seats })
}

pub async fn create_hall(db: &Database, fields: &HallFields) -> ApiResult<i32> {
    let id = CinemaHall::insert(fields, db)
        .await
        .map_err(conflict_on_duplicate("a cinema hall with this name already exists"))?;
    info!(hall_id = id, "cinema hall created");
    Ok(id)
}

pub async fn delete_hall(db: &Database, hall_id: i32) -> ApiResult<()> {
    let deleted = CinemaHall::delete(hall_id, db)
        .await
        .map_err(conflict_when_referenced("cinema hall still has scheduled shows"))?;
    require(deleted, "cinema hall", hall_id)
}

pub async fn create_seat(db: &Database, fields: &SeatFields) -> ApiResult<i32> {
    let outcome = CinemaSeat::insert_within_capacity(fields, db)
        .await
        .map_err(conflict_on_duplicate("this seat already exists in the hall"))?;

    match outcome {
        SeatInsert::Inserted(seat_id) => Ok(seat_id),
        SeatInsert::HallNotFound => Err(AppError::not_found(format!(
            "cinema hall {} not found",
            fields.hall_id
        ))),
        SeatInsert::HallFull(hall) => Err(hall_full(&hall)),
    }
}

pub async fn delete_seat(db: &Database, seat_id: i32) -> ApiResult<()> {
    let deleted = CinemaSeat::delete(seat_id, db)
        .await
        .map_err(conflict_when_referenced("seat is used by scheduled shows"))?;
    require(deleted, "cinema seat", seat_id)
}

// shows

pub async fn shows(db: &Database) -> ApiResult<Vec<Show>> {
    Ok(Show::all(db).await?)
}

pub async fn create_show(
    db: &Database,
    cache: &CacheService,
    fields: &ShowFields,
) -> ApiResult<i32> {
    let (show_id, seats) = Show::insert_with_seats(fields, db).await?;
    cache.invalidate_browse_pages().await;
    info!(show_id, seats, "show created");
    Ok(show_id)
}

pub async fn update_show(
    db: &Database,
    cache: &CacheService,
    show_id: i32,
    fields: &ShowFields,
) -> ApiResult<()> {
    let reseeded = match Show::update(show_id, fields, db).await? {
        ShowUpdate::Updated { reseeded } => reseeded,
        ShowUpdate::NotFound => {
            return Err(AppError::not_found(format!("show {} not found", show_id)));
        }
        ShowUpdate::InUse => {
            return Err(AppError::Conflict(
                "show already has bookings or claimed seats".to_string(),
            ));
        }
    };
    if let Some(seats) = reseeded {
        info!(show_id, seats, "show moved to another hall, seats reopened");
    }
    cache.invalidate_browse_pages().await;
    Ok(())
}

pub async fn delete_show(db: &Database, cache: &CacheService, show_id: i32) -> ApiResult<()> {
    let deleted = Show::delete(show_id, db)
        .await
        .map_err(conflict_when_referenced("show already has bookings"))?;
    require(deleted, "show", show_id)?;
    cache.invalidate_browse_pages().await;
    Ok(())
}

pub async fn show_seats(db: &Database, show_id: i32) -> ApiResult<Vec<ShowSeatView>> {
    let seats = ShowSeat::for_show(show_id, db).await?;
    Ok(seats.into_iter().map(ShowSeatView::from).collect())
}

pub async fn update_seat_price(db: &Database, show_seat_id: i32, price: f64) -> ApiResult<()> {
    require(
        ShowSeat::update_price(show_seat_id, price_to_cents(price), db).await?,
        "show seat",
        show_seat_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall(capacity: i32) -> CinemaHall {
        CinemaHall {
            cinema_hall_id: 1,
            hall_name: "Red".to_string(),
            hall_type: "IMAX".to_string(),
            capacity,
        }
    }

    #[test]
    fn full_hall_is_a_bad_request() {
        let err = hall_full(&hall(3));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "hall Red is full: capacity is 3 seats");
    }

    #[test]
    fn show_seat_price_is_served_in_units() {
        let view = ShowSeatView::from(ShowSeat {
            show_seat_id: 5,
            cinema_seat_id: 12,
            status: "Booked".to_string(),
            price: 799,
            show_id: 3,
        });
        assert_eq!(view.price, 7.99);
    }

    #[test]
    fn missing_row_becomes_not_found() {
        assert!(require(true, "show", 1).is_ok());
        assert_eq!(
            require(false, "show", 9).unwrap_err().to_string(),
            "show 9 not found"
        );
    }
}
