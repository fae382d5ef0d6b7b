use serde::Serialize;

use crate::database::Database;
use crate::error::{ApiResult, AppError};
use crate::models::show::{HallSchedule, SeatMapRow, ShowHeader, ShowMovieInfo, StartTime};
use crate::services::{format_date, format_time, price_from_cents};

#[derive(Debug, Serialize)]
pub struct ShowTimes {
    pub movie: ShowMovieInfo,
    pub halls: Vec<HallShowTimes>,
}

#[derive(Debug, Serialize)]
pub struct HallShowTimes {
    pub hall_name: String,
    pub hall_type: String,
    pub show_date: String,
    pub start_times: Vec<StartTimeView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StartTimeView {
    pub show_id: i32,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct SeatMap {
    pub movie_title: String,
    pub show_id: i32,
    pub show_date: String,
    pub start_time: String,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SeatView {
    pub show_seat_id: i32,
    pub seat_row: String,
    pub seat_number: i32,
    pub seat_type: String,
    pub status: String,
    pub price: f64,
}

impl From<StartTime> for StartTimeView {
    fn from(row: StartTime) -> Self {
        Self {
            show_id: row.show_id,
            start_time: format_time(row.start_time),
        }
    }
}

impl From<SeatMapRow> for SeatView {
    fn from(row: SeatMapRow) -> Self {
        Self {
            show_seat_id: row.show_seat_id,
            seat_row: row.seat_row,
            seat_number: row.seat_number,
            seat_type: row.seat_type,
            status: row.status,
            price: price_from_cents(row.price),
        }
    }
}

/// Every hall and date the show's movie plays on, with its start times.
pub async fn show_times(db: &Database, show_id: i32) -> ApiResult<ShowTimes> {
    let movie = ShowMovieInfo::for_show(show_id, db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("show not found by {} ID", show_id)))?;

    let schedules = HallSchedule::for_movie(movie.movie_id, db).await?;
    let mut halls = Vec::with_capacity(schedules.len());
    for schedule in schedules {
        let start_times = StartTime::for_schedule(movie.movie_id, &schedule, db).await?;
        halls.push(HallShowTimes {
            show_date: format_date(schedule.show_date),
            hall_name: schedule.hall_name,
            hall_type: schedule.hall_type,
            start_times: start_times.into_iter().map(StartTimeView::from).collect(),
        });
    }

    Ok(ShowTimes { movie, halls })
}

/// Current seat map of a show. Always read from the database.
pub async fn seat_map(db: &Database, show_id: i32) -> ApiResult<SeatMap> {
    let header = ShowHeader::find(show_id, db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("show ID {} not found", show_id)))?;

    let seats = SeatMapRow::for_show(show_id, db).await?;

    Ok(SeatMap {
        movie_title: header.title,
        show_id: header.show_id,
        show_date: format_date(header.show_date),
        start_time: format_time(header.start_time),
        seats: seats.into_iter().map(SeatView::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn seat_rows_are_served_in_currency_units() {
        let view = SeatView::from(SeatMapRow {
            seat_row: "C".to_string(),
            seat_number: 4,
            seat_type: "VIP".to_string(),
            show_seat_id: 31,
            status: "Available".to_string(),
            price: 1500,
        });

        assert_eq!(view.price, 15.0);
        assert_eq!(view.show_seat_id, 31);
        assert_eq!(view.status, "Available");
    }

    #[test]
    fn start_times_drop_seconds() {
        let view = StartTimeView::from(StartTime {
            show_id: 2,
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        });
        assert_eq!(view, StartTimeView { show_id: 2, start_time: "09:30".to_string() });
    }
}
