pub mod admin;
pub mod booking;
pub mod movies;
pub mod users;

use chrono::{NaiveDate, NaiveTime};

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Seat prices are stored in cents and served in currency units.
pub fn price_from_cents(cents: i32) -> f64 {
    f64::from(cents) / 100.0
}

pub fn price_to_cents(price: f64) -> i32 {
    (price * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_and_times_use_short_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let time = NaiveTime::from_hms_opt(19, 5, 30).unwrap();

        assert_eq!(format_date(date), "2024-03-09");
        assert_eq!(format_time(time), "19:05");
    }

    #[test]
    fn prices_convert_between_cents_and_units() {
        assert_eq!(price_from_cents(1250), 12.5);
        assert_eq!(price_to_cents(12.5), 1250);
        assert_eq!(price_to_cents(9.99), 999);
        assert_eq!(price_to_cents(0.0), 0);
    }
}
