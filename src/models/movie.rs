use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CarouselImage {
    pub id: i32,
    pub image_url: String,
}

/// One screening on the listing pages.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShowCard {
    pub show_id: i32,
    pub movie_id: i32,
    pub title: String,
    pub genre: String,
    pub language: String,
    pub poster_url: String,
    pub rating: f32,
    pub rating_provider: String,
    pub age_limit: String,
}

/// A screening together with everything shown on the movie page.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShowDetail {
    pub show_id: i32,
    pub movie_id: i32,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub language: String,
    pub trailer_url: String,
    pub poster_url: String,
    pub rating: f32,
    pub rating_provider: String,
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
    pub age_limit: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub language: String,
    pub trailer_url: String,
    pub poster_url: String,
    pub rating: f32,
    pub rating_provider: String,
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
    pub age_limit: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieTitle {
    pub id: i32,
    pub title: String,
}

/// Editable movie attributes. `rating` is on a 0 to 10 scale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MovieFields {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    #[validate(length(min = 1, max = 50))]
    pub language: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub trailer_url: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub poster_url: String,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: f32,
    #[serde(default)]
    pub rating_provider: String,
    #[validate(range(min = 1, max = 1000))]
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 10))]
    pub age_limit: String,
}

/// Ratings are stored as whole tenths.
pub fn stored_rating(rating: f32) -> i32 {
    (rating * 10.0).round() as i32
}

const SHOW_CARD_COLUMNS: &str = r#"
    s.show_id, m.id AS movie_id, m.title, m.genre, m.language, m.poster_url,
    (m.rating::REAL / 10)::REAL AS rating, m.rating_provider, m.age_limit
"#;

impl CarouselImage {
    pub async fn all(db: &Database) -> Result<Vec<CarouselImage>, sqlx::Error> {
        sqlx::query_as::<_, CarouselImage>(
            "SELECT id, image_url FROM carousel_images ORDER BY order_priority, id",
        )
        .fetch_all(&db.pool)
        .await
    }
}

impl ShowCard {
    pub async fn all(db: &Database) -> Result<Vec<ShowCard>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM show s JOIN movies m ON m.id = s.movie_id ORDER BY s.show_date, s.start_time",
            SHOW_CARD_COLUMNS
        );
        sqlx::query_as::<_, ShowCard>(&sql).fetch_all(&db.pool).await
    }
}

impl ShowDetail {
    pub async fn find(show_id: i32, db: &Database) -> Result<Option<ShowDetail>, sqlx::Error> {
        sqlx::query_as::<_, ShowDetail>(
            r#"
            SELECT s.show_id, m.id AS movie_id, m.title, m.description, m.genre, m.language,
                   m.trailer_url, m.poster_url, (m.rating::REAL / 10)::REAL AS rating,
                   m.rating_provider, m.duration, m.release_date, m.age_limit
            FROM show s
            JOIN movies m ON m.id = s.movie_id
            WHERE s.show_id = $1
            "#,
        )
        .bind(show_id)
        .fetch_optional(&db.pool)
        .await
    }
}

impl Movie {
    pub async fn titles(db: &Database) -> Result<Vec<MovieTitle>, sqlx::Error> {
        sqlx::query_as::<_, MovieTitle>("SELECT id, title FROM movies ORDER BY title")
            .fetch_all(&db.pool)
            .await
    }

    pub async fn find(id: i32, db: &Database) -> Result<Option<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, description, genre, language, trailer_url, poster_url,
                   (rating::REAL / 10)::REAL AS rating, rating_provider, duration,
                   release_date, age_limit, created_at, updated_at
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn insert(fields: &MovieFields, db: &Database) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO movies (title, description, genre, language, trailer_url, poster_url,
                                rating, rating_provider, duration, release_date, age_limit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.genre)
        .bind(&fields.language)
        .bind(&fields.trailer_url)
        .bind(&fields.poster_url)
        .bind(stored_rating(fields.rating))
        .bind(&fields.rating_provider)
        .bind(fields.duration)
        .bind(fields.release_date)
        .bind(&fields.age_limit)
        .fetch_one(&db.pool)
        .await
    }

    /// Returns false when no movie has this id.
    pub async fn update(id: i32, fields: &MovieFields, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET title = $1, description = $2, genre = $3, language = $4, trailer_url = $5,
                poster_url = $6, rating = $7, rating_provider = $8, duration = $9,
                release_date = $10, age_limit = $11, updated_at = CURRENT_TIMESTAMP
            WHERE id = $12
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.genre)
        .bind(&fields.language)
        .bind(&fields.trailer_url)
        .bind(&fields.poster_url)
        .bind(stored_rating(fields.rating))
        .bind(&fields.rating_provider)
        .bind(fields.duration)
        .bind(fields.release_date)
        .bind(&fields.age_limit)
        .bind(id)
        .execute(&db.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
