use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::database::Database;

/// Actor or crew member as listed on a movie page.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i32,
    pub full_name: String,
    pub image_url: String,
    pub role_description: String,
    pub is_actor: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Person {
    pub id: i32,
    pub full_name: String,
    pub image_url: String,
    pub occupation: String,
    pub role_description: String,
    pub born_date: Option<NaiveDate>,
    pub birthplace: String,
    pub about: String,
    pub is_actor: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PersonMovie {
    pub id: i32,
    pub title: String,
    pub poster_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PersonFields {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub image_url: String,
    #[validate(length(min = 1, max = 100))]
    pub occupation: String,
    #[serde(default)]
    pub role_description: String,
    pub born_date: Option<NaiveDate>,
    #[serde(default)]
    pub birthplace: String,
    #[serde(default)]
    pub about: String,
    pub is_actor: bool,
}

impl CrewMember {
    pub async fn for_movie(movie_id: i32, db: &Database) -> Result<Vec<CrewMember>, sqlx::Error> {
        sqlx::query_as::<_, CrewMember>(
            r#"
            SELECT ac.id, ac.full_name, ac.image_url, ac.role_description, ac.is_actor
            FROM actors_crew ac
            JOIN movie_actors_crew mac ON mac.actor_crew_id = ac.id
            WHERE mac.movie_id = $1
            ORDER BY ac.is_actor DESC, ac.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&db.pool)
        .await
    }
}

impl PersonMovie {
    pub async fn for_person(
        actor_crew_id: i32,
        db: &Database,
    ) -> Result<Vec<PersonMovie>, sqlx::Error> {
        sqlx::query_as::<_, PersonMovie>(
            r#"
            SELECT m.id, m.title, m.poster_url
            FROM movies m
            JOIN movie_actors_crew mac ON mac.movie_id = m.id
            WHERE mac.actor_crew_id = $1
            ORDER BY m.release_date DESC NULLS LAST, m.id
            "#,
        )
        .bind(actor_crew_id)
        .fetch_all(&db.pool)
        .await
    }
}

impl Person {
    pub async fn find(id: i32, db: &Database) -> Result<Option<Person>, sqlx::Error> {
        sqlx::query_as::<_, Person>(
            r#"
            SELECT id, full_name, image_url, occupation, role_description, born_date,
                   birthplace, about, is_actor
            FROM actors_crew
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    /// Inserts the person and links them to `movie_id` in one transaction.
    pub async fn insert_for_movie(
        movie_id: i32,
        fields: &PersonFields,
        db: &Database,
    ) -> Result<i32, sqlx::Error> {
        let mut tx = db.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO actors_crew (full_name, image_url, occupation, role_description,
                                     born_date, birthplace, about, is_actor)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&fields.full_name)
        .bind(&fields.image_url)
        .bind(&fields.occupation)
        .bind(&fields.role_description)
        .bind(fields.born_date)
        .bind(&fields.birthplace)
        .bind(&fields.about)
        .bind(fields.is_actor)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO movie_actors_crew (movie_id, actor_crew_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    pub async fn update(
        id: i32,
        fields: &PersonFields,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE actors_crew
            SET full_name = $1, image_url = $2, occupation = $3, role_description = $4,
                born_date = $5, birthplace = $6, about = $7, is_actor = $8
            WHERE id = $9
            "#,
        )
        .bind(&fields.full_name)
        .bind(&fields.image_url)
        .bind(&fields.occupation)
        .bind(&fields.role_description)
        .bind(fields.born_date)
        .bind(&fields.birthplace)
        .bind(&fields.about)
        .bind(fields.is_actor)
        .bind(id)
        .execute(&db.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors_crew WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
