use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub password_hash: &'a str,
}

impl User {
    pub async fn find_by_email(email: &str, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn insert(user: &NewUser<'_>, db: &Database) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (name, surname, email, phone_number, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.name)
        .bind(user.surname)
        .bind(user.email)
        .bind(user.phone_number)
        .bind(user.password_hash)
        .fetch_one(&db.pool)
        .await
    }
}

impl UserProfile {
    pub async fn find(user_id: i32, db: &Database) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT name, surname, email, phone_number FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&db.pool)
        .await
    }

    /// Updates the editable fields and returns the stored profile.
    pub async fn update(
        user_id: i32,
        name: &str,
        surname: &str,
        phone_number: &str,
        db: &Database,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users
            SET name = $1, surname = $2, phone_number = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING name, surname, email, phone_number
            "#,
        )
        .bind(name)
        .bind(surname)
        .bind(phone_number)
        .bind(user_id)
        .fetch_optional(&db.pool)
        .await
    }
}
