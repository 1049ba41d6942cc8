//! Repository for the `profiles` table.
//!
//! Profiles are keyed by the identity service's user id. A row is created on
//! first use; `initial_role` seeds its role from the caller's token.

use chimaek_core::roles::Role;
use chimaek_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::Profile;

const COLUMNS: &str = "id, user_id, display_name, role, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The stored role of `user_id`, if the user has a profile.
    pub async fn find_role(pool: &PgPool, user_id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(role.as_deref().map(Role::from_claim))
    }

    /// The user's profile, created with `initial_role` when missing.
    pub async fn ensure(pool: &PgPool, user_id: DbId, initial_role: Role) -> Result<Profile, sqlx::Error> {
        sqlx::query(
            "INSERT INTO profiles (user_id, role) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_profiles_user_id DO NOTHING",
        )
        .bind(user_id)
        .bind(initial_role.as_str())
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Set the display name, creating the profile with `initial_role` when
    /// missing. `None` clears the name.
    pub async fn set_display_name(
        pool: &PgPool,
        user_id: DbId,
        display_name: Option<&str>,
        initial_role: Role,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, display_name, role) VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_profiles_user_id \
             DO UPDATE SET display_name = EXCLUDED.display_name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(display_name)
            .bind(initial_role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Store `role` for `user_id`, creating the profile when missing.
    pub async fn set_role(pool: &PgPool, user_id: DbId, role: Role) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, role) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_profiles_user_id \
             DO UPDATE SET role = EXCLUDED.role \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Every profile, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }
}
