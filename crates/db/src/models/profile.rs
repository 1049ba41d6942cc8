//! User profile model.

use chimaek_core::roles::Role;
use chimaek_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub display_name: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// The stored role. The CHECK constraint keeps it to known names.
    pub fn role(&self) -> Role {
        Role::from_claim(&self.role)
    }
}
