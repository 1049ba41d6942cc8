//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?category=<slug>` filter for the menu item listing.
#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<String>,
}
