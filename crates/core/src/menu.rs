//! Menu catalog validation used by the admin endpoints.

use crate::error::CoreError;
use crate::pricing::MenuPrices;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SLUG_LEN: usize = 100;

/// Validate a menu or category display name: non-blank, at most
/// [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be blank".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a category slug: lowercase ASCII letters, digits and single
/// hyphens, not starting or ending with a hyphen.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "slug must be 1 to {MAX_SLUG_LEN} characters"
        )));
    }
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single hyphens"
        )));
    }
    Ok(())
}

/// Derive a slug from a display name ("Fried Chicken" -> "fried-chicken").
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Validate the tier prices of a new or edited menu item. At least one
/// tier must be offered and none may be negative.
pub fn validate_item_prices(prices: &MenuPrices) -> Result<(), CoreError> {
    prices.validate()?;
    if prices.offered_tiers().is_empty() {
        return Err(CoreError::Validation(
            "a menu item must offer at least one price tier".to_string(),
        ));
    }
    Ok(())
}
