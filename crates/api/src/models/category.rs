//! Product categories.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stride_core::CategoryId;

/// A product category.
///
/// Products reference categories by name, not by id, so renaming a
/// category does not re-home the products that were filed under the old
/// name. Deleting a category leaves its products orphaned but listable.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
