use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry. Created when the catalog is loaded and never mutated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Food {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Food {
    pub fn new(name: &str, image_url: Option<&str>) -> Self {
        Food {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            image_url: image_url.map(str::to_string),
            created_at: Utc::now(),
        }
    }
}

/// Sorts foods into catalog order: insertion time, then id so equal timestamps stay stable.
pub fn sort_catalog(foods: &mut [Food]) {
    foods.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
