//! Platform domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity;

/// A broker or exchange assets are held at. Platform names are the
/// identity context for assets; the registry itself is deduplicated on
/// the normalized name alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Platform {
    pub fn new(name: &str) -> Self {
        Platform {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Normalized name used for duplicate detection.
    pub fn normalized_name(&self) -> String {
        identity::normalize(&self.name)
    }
}
