use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    Room,
    Lawn,
}

impl ResourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ROOM" => Some(ResourceKind::Room),
            "LAWN" => Some(ResourceKind::Lawn),
            _ => None,
        }
    }
}

/// A bookable catalog entry: a room category or a lawn slot.
/// Prices are whole rupees; `price_per_plate` is set for catering lawns.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    pub price: i64,
    pub max_guests: i32,
    pub price_per_plate: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub struct NewResourceParams {
    pub kind: ResourceKind,
    pub name: String,
    pub price: i64,
    pub max_guests: i32,
    pub price_per_plate: Option<i64>,
}

impl Resource {
    pub fn new(params: NewResourceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: params.kind,
            name: params.name,
            price: params.price,
            max_guests: params.max_guests,
            price_per_plate: params.price_per_plate,
            created_at: Utc::now(),
        }
    }
}
