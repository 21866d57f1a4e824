//! # Documents
//!
//! Shapes stored in and served from the document store.
//!
//! A chain document embeds many restaurant entries under `restaurants`, each
//! entry wrapping the actual record under `restaurant`. Fields the server does
//! not interpret are kept in `extra` so raw records round-trip unchanged.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Entries that do not look like a restaurant are dropped on load.
    #[serde(default, deserialize_with = "usable_entries")]
    pub restaurants: Vec<Entry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub restaurant: Restaurant,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RestaurantId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Comma joined, e.g. `"North Indian, Chinese"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisines: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cost_for_two: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<UserRating>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Restaurant {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Imported data mixes numeric and textual ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RestaurantId {
    Number(Number),
    Text(String),
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestaurantId::Number(number) => write!(f, "{number}"),
            RestaurantId::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,

    /// Usually a string, kept exactly as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,

    /// `[longitude, latitude]`, only filled in on location search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn latitude_text(&self) -> Option<String> {
        coordinate_text(self.latitude.as_ref()?)
    }

    pub fn longitude_text(&self) -> Option<String> {
        coordinate_text(self.longitude.as_ref()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    /// Number or numeric string, served exactly as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reduced view returned by name search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RestaurantId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cost_for_two: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<Value>,
}

impl RestaurantSummary {
    pub fn new(chain: &Chain, restaurant: &Restaurant) -> Self {
        Self {
            chain_id: chain.id.clone(),
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
            cuisine: restaurant.cuisines.clone(),
            location: restaurant.location.clone(),
            featured_image: restaurant.featured_image.clone(),
            average_cost_for_two: restaurant.average_cost_for_two.clone(),
            aggregate_rating: restaurant
                .user_rating
                .as_ref()
                .and_then(|rating| rating.aggregate_rating.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPage {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub restaurants: Vec<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchResults {
    #[serde(default)]
    pub restaurants: Vec<Entry>,
}

fn coordinate_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn usable_entries<'de, D>(deserializer: D) -> Result<Vec<Entry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(raw)) => raw,
        Some(other) => {
            warn!("Skipping restaurants that are not a list: {other}");
            return Ok(Vec::new());
        }
    };

    let entries = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping restaurant entry {index}: {e}");
                None
            }
        })
        .collect();

    Ok(entries)
}
