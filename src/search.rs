//! # Queries
//!
//! Every query walks the same shape: flatten each chain's embedded
//! `restaurants` into `(chain, entry)` pairs in storage order, filter, then
//! project.
//!
//! - Listing: page through the flattened entries
//! - Name: case-insensitive, unanchored substring on `restaurant.name`
//! - Location: entries inside a spherical cap around a point
//! - Lookup: first entry whose id renders to the requested id
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::{
    geo::{Point, SphericalCap},
    models::{Chain, Entry, RestaurantPage, RestaurantSummary},
};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 16;

pub fn flatten(chains: &[Chain]) -> impl Iterator<Item = (&Chain, &Entry)> {
    chains
        .iter()
        .flat_map(|chain| chain.restaurants.iter().map(move |entry| (chain, entry)))
}

/// `page` and `limit` are expected to be at least 1.
pub fn list_page(chains: &[Chain], page: u64, limit: u64) -> RestaurantPage {
    let skip = page.saturating_sub(1).saturating_mul(limit);

    let restaurants: Vec<Entry> = flatten(chains)
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .map(|(_, entry)| entry.clone())
        .collect();

    let total = flatten(chains).count() as u64;

    RestaurantPage {
        page,
        limit,
        total,
        total_pages: total.div_ceil(limit.max(1)),
        restaurants,
    }
}

/// Matches the fragment literally, ignoring case.
pub fn name_pattern(fragment: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(fragment))
        .case_insensitive(true)
        .build()
}

pub fn search_by_name(chains: &[Chain], pattern: &Regex) -> Vec<RestaurantSummary> {
    let matches: Vec<RestaurantSummary> = flatten(chains)
        .filter(|(_, entry)| pattern.is_match(entry.restaurant.name()))
        .map(|(chain, entry)| RestaurantSummary::new(chain, &entry.restaurant))
        .collect();

    debug!("Name search {} matched {}", pattern.as_str(), matches.len());

    matches
}

/// Returns the raw entries with `location.coordinates` filled in.
pub fn search_by_location(chains: &[Chain], cap: &SphericalCap) -> Vec<Entry> {
    let mut skipped = 0;

    let matches: Vec<Entry> = flatten(chains)
        .filter_map(|(_, entry)| {
            let Some(point) = stored_point(entry) else {
                skipped += 1;
                return None;
            };

            if !cap.contains(point) {
                return None;
            }

            let mut entry = entry.clone();
            if let Some(location) = entry.restaurant.location.as_mut() {
                location.coordinates = Some(point.coordinates());
            }

            Some(entry)
        })
        .collect();

    if skipped > 0 {
        debug!("Skipped {skipped} restaurants without usable coordinates");
    }
    debug!(
        "Location search around {:?} matched {}",
        cap.center,
        matches.len()
    );

    matches
}

pub fn find_by_id(chains: &[Chain], id: &str) -> Option<Entry> {
    flatten(chains)
        .find(|(_, entry)| {
            entry
                .restaurant
                .id
                .as_ref()
                .is_some_and(|restaurant_id| restaurant_id.to_string() == id)
        })
        .map(|(_, entry)| entry.clone())
}

fn stored_point(entry: &Entry) -> Option<Point> {
    let location = entry.restaurant.location.as_ref()?;

    Point::parse(&location.longitude_text()?, &location.latitude_text()?)
}
