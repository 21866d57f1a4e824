use serde::Deserialize;

use crate::{
    error::AppError::{self, InvalidInput},
    geo::{Point, SphericalCap},
};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

/// Anything that is not a positive integer falls back to the default.
pub fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(default)
}

pub fn name_fragment(params: &NameParams) -> Result<&str, AppError> {
    match params.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(InvalidInput("Restaurant name is required".to_string())),
    }
}

pub fn search_area(params: &LocationParams) -> Result<SphericalCap, AppError> {
    let (Some(lat), Some(lng), Some(radius)) = (
        present(&params.lat),
        present(&params.lng),
        present(&params.radius),
    ) else {
        return Err(InvalidInput(
            "Latitude, longitude, and radius are required.".to_string(),
        ));
    };

    let invalid = || InvalidInput("Invalid latitude, longitude, or radius.".to_string());

    let latitude = number(lat).ok_or_else(invalid)?;
    let longitude = number(lng).ok_or_else(invalid)?;
    let radius = number(radius).filter(|r| *r >= 0.0).ok_or_else(invalid)?;

    let center = Point::new(longitude, latitude).ok_or_else(invalid)?;

    Ok(SphericalCap::from_km(center, radius))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::EARTH_RADIUS_KM;

    fn location(lat: Option<&str>, lng: Option<&str>, radius: Option<&str>) -> LocationParams {
        LocationParams {
            lat: lat.map(String::from),
            lng: lng.map(String::from),
            radius: radius.map(String::from),
        }
    }

    fn message(result: Result<SphericalCap, AppError>) -> String {
        match result {
            Err(InvalidInput(message)) => message,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn test_positive_or() {
        assert_eq!(positive_or(None, 16), 16);
        assert_eq!(positive_or(Some("4"), 16), 4);
        assert_eq!(positive_or(Some(" 4 "), 16), 4);
        assert_eq!(positive_or(Some("0"), 16), 16);
        assert_eq!(positive_or(Some("-2"), 1), 1);
        assert_eq!(positive_or(Some("two"), 1), 1);
        assert_eq!(positive_or(Some(""), 1), 1);
    }

    #[test]
    fn test_name_fragment() {
        let missing = NameParams { name: None };
        let empty = NameParams {
            name: Some(String::new()),
        };
        let given = NameParams {
            name: Some("spice".to_string()),
        };

        assert!(matches!(name_fragment(&missing), Err(InvalidInput(_))));
        assert!(matches!(name_fragment(&empty), Err(InvalidInput(_))));
        assert_eq!(name_fragment(&given).unwrap(), "spice");
    }

    #[test]
    fn test_search_area() {
        let cap = search_area(&location(Some("12.9"), Some("77.0"), Some("5"))).unwrap();

        assert_eq!(cap.center, Point::new(77.0, 12.9).unwrap());
        assert_eq!(cap.radius, 5.0 / EARTH_RADIUS_KM);
    }

    #[test]
    fn test_search_area_missing() {
        for params in [
            location(None, Some("77"), Some("5")),
            location(Some("12"), None, Some("5")),
            location(Some("12"), Some("77"), None),
            location(Some(""), Some("77"), Some("5")),
        ] {
            assert_eq!(
                message(search_area(&params)),
                "Latitude, longitude, and radius are required."
            );
        }
    }

    #[test]
    fn test_search_area_invalid() {
        for params in [
            location(Some("north"), Some("77"), Some("5")),
            location(Some("12"), Some("east"), Some("5")),
            location(Some("12"), Some("77"), Some("far")),
            location(Some("NaN"), Some("77"), Some("5")),
            location(Some("12"), Some("77"), Some("inf")),
            location(Some("12"), Some("77"), Some("-1")),
            location(Some("95"), Some("77"), Some("5")),
        ] {
            assert_eq!(
                message(search_area(&params)),
                "Invalid latitude, longitude, or radius."
            );
        }
    }
}
