//! # Geocoding
//!
//! Address resolution behind a trait so the provider can be swapped, plus
//! great-circle distance for the radius search. The default implementation
//! resolves addresses deterministically offline: the same address always
//! maps to the same point, which is all the directory needs without a
//! provider account.

use thiserror::Error;

use crate::model::Location;

/// Mean Earth radius in miles, used for radius search
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Result type for geocoding
pub type GeoResult<T> = Result<T, GeoError>;

/// Geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeoError {
    #[error("Unable to geocode address: {0}")]
    Unresolvable(String),
}

/// Address resolver seam
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address into a location
    fn geocode(&self, address: &str) -> GeoResult<Location>;
}

/// Deterministic offline geocoder.
///
/// Hashes the normalized address into a stable coordinate. Not geographically
/// meaningful, but stable across runs and distinct per address, which keeps
/// the radius search exercisable without a network provider.
#[derive(Debug, Default)]
pub struct OfflineGeocoder;

impl OfflineGeocoder {
    pub fn new() -> Self {
        Self
    }
}

impl Geocoder for OfflineGeocoder {
    fn geocode(&self, address: &str) -> GeoResult<Location> {
        let normalized = address.trim();
        if normalized.is_empty() {
            return Err(GeoError::Unresolvable(address.to_string()));
        }

        let (longitude, latitude) = pseudo_coordinates(normalized);
        let zipcode = extract_zipcode(normalized);

        Ok(Location {
            location_type: "Point".to_string(),
            coordinates: [longitude, latitude],
            formatted_address: normalized.to_string(),
            street: None,
            city: None,
            state: None,
            zipcode,
            country: None,
        })
    }
}

/// FNV-1a over the normalized address, spread into coordinate ranges
fn pseudo_coordinates(address: &str) -> (f64, f64) {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in address.to_ascii_lowercase().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }

    let lon_part = (hash >> 32) as f64 / u32::MAX as f64;
    let lat_part = (hash & 0xffff_ffff) as f64 / u32::MAX as f64;

    // Keep latitudes away from the poles
    let longitude = lon_part * 360.0 - 180.0;
    let latitude = lat_part * 120.0 - 60.0;
    (longitude, latitude)
}

/// Last token that looks like a postal code
fn extract_zipcode(address: &str) -> Option<String> {
    address
        .split_whitespace()
        .rev()
        .find(|token| token.len() >= 4 && token.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Great-circle distance in miles between two [longitude, latitude] points
pub fn haversine_miles(a: [f64; 2], b: [f64; 2]) -> f64 {
    let (lon_a, lat_a) = (a[0].to_radians(), a[1].to_radians());
    let (lon_b, lat_b) = (b[0].to_radians(), b[1].to_radians());

    let d_lat = lat_b - lat_a;
    let d_lon = lon_b - lon_a;

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}
