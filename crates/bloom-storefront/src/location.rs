//! Address detection from device coordinates.
//!
//! Coordinates are reverse geocoded through a Nominatim-compatible service
//! and the result is shaped for the Indian address form. Any failure along
//! the way collapses into a single "please enter manually" error, so the
//! caller only has to fall back to the manual form.

use crate::error::{Result, StorefrontError};
use bloom_commerce::checkout::{AddressForm, DEFAULT_COUNTRY};
use bloom_data::{FetchClient, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const CITY_NOT_DETECTED: &str = "City not detected";
pub const STATE_NOT_DETECTED: &str = "State not detected";
pub const ADDRESS_NOT_AVAILABLE: &str = "Address details not available";

const USER_AGENT: &str = "bouquet-bar-storefront/0.1";

/// A device position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Checked constructor: latitude within ±90, longitude within ±180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(StorefrontError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Why the device could not report a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("Location access denied. Please enable location permissions.")]
    PermissionDenied,

    #[error("Location information unavailable.")]
    Unavailable,

    #[error("Location request timed out. Please try again.")]
    Timeout,

    #[error("Geolocation is not supported by this browser")]
    Unsupported,
}

/// Address fields recovered from a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedAddress {
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl DetectedAddress {
    /// Build from a Nominatim `address` object.
    pub fn from_components(address: &Map<String, Value>) -> Self {
        let pick = |keys: &[&str]| -> String {
            keys.iter()
                .filter_map(|k| address.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .find(|v| !v.is_empty())
                .unwrap_or_default()
                .to_string()
        };

        let line1 = [
            pick(&["house_number"]),
            pick(&["road", "street"]),
            pick(&["suburb", "neighbourhood", "quarter"]),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        let city = pick(&["city", "municipality", "town", "village"]);
        let state = pick(&["state", "region"]);
        let country = pick(&["country"]);

        Self {
            address_line1: or_placeholder(line1, ADDRESS_NOT_AVAILABLE),
            city: or_placeholder(city, CITY_NOT_DETECTED),
            state: or_placeholder(state, STATE_NOT_DETECTED),
            postal_code: pick(&["postcode"]),
            country: or_placeholder(country, DEFAULT_COUNTRY),
        }
    }

    /// Copy detected fields into an address form. Placeholders and empty
    /// values leave the form's own value in place.
    pub fn apply_to(&self, form: &mut AddressForm) {
        let fill = |target: &mut String, value: &str, placeholder: &str| {
            if !value.is_empty() && value != placeholder {
                *target = value.to_string();
            }
        };
        fill(&mut form.address_line1, &self.address_line1, ADDRESS_NOT_AVAILABLE);
        fill(&mut form.city, &self.city, CITY_NOT_DETECTED);
        fill(&mut form.state, &self.state, STATE_NOT_DETECTED);
        fill(&mut form.postal_code, &self.postal_code, "");
        fill(&mut form.country, &self.country, "");
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

#[derive(Debug, Deserialize)]
struct ReverseReply {
    #[serde(default)]
    address: Option<Map<String, Value>>,
}

/// Result of a successful detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetection {
    pub coordinates: Coordinates,
    pub address: DetectedAddress,
}

/// Reverse geocoding client.
pub struct Geocoder<T> {
    client: FetchClient<T>,
}

impl<T: Transport> Geocoder<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            client: FetchClient::new(transport)
                .with_base_url(base_url)
                .with_default_header("User-Agent", USER_AGENT),
        }
    }

    /// Address at `coordinates`.
    pub fn reverse(&self, coordinates: Coordinates) -> Result<DetectedAddress> {
        let reply = self
            .client
            .get("/reverse")
            .query("format", "json")
            .query("lat", coordinates.latitude)
            .query("lon", coordinates.longitude)
            .query("addressdetails", 1)
            .accept("application/json")
            .send_json::<ReverseReply>();

        match reply {
            Ok(ReverseReply {
                address: Some(address),
            }) => Ok(DetectedAddress::from_components(&address)),
            Ok(_) => {
                tracing::warn!(?coordinates, "no address found for location");
                Err(StorefrontError::Location)
            }
            Err(e) => {
                tracing::warn!(?coordinates, error = %e, "reverse geocoding failed");
                Err(StorefrontError::Location)
            }
        }
    }

    /// Turn a device position reading into an address.
    pub fn detect(
        &self,
        position: std::result::Result<Coordinates, PositionError>,
    ) -> Result<LocationDetection> {
        let coordinates = position?;
        let address = self.reverse(coordinates)?;
        Ok(LocationDetection {
            coordinates,
            address,
        })
    }
}
