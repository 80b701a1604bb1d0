//! Weather data structures consumed by the risk engine

use serde::{Deserialize, Serialize};

/// Geographic coordinates for a weather lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single weather observation, as delivered by the weather collaborator.
///
/// Read-only value object; the core never mutates or persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Relative humidity in percent
    pub humidity: i32,

    /// Air temperature in degrees Celsius
    pub temperature: f64,

    /// Free-text condition description (e.g. "light rain")
    pub description: String,

    /// Wind speed in m/s
    pub wind_speed: f64,
}

impl WeatherObservation {
    /// Create a new weather observation
    pub fn new(humidity: i32, temperature: f64, description: &str, wind_speed: f64) -> Self {
        Self {
            humidity,
            temperature,
            description: description.to_string(),
            wind_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_serialization() {
        let obs = WeatherObservation::new(65, 28.0, "partly cloudy", 3.5);

        let json = serde_json::to_string(&obs).unwrap();
        let deserialized: WeatherObservation = serde_json::from_str(&json).unwrap();

        assert_eq!(obs, deserialized);
    }

    #[test]
    fn test_observation_from_provider_json() {
        // Field names match the upstream weather API contract
        let json = r#"{"humidity":90,"temperature":15.0,"description":"heavy rain","wind_speed":5.2}"#;
        let obs: WeatherObservation = serde_json::from_str(json).unwrap();

        assert_eq!(obs.humidity, 90);
        assert_eq!(obs.temperature, 15.0);
        assert_eq!(obs.description, "heavy rain");
    }
}
