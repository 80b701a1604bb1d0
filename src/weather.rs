//! Weather collaborator interface
//!
//! The risk engine consumes a `WeatherObservation`; how that value is
//! obtained (live API, cache, constant) is the provider's business. The
//! core behaves identically regardless of the source.

use crate::config::WeatherConfig;
use crate::types::weather::{Location, WeatherObservation};
use tracing::debug;

/// A single read operation returning the current observation for a
/// location. Implementations own their fallback policy; the core never
/// retries.
pub trait WeatherProvider {
    fn observe(&self, location: &Location) -> WeatherObservation;
}

/// Provider serving a fixed, configured observation. Used when no live
/// weather source is wired up.
pub struct StaticWeatherProvider {
    observation: WeatherObservation,
}

impl StaticWeatherProvider {
    /// Create a provider around a fixed observation
    pub fn new(observation: WeatherObservation) -> Self {
        Self {
            observation,
        }
    }

    /// Build the provider from the `[weather]` config section
    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::new(WeatherObservation::new(
            config.humidity,
            config.temperature,
            &config.description,
            config.wind_speed,
        ))
    }
}

impl WeatherProvider for StaticWeatherProvider {
    fn observe(&self, location: &Location) -> WeatherObservation {
        debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            "Serving static weather observation"
        );
        self.observation.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_returns_configured_observation() {
        let provider = StaticWeatherProvider::new(WeatherObservation::new(
            65,
            28.0,
            "partly cloudy",
            3.5,
        ));

        let observation = provider.observe(&Location::new(28.6, 77.2));
        assert_eq!(observation.humidity, 65);
        assert_eq!(observation.temperature, 28.0);
        assert_eq!(observation.description, "partly cloudy");
    }

    #[test]
    fn test_provider_is_location_independent() {
        let provider = StaticWeatherProvider::new(WeatherObservation::new(70, 25.0, "unknown", 2.0));

        let a = provider.observe(&Location::new(0.0, 0.0));
        let b = provider.observe(&Location::new(51.5, -0.1));
        assert_eq!(a, b);
    }
}
