//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Credential handling (API key file + baked-in override)
//! - The OpenWeather gateway (geocoding search, current weather, key probe)
//! - The JSON-file favorites store
//! - Shared domain models
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or
//! services.

pub mod config;
pub mod favorites;
pub mod gateway;
pub mod model;

pub use config::KeyStore;
pub use favorites::{FavoritesError, FavoritesStore, MAX_FAVORITES};
pub use gateway::{DEFAULT_RESULT_LIMIT, OpenWeatherGateway, WeatherGateway};
pub use model::{City, WeatherSnapshot};
