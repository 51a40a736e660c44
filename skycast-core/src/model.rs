use serde::{Deserialize, Serialize};

/// A geocoded city. Returned as a candidate by the search endpoint and
/// persisted verbatim when the user favorites it.
///
/// `state` and `country` are frequently absent in geocoding responses and
/// default to empty strings; `name`, `lat` and `lon` are required and a
/// missing or mistyped field fails deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    /// Human-readable label, e.g. `"Erie (PA, US)"`.
    ///
    /// Empty state/country render verbatim (`"Paris (, FR)"`); callers rely
    /// on this being a pure function of the three string fields.
    pub fn label(&self) -> String {
        format!("{} ({}, {})", self.name, self.state, self.country)
    }
}

/// A point-in-time weather reading for a coordinate, in imperial units.
/// Fetched fresh for every display, never cached or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub description: String,
    pub temp_f: f64,
    pub feels_like_f: f64,
    pub wind_mph: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_all_three_fields() {
        let city = City {
            name: "Erie".into(),
            state: "PA".into(),
            country: "US".into(),
            lat: 42.1,
            lon: -80.08,
        };

        assert_eq!(city.label(), "Erie (PA, US)");
    }

    #[test]
    fn label_renders_empty_fields_verbatim() {
        let city = City {
            name: "Paris".into(),
            state: String::new(),
            country: "FR".into(),
            lat: 48.85,
            lon: 2.35,
        };

        assert_eq!(city.label(), "Paris (, FR)");
    }

    #[test]
    fn city_deserializes_without_state_or_country() {
        let json = r#"{"name":"London","lat":51.5073,"lon":-0.1277}"#;
        let city: City = serde_json::from_str(json).expect("state/country are optional");

        assert_eq!(city.name, "London");
        assert_eq!(city.state, "");
        assert_eq!(city.country, "");
    }

    #[test]
    fn city_rejects_missing_coordinates() {
        let json = r#"{"name":"London","state":"","country":"GB"}"#;
        let res: Result<City, _> = serde_json::from_str(json);

        assert!(res.is_err());
    }
}
