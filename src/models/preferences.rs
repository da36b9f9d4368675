use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

/// Per-user display and behaviour settings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Preferences {
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub units: String,
    pub default_rest_time: i64,
    pub theme: String,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

/// Measurement system used when displaying weights and distances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            other => Err(format!(
                "Invalid units '{}': expected 'metric' or 'imperial'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Invalid theme '{}': expected 'light' or 'dark'", other)),
        }
    }
}
