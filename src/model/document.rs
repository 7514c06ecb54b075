//! The board document: everything one operator's display replicates.
//!
//! The whole document is persisted and fetched as a unit; there is no
//! finer-grained sync. Every field carries a serde default so documents
//! written under an older schema load with the missing fields filled
//! in rather than failing.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vessel::Vessel;

/// Full board state for one operator identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardDocument {
    pub well: WellInfo,
    pub eds: EdsInfo,
    pub equipment: EquipmentInfo,
    pub acoustic: AcousticInfo,
    pub weather: WeatherInfo,
    pub vessels: Vec<Vessel>,
    pub flights: Vec<Flight>,
    pub tags: Vec<StatusTag>,

    /// Stamped by the gateway on every persist; `None` until the
    /// document has been stored at least once.
    pub generation: Option<Timestamp>,
}

impl BoardDocument {
    /// Whether the weather slide has an image worth showing.
    ///
    /// The image field holds a data URI; anything at or under 100 bytes
    /// is a leftover placeholder, not a picture.
    pub fn has_weather_image(&self) -> bool {
        self.weather.image.len() > 100
    }

    pub fn has_flights(&self) -> bool {
        !self.flights.is_empty()
    }
}

/// Well identification shown on the first slide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WellInfo {
    pub name: String,
    pub coordinates: String,
    pub route: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdsInfo {
    pub eds_status: String,
    pub latch_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentInfo {
    pub kind: String,
    pub quantity: u32,
    pub remarks: String,
    pub cargo_explosive: String,
    pub cargo_radioactive: String,
    pub cargo_note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticInfo {
    pub status: String,
    pub frequency: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherInfo {
    pub title: String,

    /// Base64 data URI of the forecast chart. Populated by an external
    /// editor; this crate only stores and checks it.
    pub image: String,

    pub forecast: String,
    pub flight_status: String,
    pub notes: String,
}

/// A helicopter rotation shown on the weather/flights slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flight {
    pub id: Uuid,
    pub prefix: String,
    pub info: String,
    pub etd: String,
    pub eta: String,
    pub status: FlightStatus,
}

impl Default for Flight {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            prefix: String::new(),
            info: String::new(),
            etd: String::new(),
            eta: String::new(),
            status: FlightStatus::OnTime,
        }
    }
}

impl Flight {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightStatus {
    #[default]
    OnTime,
    Delayed,
    Arrived,
    Canceled,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OnTime => "ON TIME",
            Self::Delayed => "DELAYED",
            Self::Arrived => "ARRIVED",
            Self::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', " ").as_str() {
            "ON TIME" | "ONTIME" => Ok(Self::OnTime),
            "DELAYED" => Ok(Self::Delayed),
            "ARRIVED" => Ok(Self::Arrived),
            "CANCELED" => Ok(Self::Canceled),
            other => Err(format!(
                "unknown flight status '{other}' (expected on-time, delayed, arrived, or canceled)"
            )),
        }
    }
}

/// A banner entry on the display's ticker strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusTag {
    pub id: Uuid,
    pub text: String,
    pub color: TagColor,
    pub active: bool,
}

impl Default for StatusTag {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            text: String::new(),
            color: TagColor::Blue,
            active: true,
        }
    }
}

impl StatusTag {
    pub fn new(text: impl Into<String>, color: TagColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            color,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Red,
    Yellow,
    Blue,
    Green,
}

impl std::str::FromStr for TagColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "yellow" => Ok(Self::Yellow),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            other => Err(format!(
                "unknown tag color '{other}' (expected red, yellow, blue, or green)"
            )),
        }
    }
}
