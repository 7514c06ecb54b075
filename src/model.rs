//! Core data model for the board.
//!
//! Vessels and their operations are the operator-editable heart of the
//! system; the board document wraps them together with the read-only
//! display sections and is what the gateway persists and the display
//! replicates.

mod document;
mod operation;
mod vessel;

pub use document::{
    AcousticInfo, BoardDocument, EdsInfo, EquipmentInfo, Flight, FlightStatus, StatusTag,
    TagColor, WeatherInfo, WellInfo,
};
pub use operation::{OpStatus, Operation, next_status};
pub use vessel::{Departure, Orientation, Vessel, VesselKind};
