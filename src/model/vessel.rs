//! Vessel types: one entry per support vessel on the board.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::operation::{OpStatus, Operation};

/// A support vessel tracked by the operator.
///
/// Most fields are operator-entered free text; which ones are
/// meaningful depends on [`VesselKind`]. The berth field holds a
/// canonical berth name for operating vessels, a standby anchorage for
/// standby vessels, and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vessel {
    pub id: Uuid,
    pub name: String,

    /// Arrival time as entered, masked to `DD/MM HH:MM`.
    pub arrival: String,

    pub kind: VesselKind,
    pub berth: String,

    /// Mooring orientation relative to the rig. Only meaningful while
    /// operating.
    pub orientation: Option<Orientation>,

    /// `HH:MM` stamp of the last per-row save.
    pub updated_at: String,

    /// Only meaningful once the vessel has departed.
    pub departure: Departure,

    /// Sorted ascending by priority.
    pub ops: Vec<Operation>,

    /// May dangle after an op removal; read through [`Vessel::active_op`].
    pub active_op_id: Option<Uuid>,
}

impl Default for Vessel {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            arrival: String::new(),
            kind: VesselKind::Other,
            berth: String::new(),
            orientation: None,
            updated_at: String::new(),
            departure: Departure::default(),
            ops: Vec::new(),
            active_op_id: None,
        }
    }
}

impl Vessel {
    /// A freshly added vessel: kind OTHER, everything else empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// The active operation, if any.
    ///
    /// Validated lookup: a stored id that no longer matches an entry in
    /// `ops` reads as "no active operation". The stored id is never
    /// dereferenced directly.
    pub fn active_op(&self) -> Option<&Operation> {
        let id = self.active_op_id?;
        self.ops.iter().find(|op| op.id == id)
    }

    /// Whether `op` should display as in progress: it is the active
    /// operation and still pending.
    pub fn is_in_progress(&self, op: &Operation) -> bool {
        op.status == OpStatus::Pending && self.active_op().is_some_and(|a| a.id == op.id)
    }
}

/// What a vessel is currently doing, from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VesselKind {
    /// Working a canonical berth alongside the rig.
    Operating,

    /// Holding at a standby anchorage.
    Standby,

    /// Gone; the departure record applies.
    Departed,

    #[default]
    Other,
}

impl fmt::Display for VesselKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Operating => "OPERATING",
            Self::Standby => "STANDBY",
            Self::Departed => "DEPARTED",
            Self::Other => "OTHER",
        };
        f.write_str(s)
    }
}

impl FromStr for VesselKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPERATING" => Ok(Self::Operating),
            "STANDBY" => Ok(Self::Standby),
            "DEPARTED" => Ok(Self::Departed),
            "OTHER" => Ok(Self::Other),
            other => Err(format!(
                "unknown vessel kind '{other}' (expected operating, standby, departed, or other)"
            )),
        }
    }
}

/// Which way an operating vessel is moored against the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    BowToBow,
    BowToStern,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BowToBow => "BOW TO BOW",
            Self::BowToStern => "BOW TO STERN",
        };
        f.write_str(s)
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', " ").as_str() {
            "BOW TO BOW" => Ok(Self::BowToBow),
            "BOW TO STERN" => Ok(Self::BowToStern),
            other => Err(format!(
                "unknown orientation '{other}' (expected bow-to-bow or bow-to-stern)"
            )),
        }
    }
}

/// Departure record: when the vessel left, where to, and when it is
/// expected there. All free text; empty fields are simply not shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Departure {
    pub time: String,
    pub destination: String,
    pub eta: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_op_resolves_matching_id() {
        let mut vessel = Vessel::new("SKANDI");
        let op = Operation::new("Cargo transfer", 1);
        vessel.active_op_id = Some(op.id);
        vessel.ops.push(op);

        assert_eq!(vessel.active_op().unwrap().description, "Cargo transfer");
    }

    #[test]
    fn dangling_active_id_reads_as_none() {
        let mut vessel = Vessel::new("SKANDI");
        vessel.ops.push(Operation::new("Cargo transfer", 1));
        vessel.active_op_id = Some(Uuid::new_v4());

        assert!(vessel.active_op().is_none());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Operating".parse::<VesselKind>().unwrap(), VesselKind::Operating);
        assert_eq!("STANDBY".parse::<VesselKind>().unwrap(), VesselKind::Standby);
        assert!("moored".parse::<VesselKind>().is_err());
    }

    #[test]
    fn orientation_accepts_dashes() {
        assert_eq!(
            "bow-to-stern".parse::<Orientation>().unwrap(),
            Orientation::BowToStern
        );
    }
}
