//! The in-memory board engine.
//!
//! One `Board` is owned by an editing session. It wraps the document,
//! applies every operator mutation synchronously, and tracks which
//! vessels carry unsaved edits. Persistence is someone else's job: the
//! engine never touches the gateway, and a per-row save only stamps the
//! row's visible update time.
//!
//! The impl is split by concern:
//!
//! - `board/berth.rs` — vessel kind changes and berth allocation
//! - `board/operations.rs` — per-vessel task lists

mod berth;
mod operations;

use std::collections::HashSet;

use jiff::Zoned;
use uuid::Uuid;

use crate::model::{
    BoardDocument, Departure, Flight, FlightStatus, Orientation, StatusTag, Vessel, VesselKind,
};
use crate::timefmt;

pub use berth::{CANONICAL_BERTHS, STANDBY_BERTHS, is_forward, is_port_side};

/// Errors from board mutations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("no vessel at index {0}")]
    VesselIndex(usize),
}

pub type Result<T> = core::result::Result<T, BoardError>;

/// A typed field edit, applied through [`Board::set_field`].
#[derive(Debug, Clone)]
pub enum FieldEdit {
    Name(String),
    Arrival(String),
    Kind(VesselKind),
    Berth(String),
    Orientation(Orientation),
}

/// In-memory board state plus per-vessel unsaved markers.
pub struct Board {
    doc: BoardDocument,
    dirty: HashSet<Uuid>,
}

impl Board {
    /// Wraps a loaded document. All vessels start clean.
    pub fn new(doc: BoardDocument) -> Self {
        Self {
            doc,
            dirty: HashSet::new(),
        }
    }

    pub fn document(&self) -> &BoardDocument {
        &self.doc
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.doc.vessels
    }

    pub fn vessel(&self, index: usize) -> Result<&Vessel> {
        self.doc
            .vessels
            .get(index)
            .ok_or(BoardError::VesselIndex(index))
    }

    /// Whether the vessel has edits not yet covered by a per-row save.
    pub fn is_dirty(&self, index: usize) -> Result<bool> {
        Ok(self.dirty.contains(&self.vessel(index)?.id))
    }

    // ── Registry ──

    /// Adds a vessel with default fields. Returns its index.
    pub fn add_vessel(&mut self, name: impl Into<String>) -> usize {
        self.doc.vessels.push(Vessel::new(name));
        self.doc.vessels.len() - 1
    }

    /// Removes a vessel and everything on it. Irreversible; the caller
    /// must have confirmed with the operator first.
    pub fn remove_vessel(&mut self, index: usize) -> Result<Vessel> {
        if index >= self.doc.vessels.len() {
            return Err(BoardError::VesselIndex(index));
        }
        let vessel = self.doc.vessels.remove(index);
        self.dirty.remove(&vessel.id);
        Ok(vessel)
    }

    /// Applies a field edit and marks the vessel unsaved. Kind edits
    /// additionally run the berth auto-logic keyed on the new value.
    pub fn set_field(&mut self, index: usize, edit: FieldEdit, now: &Zoned) -> Result<()> {
        match edit {
            FieldEdit::Kind(kind) => self.set_kind(index, kind, now)?,
            FieldEdit::Name(v) => self.vessel_mut(index)?.name = v,
            FieldEdit::Arrival(v) => self.vessel_mut(index)?.arrival = v,
            FieldEdit::Berth(v) => self.vessel_mut(index)?.berth = v,
            FieldEdit::Orientation(o) => self.vessel_mut(index)?.orientation = Some(o),
        }
        self.mark_dirty(index)
    }

    /// Replaces the departure record.
    pub fn set_departure(&mut self, index: usize, departure: Departure) -> Result<()> {
        self.vessel_mut(index)?.departure = departure;
        self.mark_dirty(index)
    }

    // ── Per-row save ──

    /// Stamps the vessel's visible update time and clears its unsaved
    /// marker. Local only: nothing is persisted, and the whole-document
    /// persist neither requires nor performs this.
    pub fn save_vessel(&mut self, index: usize, now: &Zoned) -> Result<()> {
        let stamp = timefmt::stamp_time(now);
        let vessel = self.vessel_mut(index)?;
        vessel.updated_at = stamp;
        let id = vessel.id;
        self.dirty.remove(&id);
        Ok(())
    }

    // ── Flights & tags ──
    // Document-level sections; the per-vessel unsaved markers don't apply.

    pub fn add_flight(&mut self, flight: Flight) {
        self.doc.flights.push(flight);
    }

    pub fn remove_flight(&mut self, index: usize) -> Option<Flight> {
        (index < self.doc.flights.len()).then(|| self.doc.flights.remove(index))
    }

    pub fn set_flight_status(&mut self, index: usize, status: FlightStatus) -> bool {
        match self.doc.flights.get_mut(index) {
            Some(flight) => {
                flight.status = status;
                true
            }
            None => false,
        }
    }

    pub fn add_tag(&mut self, tag: StatusTag) {
        self.doc.tags.push(tag);
    }

    pub fn toggle_tag(&mut self, index: usize) -> bool {
        match self.doc.tags.get_mut(index) {
            Some(tag) => {
                tag.active = !tag.active;
                true
            }
            None => false,
        }
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<StatusTag> {
        (index < self.doc.tags.len()).then(|| self.doc.tags.remove(index))
    }

    fn vessel_mut(&mut self, index: usize) -> Result<&mut Vessel> {
        self.doc
            .vessels
            .get_mut(index)
            .ok_or(BoardError::VesselIndex(index))
    }

    fn mark_dirty(&mut self, index: usize) -> Result<()> {
        let id = self.vessel(index)?.id;
        self.dirty.insert(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    fn noon() -> Zoned {
        date(2026, 8, 7).at(12, 0, 0, 0).in_tz("UTC").unwrap()
    }

    fn board_with(names: &[&str]) -> Board {
        let mut board = Board::new(BoardDocument::default());
        for name in names {
            board.add_vessel(*name);
        }
        board
    }

    #[test]
    fn new_vessels_start_clean_with_default_fields() {
        let board = board_with(&["SKANDI"]);
        let vessel = board.vessel(0).unwrap();

        assert_eq!(vessel.name, "SKANDI");
        assert_eq!(vessel.kind, VesselKind::Other);
        assert_eq!(vessel.berth, "");
        assert!(vessel.ops.is_empty());
        assert!(!board.is_dirty(0).unwrap());
    }

    #[test]
    fn field_edit_marks_vessel_dirty() {
        let mut board = board_with(&["SKANDI"]);
        board
            .set_field(0, FieldEdit::Arrival("07/08 06:00".into()), &noon())
            .unwrap();

        assert!(board.is_dirty(0).unwrap());
        assert_eq!(board.vessel(0).unwrap().arrival, "07/08 06:00");
    }

    #[test]
    fn save_vessel_stamps_time_and_clears_dirty() {
        let mut board = board_with(&["SKANDI"]);
        board
            .set_field(0, FieldEdit::Name("SKANDI ADMIRAL".into()), &noon())
            .unwrap();
        assert!(board.is_dirty(0).unwrap());

        board.save_vessel(0, &noon()).unwrap();

        assert!(!board.is_dirty(0).unwrap());
        assert_eq!(board.vessel(0).unwrap().updated_at, "12:00");
    }

    #[test]
    fn save_only_touches_its_own_row() {
        let mut board = board_with(&["A", "B"]);
        board
            .set_field(0, FieldEdit::Name("A2".into()), &noon())
            .unwrap();
        board
            .set_field(1, FieldEdit::Name("B2".into()), &noon())
            .unwrap();

        board.save_vessel(0, &noon()).unwrap();

        assert!(!board.is_dirty(0).unwrap());
        assert!(board.is_dirty(1).unwrap());
    }

    #[test]
    fn removing_a_vessel_keeps_other_dirty_flags_intact() {
        let mut board = board_with(&["A", "B"]);
        board
            .set_field(1, FieldEdit::Name("B2".into()), &noon())
            .unwrap();

        board.remove_vessel(0).unwrap();

        // B shifted to index 0 and must still read as unsaved.
        assert!(board.is_dirty(0).unwrap());
    }

    #[test]
    fn out_of_range_index_is_a_typed_error() {
        let mut board = board_with(&[]);
        assert!(matches!(
            board.remove_vessel(3),
            Err(BoardError::VesselIndex(3))
        ));
    }

    #[test]
    fn flight_and_tag_sections_edit_in_place() {
        let mut board = board_with(&[]);
        board.add_flight(Flight::new("PT-ABC"));
        board.add_tag(StatusTag::new("CRANE DOWN", crate::model::TagColor::Red));

        assert!(board.set_flight_status(0, FlightStatus::Delayed));
        assert!(board.toggle_tag(0));
        assert!(!board.document().tags[0].active);
        assert!(board.remove_flight(0).is_some());
        assert!(board.remove_flight(0).is_none());
    }
}
