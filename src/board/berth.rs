//! Vessel kind changes and berth allocation.
//!
//! Allocation is best-effort: when every canonical berth is held by
//! another operating vessel the allocator still assigns PORT FWD, and
//! the collision is surfaced on the board rather than rejected. The
//! availability query likewise re-admits a vessel's own colliding
//! berth so the operator can see and resolve the conflict.

use std::collections::HashSet;

use jiff::Zoned;

use crate::model::{Orientation, VesselKind};
use crate::timefmt;

use super::{Board, Result};

/// The four berths alongside the rig, in fixed allocation order.
pub const CANONICAL_BERTHS: [&str; 4] = ["PORT FWD", "PORT AFT", "STBD FWD", "STBD AFT"];

/// Standby anchorages. Not modeled as scarce; the first is assigned
/// automatically and the rest are picked by hand.
pub const STANDBY_BERTHS: [&str; 3] = ["AM 11", "AM 05", "OM 11"];

/// Zone classification is derived from the berth name, never stored.
/// PORT berths render on the red side of the board, STBD on the green.
pub fn is_port_side(berth: &str) -> bool {
    berth.contains("PORT")
}

pub fn is_forward(berth: &str) -> bool {
    berth.contains("FWD")
}

impl Board {
    /// Sets the vessel's kind and runs the auto-logic keyed on the new
    /// value: operating vessels get the first free canonical berth,
    /// standby vessels the default anchorage, departed vessels a
    /// defaulted departure time, and everything else a cleared berth.
    pub(super) fn set_kind(&mut self, index: usize, kind: VesselKind, now: &Zoned) -> Result<()> {
        let occupied = self.berths_held_by_others(index);
        let vessel = self.vessel_mut(index)?;
        vessel.kind = kind;
        match kind {
            VesselKind::Operating => {
                vessel.berth = CANONICAL_BERTHS
                    .iter()
                    .find(|berth| !occupied.contains(**berth))
                    .copied()
                    // All four taken: default to PORT FWD and let the
                    // conflict show.
                    .unwrap_or(CANONICAL_BERTHS[0])
                    .to_string();
                if vessel.orientation.is_none() {
                    vessel.orientation = Some(Orientation::BowToBow);
                }
            }
            VesselKind::Standby => vessel.berth = STANDBY_BERTHS[0].to_string(),
            VesselKind::Departed => {
                vessel.berth.clear();
                if vessel.departure.time.is_empty() {
                    vessel.departure.time = timefmt::stamp_time(now);
                }
            }
            VesselKind::Other => vessel.berth.clear(),
        }
        Ok(())
    }

    /// Berth options the operator may pick for this vessel: canonical
    /// berths minus those held by other operating vessels, plus the
    /// vessel's own current berth even when it collides.
    pub fn selectable_berths(&self, index: usize) -> Result<Vec<&'static str>> {
        let own = self.vessel(index)?.berth.clone();
        let occupied = self.berths_held_by_others(index);
        Ok(CANONICAL_BERTHS
            .iter()
            .filter(|berth| !occupied.contains(**berth) || **berth == own)
            .copied()
            .collect())
    }

    /// Berths held by every *other* operating vessel.
    fn berths_held_by_others(&self, index: usize) -> HashSet<String> {
        self.doc
            .vessels
            .iter()
            .enumerate()
            .filter(|(i, v)| {
                *i != index && v.kind == VesselKind::Operating && !v.berth.is_empty()
            })
            .map(|(_, v)| v.berth.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    use crate::board::FieldEdit;
    use crate::model::BoardDocument;

    fn noon() -> Zoned {
        date(2026, 8, 7).at(12, 0, 0, 0).in_tz("UTC").unwrap()
    }

    fn fleet(count: usize) -> Board {
        let mut board = Board::new(BoardDocument::default());
        for i in 0..count {
            board.add_vessel(format!("VESSEL {i}"));
        }
        board
    }

    fn make_operating(board: &mut Board, index: usize) {
        board
            .set_field(index, FieldEdit::Kind(VesselKind::Operating), &noon())
            .unwrap();
    }

    #[test]
    fn operating_vessels_fill_canonical_berths_in_order() {
        let mut board = fleet(5);
        for i in 0..4 {
            make_operating(&mut board, i);
        }

        let berths: Vec<_> = (0..4)
            .map(|i| board.vessel(i).unwrap().berth.clone())
            .collect();
        assert_eq!(berths, ["PORT FWD", "PORT AFT", "STBD FWD", "STBD AFT"]);
    }

    #[test]
    fn fifth_operating_vessel_falls_back_to_port_fwd() {
        let mut board = fleet(5);
        for i in 0..5 {
            make_operating(&mut board, i);
        }

        // E shares PORT FWD with A: an accepted, visible conflict.
        assert_eq!(board.vessel(4).unwrap().berth, "PORT FWD");
        assert_eq!(board.vessel(0).unwrap().berth, "PORT FWD");
    }

    #[test]
    fn allocation_excludes_the_vessel_being_edited() {
        let mut board = fleet(1);
        make_operating(&mut board, 0);
        // Re-applying the kind must not see the vessel's own berth as
        // taken and drift to PORT AFT.
        make_operating(&mut board, 0);

        assert_eq!(board.vessel(0).unwrap().berth, "PORT FWD");
    }

    #[test]
    fn operating_defaults_orientation_only_when_unset() {
        let mut board = fleet(2);
        board
            .set_field(0, FieldEdit::Orientation(Orientation::BowToStern), &noon())
            .unwrap();
        make_operating(&mut board, 0);
        make_operating(&mut board, 1);

        assert_eq!(
            board.vessel(0).unwrap().orientation,
            Some(Orientation::BowToStern)
        );
        assert_eq!(
            board.vessel(1).unwrap().orientation,
            Some(Orientation::BowToBow)
        );
    }

    #[test]
    fn standby_gets_the_default_anchorage_unconditionally() {
        let mut board = fleet(2);
        board
            .set_field(0, FieldEdit::Kind(VesselKind::Standby), &noon())
            .unwrap();
        board
            .set_field(1, FieldEdit::Kind(VesselKind::Standby), &noon())
            .unwrap();

        assert_eq!(board.vessel(0).unwrap().berth, "AM 11");
        assert_eq!(board.vessel(1).unwrap().berth, "AM 11");
    }

    #[test]
    fn departed_clears_berth_and_stamps_missing_departure_time() {
        let mut board = fleet(1);
        make_operating(&mut board, 0);

        let half_past = date(2026, 8, 7).at(14, 30, 0, 0).in_tz("UTC").unwrap();
        board
            .set_field(0, FieldEdit::Kind(VesselKind::Departed), &half_past)
            .unwrap();

        let vessel = board.vessel(0).unwrap();
        assert_eq!(vessel.berth, "");
        assert_eq!(vessel.departure.time, "14:30");
    }

    #[test]
    fn departed_keeps_an_already_recorded_departure_time() {
        let mut board = fleet(1);
        board
            .set_departure(
                0,
                crate::model::Departure {
                    time: "08:15".into(),
                    ..Default::default()
                },
            )
            .unwrap();

        board
            .set_field(0, FieldEdit::Kind(VesselKind::Departed), &noon())
            .unwrap();

        assert_eq!(board.vessel(0).unwrap().departure.time, "08:15");
    }

    #[test]
    fn other_clears_the_berth() {
        let mut board = fleet(1);
        make_operating(&mut board, 0);
        board
            .set_field(0, FieldEdit::Kind(VesselKind::Other), &noon())
            .unwrap();

        assert_eq!(board.vessel(0).unwrap().berth, "");
    }

    #[test]
    fn selectable_berths_exclude_others_but_include_own_collision() {
        let mut board = fleet(5);
        for i in 0..5 {
            make_operating(&mut board, i);
        }

        // E holds PORT FWD in conflict with A. Both must still be
        // offered their own berth; the rest are all taken.
        assert_eq!(board.selectable_berths(4).unwrap(), ["PORT FWD"]);
        assert_eq!(board.selectable_berths(0).unwrap(), ["PORT FWD"]);

        // A free berth reappears for everyone once its holder departs.
        board
            .set_field(2, FieldEdit::Kind(VesselKind::Departed), &noon())
            .unwrap();
        assert_eq!(
            board.selectable_berths(4).unwrap(),
            ["PORT FWD", "STBD FWD"]
        );
    }

    #[test]
    fn zones_derive_from_berth_names() {
        assert!(is_port_side("PORT AFT"));
        assert!(!is_port_side("STBD FWD"));
        assert!(is_forward("STBD FWD"));
        assert!(!is_forward("PORT AFT"));
    }
}
