//! Per-vessel report text.
//!
//! The exact line order is load-bearing: operators paste these reports
//! into shift logs and radio scripts, so the format never varies.

use crate::model::{Vessel, VesselKind};

/// Renders one vessel's report. Every line ends with a newline.
pub fn vessel_report(vessel: &Vessel) -> String {
    let mut lines = vec![format!("VESSEL REPORT: {}", vessel.name)];

    if vessel.kind == VesselKind::Departed {
        lines.push(format!("Status: {}", vessel.kind));
        let dep = &vessel.departure;
        if !dep.time.is_empty() {
            lines.push(format!("Departure: {}", dep.time));
        }
        if !dep.destination.is_empty() {
            lines.push(format!("Destination: {}", dep.destination));
        }
        if !dep.eta.is_empty() {
            lines.push(format!("ETA: {}", dep.eta));
        }
    } else {
        lines.push(format!("Status: {}", vessel.kind));
        lines.push(format!("Berth: {}", vessel.berth));
        lines.push(format!("Arrival: {}", vessel.arrival));
        if vessel.kind == VesselKind::Operating
            && let Some(orientation) = vessel.orientation
        {
            lines.push(format!("Orientation: {orientation}"));
        }
    }

    if !vessel.ops.is_empty() {
        lines.push("Operations:".to_string());
        for op in &vessel.ops {
            let tag = if vessel.is_in_progress(op) {
                "IN PROGRESS".to_string()
            } else {
                op.status.to_string()
            };
            lines.push(format!("- {} (P{}) [{tag}]", op.description, op.priority));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Departure, OpStatus, Operation, Orientation};

    fn operating_vessel() -> Vessel {
        Vessel {
            name: "SKANDI ADMIRAL".into(),
            kind: VesselKind::Operating,
            berth: "PORT FWD".into(),
            arrival: "06/08 22:10".into(),
            orientation: Some(Orientation::BowToBow),
            ..Vessel::new("")
        }
    }

    #[test]
    fn operating_report_lists_berth_arrival_and_orientation() {
        let report = vessel_report(&operating_vessel());
        assert_eq!(
            report,
            "VESSEL REPORT: SKANDI ADMIRAL\n\
             Status: OPERATING\n\
             Berth: PORT FWD\n\
             Arrival: 06/08 22:10\n\
             Orientation: BOW TO BOW\n"
        );
    }

    #[test]
    fn orientation_line_is_omitted_when_unset() {
        let mut vessel = operating_vessel();
        vessel.orientation = None;

        assert!(!vessel_report(&vessel).contains("Orientation:"));
    }

    #[test]
    fn departed_report_shows_only_recorded_departure_fields() {
        let vessel = Vessel {
            name: "FAR SENATOR".into(),
            kind: VesselKind::Departed,
            departure: Departure {
                time: "14:30".into(),
                destination: String::new(),
                eta: "08/08 06:00".into(),
            },
            ..Vessel::new("")
        };

        assert_eq!(
            vessel_report(&vessel),
            "VESSEL REPORT: FAR SENATOR\n\
             Status: DEPARTED\n\
             Departure: 14:30\n\
             ETA: 08/08 06:00\n"
        );
    }

    #[test]
    fn operations_render_in_list_order_with_status_tags() {
        let mut vessel = operating_vessel();
        let mut active = Operation::new("Mud transfer", 1);
        active.status = OpStatus::Pending;
        let done = {
            let mut op = Operation::new("Deck cargo", 3);
            op.status = OpStatus::Completed;
            op
        };
        let canceled = {
            let mut op = Operation::new("Standby duty", 9);
            op.status = OpStatus::Canceled;
            op
        };
        let pending = Operation::new("Fuel transfer", 5);

        vessel.active_op_id = Some(active.id);
        vessel.ops = vec![active, done, pending, canceled];

        let report = vessel_report(&vessel);
        let op_lines: Vec<&str> = report
            .lines()
            .skip_while(|line| *line != "Operations:")
            .skip(1)
            .collect();
        assert_eq!(
            op_lines,
            [
                "- Mud transfer (P1) [IN PROGRESS]",
                "- Deck cargo (P3) [COMPLETED]",
                "- Fuel transfer (P5) [PENDING]",
                "- Standby duty (P9) [CANCELED]",
            ]
        );
    }

    #[test]
    fn dangling_active_reference_renders_as_plain_pending() {
        let mut vessel = operating_vessel();
        let op = Operation::new("Mud transfer", 1);
        vessel.active_op_id = Some(uuid::Uuid::new_v4());
        vessel.ops = vec![op];

        assert!(vessel_report(&vessel).contains("- Mud transfer (P1) [PENDING]"));
    }
}
