//! The status board: a passive, unattended display session.
//!
//! Replication and rotation live in `rotation`; this module is the
//! driver and the text renderer. The loop sleeps in small increments,
//! feeds the elapsed time to the state machine, and redraws whenever a
//! poll brought a newer document or the slide changed.

use std::thread;
use std::time::Duration;

use crate::board::{is_forward, is_port_side};
use crate::model::{BoardDocument, VesselKind};
use crate::rotation::{Rotation, SLIDE_COUNT};
use crate::storage::Store;

/// Granularity of the display's sleep loop.
const TICK_MS: u64 = 250;

/// Runs the display loop until the process is interrupted.
pub fn run(store: &Store, identity: Option<&str>) -> Result<(), String> {
    let mut rotation = Rotation::start(store, identity.map(String::from));
    let mut last_generation = rotation.snapshot().generation;
    render(rotation.snapshot(), rotation.slide());

    while rotation.is_active() {
        thread::sleep(Duration::from_millis(TICK_MS));
        let tick = rotation.tick(store, TICK_MS);
        let generation = rotation.snapshot().generation;
        if tick.advanced || (tick.polled && generation != last_generation) {
            last_generation = generation;
            render(rotation.snapshot(), rotation.slide());
        }
    }
    Ok(())
}

fn render(doc: &BoardDocument, slide: usize) {
    // Clear and home; the board owns the whole terminal.
    print!("\x1b[2J\x1b[H");
    println!("━━━ STATUS BOARD · slide {}/{SLIDE_COUNT} ━━━", slide + 1);
    println!();
    match slide {
        0 => render_well(doc),
        1 => render_route(doc),
        2 => render_fleet(doc),
        3 => render_equipment(doc),
        _ => render_weather(doc),
    }
    render_ticker(doc);
}

fn render_well(doc: &BoardDocument) {
    println!("WELL");
    println!("  Name:        {}", doc.well.name);
    println!("  Coordinates: {}", doc.well.coordinates);
    println!("  EDS status:  {}", doc.eds.eds_status);
    println!("  Latch:       {}", doc.eds.latch_status);
}

fn render_route(doc: &BoardDocument) {
    println!("ROUTE");
    println!("  {}", doc.well.route);
    println!("  Acoustic: {} {}", doc.acoustic.status, doc.acoustic.frequency);
    if !doc.acoustic.notes.is_empty() {
        println!("  {}", doc.acoustic.notes);
    }
}

fn render_fleet(doc: &BoardDocument) {
    println!("FLEET");
    if doc.vessels.is_empty() {
        println!("  No vessels on the board");
        return;
    }
    for vessel in &doc.vessels {
        let zone = match vessel.kind {
            VesselKind::Operating => {
                let side = if is_port_side(&vessel.berth) { 'P' } else { 'S' };
                let end = if is_forward(&vessel.berth) { "FWD" } else { "AFT" };
                format!("[{side}-{end}]")
            }
            _ => "       ".to_string(),
        };
        let mut line = format!("  {zone} {:<20} {}", vessel.name, vessel.kind);
        if !vessel.berth.is_empty() {
            line.push_str(&format!(" @ {}", vessel.berth));
        }
        if !vessel.arrival.is_empty() {
            line.push_str(&format!("  arrived {}", vessel.arrival));
        }
        println!("{line}");
        if let Some(op) = vessel.active_op() {
            println!("        ▶ {} (P{})", op.description, op.priority);
        }
    }
}

fn render_equipment(doc: &BoardDocument) {
    println!("EQUIPMENT / CARGO");
    println!("  Equipment: {} x{}", doc.equipment.kind, doc.equipment.quantity);
    if !doc.equipment.remarks.is_empty() {
        println!("  {}", doc.equipment.remarks);
    }
    println!("  Explosive cargo:   {}", doc.equipment.cargo_explosive);
    println!("  Radioactive cargo: {}", doc.equipment.cargo_radioactive);
    if !doc.equipment.cargo_note.is_empty() {
        println!("  {}", doc.equipment.cargo_note);
    }
}

fn render_weather(doc: &BoardDocument) {
    let title = if doc.weather.title.is_empty() {
        "WEATHER FORECAST"
    } else {
        &doc.weather.title
    };
    println!("{title}");
    if doc.has_weather_image() {
        println!("  [forecast chart on file]");
    } else {
        println!("  NO WEATHER IMAGE");
    }
    println!();
    println!("FLIGHTS");
    if doc.flights.is_empty() {
        println!("  NO SCHEDULED FLIGHTS");
    }
    for flight in &doc.flights {
        println!(
            "  ✈ {:<10} ETD {:<12} ETA {:<12} [{}]  {}",
            flight.prefix, flight.etd, flight.eta, flight.status, flight.info
        );
    }
}

fn render_ticker(doc: &BoardDocument) {
    let active: Vec<&str> = doc
        .tags
        .iter()
        .filter(|tag| tag.active)
        .map(|tag| tag.text.as_str())
        .collect();
    if !active.is_empty() {
        println!();
        println!("‖ {} ‖", active.join(" ‖ "));
    }
}
