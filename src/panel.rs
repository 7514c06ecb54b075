//! The operator panel: an interactive editing session.
//!
//! One session owns one in-memory board. Commands mutate it
//! synchronously; nothing touches the gateway until an explicit
//! `persist`. Per-vessel `save` is local — it stamps the row's visible
//! update time and clears its unsaved marker, and that is all.
//!
//! Another session persisting in the meantime simply wins: the board
//! is last-write-wins at document granularity and this session's next
//! `persist` clobbers theirs.

use std::io::{self, BufRead, Write};

use jiff::{Timestamp, Zoned};
use uuid::Uuid;

use crate::board::{Board, FieldEdit, STANDBY_BERTHS};
use crate::model::{
    Departure, Flight, FlightStatus, OpStatus, StatusTag, TagColor, VesselKind,
};
use crate::report;
use crate::storage::Store;
use crate::timefmt;

/// Runs the panel session until `quit` or end of input.
pub fn run(store: &Store, identity: &str) -> Result<(), String> {
    let mut board = Board::new(store.load(Some(identity)));
    println!("moorings panel — operator '{identity}'. Type 'help' for commands.");

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let Some(line) = input.next() else { break };
        let line = line.map_err(|e| e.to_string())?;
        match parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => {
                if let Err(e) = execute(&mut board, store, identity, cmd, &mut input) {
                    println!("{e}");
                }
            }
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

// ── Command grammar ──

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    List,
    Quit,
    Persist,
    Add { name: String },
    Remove { index: usize },
    Set { index: usize, field: String, value: String },
    DepartureInfo { index: usize, time: String, destination: String, eta: String },
    Berths { index: usize },
    Save { index: usize },
    Report { index: usize },
    Op(OpCommand),
    Flight(FlightCommand),
    Tag(TagCommand),
}

#[derive(Debug, Clone, PartialEq)]
enum OpCommand {
    Add { index: usize, priority: u8, text: String },
    Edit { index: usize, op: String, priority: u8, text: String },
    Toggle { index: usize, op: String },
    Done { index: usize, op: String },
    Cancel { index: usize, op: String },
    Remove { index: usize, op: String },
}

#[derive(Debug, Clone, PartialEq)]
enum FlightCommand {
    Add { prefix: String, etd: String, eta: String, info: String },
    Status { index: usize, status: FlightStatus },
    Remove { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum TagCommand {
    Add { color: TagColor, text: String },
    Toggle { index: usize },
    Remove { index: usize },
}

/// Parses one input line. Blank lines parse to `None`.
fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let cmd = match head {
        "help" => Command::Help,
        "list" => Command::List,
        "quit" | "exit" => Command::Quit,
        "persist" => Command::Persist,
        "add" => {
            let name = join(words);
            if name.is_empty() {
                return Err("usage: add <name>".to_string());
            }
            Command::Add { name }
        }
        "rm" => Command::Remove { index: index_arg(words.next())? },
        "set" => {
            let index = index_arg(words.next())?;
            let field = words
                .next()
                .ok_or_else(|| "usage: set <index> <field> <value>".to_string())?
                .to_string();
            Command::Set { index, field, value: join(words) }
        }
        "departure" => {
            let index = index_arg(words.next())?;
            let rest = join(words);
            let mut parts = rest.split('|').map(str::trim);
            Command::DepartureInfo {
                index,
                time: parts.next().unwrap_or_default().to_string(),
                destination: parts.next().unwrap_or_default().to_string(),
                eta: parts.next().unwrap_or_default().to_string(),
            }
        }
        "berths" => Command::Berths { index: index_arg(words.next())? },
        "save" => Command::Save { index: index_arg(words.next())? },
        "report" => Command::Report { index: index_arg(words.next())? },
        "op" => Command::Op(parse_op(&mut words)?),
        "flight" => Command::Flight(parse_flight(&mut words)?),
        "tag" => Command::Tag(parse_tag(&mut words)?),
        other => return Err(format!("unknown command '{other}' — type 'help'")),
    };
    Ok(Some(cmd))
}

fn parse_op(words: &mut std::str::SplitWhitespace<'_>) -> Result<OpCommand, String> {
    const USAGE: &str = "usage: op add|edit|toggle|done|cancel|rm <index> ...";
    let sub = words.next().ok_or_else(|| USAGE.to_string())?;
    let index = index_arg(words.next())?;
    match sub {
        "add" => Ok(OpCommand::Add {
            index,
            priority: priority_arg(words.next())?,
            text: join(words.by_ref()),
        }),
        "edit" => Ok(OpCommand::Edit {
            index,
            op: op_arg(words.next())?,
            priority: priority_arg(words.next())?,
            text: join(words.by_ref()),
        }),
        "toggle" => Ok(OpCommand::Toggle { index, op: op_arg(words.next())? }),
        "done" => Ok(OpCommand::Done { index, op: op_arg(words.next())? }),
        "cancel" => Ok(OpCommand::Cancel { index, op: op_arg(words.next())? }),
        "rm" => Ok(OpCommand::Remove { index, op: op_arg(words.next())? }),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_flight(words: &mut std::str::SplitWhitespace<'_>) -> Result<FlightCommand, String> {
    const USAGE: &str = "usage: flight add|status|rm ...";
    match words.next().ok_or_else(|| USAGE.to_string())? {
        "add" => {
            let prefix = words
                .next()
                .ok_or_else(|| "usage: flight add <prefix> <etd> <eta> [info]".to_string())?
                .to_string();
            Ok(FlightCommand::Add {
                prefix,
                etd: words.next().unwrap_or_default().to_string(),
                eta: words.next().unwrap_or_default().to_string(),
                info: join(words.by_ref()),
            })
        }
        "status" => Ok(FlightCommand::Status {
            index: index_arg(words.next())?,
            status: words
                .next()
                .ok_or_else(|| "missing flight status".to_string())?
                .parse()?,
        }),
        "rm" => Ok(FlightCommand::Remove { index: index_arg(words.next())? }),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_tag(words: &mut std::str::SplitWhitespace<'_>) -> Result<TagCommand, String> {
    const USAGE: &str = "usage: tag add|toggle|rm ...";
    match words.next().ok_or_else(|| USAGE.to_string())? {
        "add" => {
            let color: TagColor = words
                .next()
                .ok_or_else(|| "usage: tag add <color> <text>".to_string())?
                .parse()?;
            let text = join(words.by_ref());
            if text.is_empty() {
                return Err("usage: tag add <color> <text>".to_string());
            }
            Ok(TagCommand::Add { color, text })
        }
        "toggle" => Ok(TagCommand::Toggle { index: index_arg(words.next())? }),
        "rm" => Ok(TagCommand::Remove { index: index_arg(words.next())? }),
        _ => Err(USAGE.to_string()),
    }
}

fn join<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words.collect::<Vec<_>>().join(" ")
}

fn index_arg(word: Option<&str>) -> Result<usize, String> {
    let word = word.ok_or_else(|| "missing index".to_string())?;
    word.parse().map_err(|_| format!("invalid index '{word}'"))
}

fn priority_arg(word: Option<&str>) -> Result<u8, String> {
    let word = word.ok_or_else(|| "missing priority".to_string())?;
    let priority: u8 = word
        .parse()
        .map_err(|_| format!("invalid priority '{word}'"))?;
    if (1..=10).contains(&priority) {
        Ok(priority)
    } else {
        Err("priority must be 1-10".to_string())
    }
}

fn op_arg(word: Option<&str>) -> Result<String, String> {
    word.map(str::to_string)
        .ok_or_else(|| "missing operation id".to_string())
}

// ── Execution ──

fn execute(
    board: &mut Board,
    store: &Store,
    identity: &str,
    cmd: Command,
    input: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<(), String> {
    let now = Zoned::now();
    match cmd {
        Command::Help => println!("{HELP}"),
        Command::List => print_list(board),
        Command::Quit => {}
        Command::Add { name } => {
            let index = board.add_vessel(name);
            println!("Added vessel #{index}.");
        }
        Command::Remove { index } => {
            let name = board.vessel(index).map_err(|e| e.to_string())?.name.clone();
            if confirm(&format!("Remove vessel '{name}'? This cannot be undone."), input)? {
                board.remove_vessel(index).map_err(|e| e.to_string())?;
                println!("Removed.");
            } else {
                println!("Kept.");
            }
        }
        Command::Set { index, field, value } => {
            apply_set(board, index, &field, &value, &now)?;
            let vessel = board.vessel(index).map_err(|e| e.to_string())?;
            if field == "kind" && !vessel.berth.is_empty() {
                println!("Updated. Berth: {}", vessel.berth);
            } else {
                println!("Updated.");
            }
        }
        Command::DepartureInfo { index, time, destination, eta } => {
            let departure = Departure {
                time: masked_time(&time, &now),
                destination,
                eta: masked_time(&eta, &now),
            };
            board
                .set_departure(index, departure)
                .map_err(|e| e.to_string())?;
            println!("Departure info updated.");
        }
        Command::Berths { index } => {
            let vessel = board.vessel(index).map_err(|e| e.to_string())?;
            match vessel.kind {
                VesselKind::Operating => {
                    let options = board.selectable_berths(index).map_err(|e| e.to_string())?;
                    println!("{}", options.join(", "));
                }
                VesselKind::Standby => println!("{}", STANDBY_BERTHS.join(", ")),
                _ => println!("No berth applies to a {} vessel.", vessel.kind),
            }
        }
        Command::Save { index } => {
            board.save_vessel(index, &now).map_err(|e| e.to_string())?;
            let stamp = board.vessel(index).map_err(|e| e.to_string())?.updated_at.clone();
            println!("Row saved at {stamp}. Use 'persist' to publish the board.");
        }
        Command::Report { index } => {
            let vessel = board.vessel(index).map_err(|e| e.to_string())?;
            print!("{}", report::vessel_report(vessel));
        }
        Command::Persist => match store.save(identity, board.document(), Timestamp::now()) {
            Ok(()) => println!("Board persisted."),
            // Visible and non-fatal: the session keeps its in-memory
            // state and the operator re-triggers the save.
            Err(e) => println!("PERSIST FAILED (changes kept in session): {e}"),
        },
        Command::Op(op) => execute_op(board, op)?,
        Command::Flight(flight) => execute_flight(board, flight),
        Command::Tag(tag) => execute_tag(board, tag),
    }
    Ok(())
}

fn apply_set(
    board: &mut Board,
    index: usize,
    field: &str,
    value: &str,
    now: &Zoned,
) -> Result<(), String> {
    let edit = match field {
        "name" => FieldEdit::Name(value.to_string()),
        "arrival" => FieldEdit::Arrival(masked_time(value, now)),
        "kind" => FieldEdit::Kind(value.parse()?),
        "berth" => FieldEdit::Berth(value.to_string()),
        "orientation" => FieldEdit::Orientation(value.parse()?),
        other => {
            return Err(format!(
                "unknown field '{other}' (name, arrival, kind, berth, orientation)"
            ));
        }
    };
    board.set_field(index, edit, now).map_err(|e| e.to_string())
}

fn execute_op(board: &mut Board, cmd: OpCommand) -> Result<(), String> {
    match cmd {
        OpCommand::Add { index, priority, text } => {
            // Empty text is silently ignored by the engine; echo nothing
            // special either way, mirroring the form's behavior.
            board.add_op(index, &text, priority).map_err(|e| e.to_string())?;
        }
        OpCommand::Edit { index, op, priority, text } => {
            let id = resolve_op(board, index, &op)?;
            board.edit_op(index, id, &text, priority).map_err(|e| e.to_string())?;
        }
        OpCommand::Toggle { index, op } => {
            let id = resolve_op(board, index, &op)?;
            board.toggle_active(index, id).map_err(|e| e.to_string())?;
        }
        OpCommand::Done { index, op } => {
            let id = resolve_op(board, index, &op)?;
            board
                .set_op_status(index, id, OpStatus::Completed)
                .map_err(|e| e.to_string())?;
            if let Some(op) = board.find_op(index, id) {
                println!("{} is now [{}]", op.description, op.status);
            }
        }
        OpCommand::Cancel { index, op } => {
            let id = resolve_op(board, index, &op)?;
            board
                .set_op_status(index, id, OpStatus::Canceled)
                .map_err(|e| e.to_string())?;
            if let Some(op) = board.find_op(index, id) {
                println!("{} is now [{}]", op.description, op.status);
            }
        }
        OpCommand::Remove { index, op } => {
            let id = resolve_op(board, index, &op)?;
            board.remove_op(index, id).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

fn execute_flight(board: &mut Board, cmd: FlightCommand) {
    match cmd {
        FlightCommand::Add { prefix, etd, eta, info } => {
            let mut flight = Flight::new(prefix);
            flight.etd = etd;
            flight.eta = eta;
            flight.info = info;
            board.add_flight(flight);
            println!("Flight added.");
        }
        FlightCommand::Status { index, status } => {
            if board.set_flight_status(index, status) {
                println!("Flight status updated.");
            } else {
                println!("no flight at index {index}");
            }
        }
        FlightCommand::Remove { index } => {
            if board.remove_flight(index).is_some() {
                println!("Flight removed.");
            } else {
                println!("no flight at index {index}");
            }
        }
    }
}

fn execute_tag(board: &mut Board, cmd: TagCommand) {
    match cmd {
        TagCommand::Add { color, text } => {
            board.add_tag(StatusTag::new(text, color));
            println!("Tag added.");
        }
        TagCommand::Toggle { index } => {
            if board.toggle_tag(index) {
                println!("Tag toggled.");
            } else {
                println!("no tag at index {index}");
            }
        }
        TagCommand::Remove { index } => {
            if board.remove_tag(index).is_some() {
                println!("Tag removed.");
            } else {
                println!("no tag at index {index}");
            }
        }
    }
}

/// Masks a free-typed time value, with `now` as a shortcut for the
/// current wall-clock stamp.
fn masked_time(value: &str, now: &Zoned) -> String {
    if value.eq_ignore_ascii_case("now") {
        timefmt::stamp_datetime(now)
    } else {
        timefmt::mask_datetime(value)
    }
}

/// Resolves an operation reference (full id or unambiguous prefix)
/// against one vessel's list.
fn resolve_op(board: &Board, index: usize, reference: &str) -> Result<Uuid, String> {
    let vessel = board.vessel(index).map_err(|e| e.to_string())?;
    if let Ok(id) = reference.parse::<Uuid>() {
        return Ok(id);
    }
    let matches: Vec<Uuid> = vessel
        .ops
        .iter()
        .map(|op| op.id)
        .filter(|id| id.to_string().starts_with(reference))
        .collect();
    match matches.len() {
        0 => Err(format!("no operation matching '{reference}'")),
        1 => Ok(matches[0]),
        n => Err(format!("'{reference}' is ambiguous — matches {n} operations")),
    }
}

fn confirm(
    prompt: &str,
    input: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool, String> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().map_err(|e| e.to_string())?;
    match input.next() {
        Some(Ok(line)) => Ok(line.trim().eq_ignore_ascii_case("y")),
        Some(Err(e)) => Err(e.to_string()),
        None => Ok(false),
    }
}

fn print_list(board: &Board) {
    if board.vessels().is_empty() {
        println!("No vessels");
        return;
    }
    for (i, vessel) in board.vessels().iter().enumerate() {
        let marker = if board.is_dirty(i).unwrap_or(false) { "*" } else { " " };
        let mut line = format!("{i} [{marker}] {}  {}", vessel.name, vessel.kind);
        if !vessel.berth.is_empty() {
            line.push_str(&format!(" @ {}", vessel.berth));
        }
        if vessel.kind == VesselKind::Operating
            && let Some(orientation) = vessel.orientation
        {
            line.push_str(&format!(" ({orientation})"));
        }
        if !vessel.updated_at.is_empty() {
            line.push_str(&format!("  [updated {}]", vessel.updated_at));
        }
        println!("{line}");
        for op in &vessel.ops {
            let short = &op.id.to_string()[..8];
            let tag = if vessel.is_in_progress(op) {
                "IN PROGRESS".to_string()
            } else {
                op.status.to_string()
            };
            println!("    {short}  P{} [{tag}] {}", op.priority, op.description);
        }
    }
}

const HELP: &str = "\
Vessels:
  list
  add <name>
  rm <index>
  set <index> name|arrival|kind|berth|orientation <value>
      (arrival takes digits for the DD/MM HH:MM mask, or 'now')
  departure <index> <time> | <destination> | <eta>
  berths <index>
  save <index>           stamp the row's update time, clear its unsaved mark
  report <index>
Operations (referenced by id prefix from 'list'):
  op add <index> <priority 1-10> <text>
  op edit <index> <op> <priority> <text>
  op toggle <index> <op>
  op done <index> <op>
  op cancel <index> <op>
  op rm <index> <op>
Flights and tags:
  flight add <prefix> <etd> <eta> [info]
  flight status <index> on-time|delayed|arrived|canceled
  flight rm <index>
  tag add red|yellow|blue|green <text>
  tag toggle <index>
  tag rm <index>
Session:
  persist                write the whole board to the store
  quit";

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::BoardDocument;

    #[test]
    fn blank_lines_parse_to_nothing() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn add_captures_the_full_name() {
        assert_eq!(
            parse("add SKANDI ADMIRAL").unwrap(),
            Some(Command::Add { name: "SKANDI ADMIRAL".into() })
        );
        assert!(parse("add").is_err());
    }

    #[test]
    fn op_add_takes_index_priority_then_text() {
        assert_eq!(
            parse("op add 0 3 Load drill pipe").unwrap(),
            Some(Command::Op(OpCommand::Add {
                index: 0,
                priority: 3,
                text: "Load drill pipe".into(),
            }))
        );
    }

    #[test]
    fn op_add_allows_empty_text() {
        // The engine treats empty text as a silent no-op; the parser
        // must not reject it first.
        assert_eq!(
            parse("op add 0 3").unwrap(),
            Some(Command::Op(OpCommand::Add {
                index: 0,
                priority: 3,
                text: String::new(),
            }))
        );
    }

    #[test]
    fn priority_is_bounds_checked() {
        assert!(parse("op add 0 11 x").is_err());
        assert!(parse("op add 0 0 x").is_err());
        assert!(parse("op add 0 ten x").is_err());
    }

    #[test]
    fn departure_splits_on_pipes() {
        assert_eq!(
            parse("departure 0 14:30 | MACAE | 08/08 06:00").unwrap(),
            Some(Command::DepartureInfo {
                index: 0,
                time: "14:30".into(),
                destination: "MACAE".into(),
                eta: "08/08 06:00".into(),
            })
        );
    }

    #[test]
    fn departure_tolerates_missing_parts() {
        assert_eq!(
            parse("departure 0 14:30").unwrap(),
            Some(Command::DepartureInfo {
                index: 0,
                time: "14:30".into(),
                destination: String::new(),
                eta: String::new(),
            })
        );
    }

    #[test]
    fn set_keeps_the_remaining_words_as_the_value() {
        assert_eq!(
            parse("set 1 name FAR SENATOR").unwrap(),
            Some(Command::Set {
                index: 1,
                field: "name".into(),
                value: "FAR SENATOR".into(),
            })
        );
    }

    #[test]
    fn unknown_commands_and_bad_indexes_are_reported() {
        assert!(parse("teleport 0").is_err());
        assert!(parse("rm x").is_err());
        assert!(parse("flight status 0 lost").is_err());
    }

    #[test]
    fn resolve_op_accepts_full_id_and_unambiguous_prefix() {
        let mut board = Board::new(BoardDocument::default());
        board.add_vessel("SKANDI");
        board.add_op(0, "Mud transfer", 2).unwrap();
        let id = board.vessels()[0].ops[0].id;

        assert_eq!(resolve_op(&board, 0, &id.to_string()).unwrap(), id);
        assert_eq!(resolve_op(&board, 0, &id.to_string()[..8]).unwrap(), id);
        assert!(resolve_op(&board, 0, "zzzzzzzz").is_err());
    }

    #[test]
    fn masked_time_supports_the_now_shortcut() {
        let noon = jiff::civil::date(2026, 8, 7)
            .at(14, 30, 0, 0)
            .in_tz("UTC")
            .unwrap();
        assert_eq!(masked_time("now", &noon), "07/08 14:30");
        assert_eq!(masked_time("07081430", &noon), "07/08 14:30");
    }
}
