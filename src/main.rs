mod board;
mod cli;
mod identity;
mod model;
mod panel;
mod report;
mod rotation;
mod storage;
mod timefmt;
mod tv;

use std::process;

use storage::Store;

fn main() {
    let path = Store::default_path().unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let store = match Store::open(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&store) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
