use log::{debug, error};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::expense::Expense;
use crate::menu::Tracker;

mod csv_handler;
mod expense;
mod menu;
mod report;

/// Expense file, relative to the working directory.
const DATA_FILE: &str = "expenses.csv";

fn main() {
    env_logger::init();
    let path = PathBuf::from(DATA_FILE);

    let existed = path.exists();
    let expenses = match csv_handler::load_expenses(&path) {
        Ok(expenses) => expenses,
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            eprintln!("Error loading expenses from {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    match run_session(path, expenses, existed) {
        Ok(count) => debug!("Session ended with {} expenses", count),
        Err(e) => {
            error!("Terminal I/O failed: {}", e);
            eprintln!("Error reading input or writing output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Prints the load banner and runs the menu on stdin/stdout. Returns the final number of expenses.
fn run_session(path: PathBuf, expenses: Vec<Expense>, existed: bool) -> io::Result<usize> {
    let mut stdout = io::stdout().lock();
    if existed {
        writeln!(stdout, "Loaded {} expenses from file.", expenses.len())?;
    } else {
        writeln!(stdout, "No existing expense file found. Starting fresh.")?;
    }

    let mut tracker = Tracker::new(path, expenses, io::stdin().lock(), stdout);
    tracker.run()?;
    Ok(tracker.expenses().len())
}
