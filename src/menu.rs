use chrono::{Local, NaiveDate};
use log::{debug, trace, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::csv_handler;
use crate::expense::{self, Expense, ValidationError};
use crate::report;

const MENU: &str = "\n===== Expense Tracker Menu =====
1. Add a new expense
2. View expense totals by category
3. Show expense statistics
4. Exit program
================================
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    View,
    Stats,
    Exit,
}

impl TryFrom<&str> for MenuChoice {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "1" | "add" => Ok(MenuChoice::Add),
            "2" | "view" => Ok(MenuChoice::View),
            "3" | "stats" => Ok(MenuChoice::Stats),
            "4" | "exit" => Ok(MenuChoice::Exit),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MainMenu,
    AddExpense,
    ViewTotals,
    ViewStats,
    Exiting,
}

/// An interactive session over the expense list. Owns the records for the lifetime of the run
/// and writes them back to `path` after every add and on exit.
pub struct Tracker<R, W> {
    path: PathBuf,
    expenses: Vec<Expense>,
    input: R,
    output: W,
    fixed_today: Option<NaiveDate>,
    input_closed: bool,
}

impl<R: BufRead, W: Write> Tracker<R, W> {
    pub fn new(path: PathBuf, expenses: Vec<Expense>, input: R, output: W) -> Self {
        Tracker {
            path,
            expenses,
            input,
            output,
            fixed_today: None,
            input_closed: false,
        }
    }

    /// Pins the date used for the `today` keyword instead of reading the clock.
    #[cfg(test)]
    fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Runs the menu until the user exits or input ends. Only stdin/stdout failures are returned.
    /// A failed save on exit goes back to the menu so the user can retry, unless input has ended.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = State::MainMenu;
        loop {
            trace!("Menu state: {:?}", state);
            state = match state {
                State::MainMenu => self.main_menu()?,
                State::AddExpense => self.add_expense()?,
                State::ViewTotals => {
                    write!(self.output, "{}", report::render_totals(&self.expenses))?;
                    State::MainMenu
                }
                State::ViewStats => {
                    write!(self.output, "{}", report::render_statistics(&self.expenses))?;
                    State::MainMenu
                }
                State::Exiting => {
                    if self.save()? || self.input_closed {
                        writeln!(self.output, "Exiting program. Goodbye!")?;
                        return Ok(());
                    }
                    writeln!(self.output, "Expenses are still in memory. Fix the problem and exit again to retry.")?;
                    State::MainMenu
                }
            };
        }
    }

    fn main_menu(&mut self) -> io::Result<State> {
        write!(self.output, "{}", MENU)?;
        let Some(line) = self.prompt("Enter your choice: ")? else {
            return Ok(State::Exiting);
        };

        let next = match MenuChoice::try_from(line.as_str()) {
            Ok(MenuChoice::Add) => State::AddExpense,
            Ok(MenuChoice::View) => State::ViewTotals,
            Ok(MenuChoice::Stats) => State::ViewStats,
            Ok(MenuChoice::Exit) => State::Exiting,
            Err(choice) => {
                debug!("Rejected menu choice {:?}", choice);
                writeln!(self.output, "Invalid choice. Please try again.")?;
                State::MainMenu
            }
        };
        Ok(next)
    }

    fn add_expense(&mut self) -> io::Result<State> {
        writeln!(self.output, "\n----- Add New Expense -----")?;

        let today = self.today();
        let Some(date) = self.prompt_until("Enter date (MM/DD/YYYY) or 'today' for today's date: ", |s| {
            expense::parse_date(s, today)
        })?
        else {
            return Ok(State::Exiting);
        };
        let Some(amount) = self.prompt_until("Enter amount: $", expense::parse_amount)? else {
            return Ok(State::Exiting);
        };
        let Some(category) = self.prompt_until("Enter category: ", |s| expense::parse_text(s, "Category"))? else {
            return Ok(State::Exiting);
        };
        let Some(description) =
            self.prompt_until("Enter description: ", |s| expense::parse_text(s, "Description"))?
        else {
            return Ok(State::Exiting);
        };

        writeln!(
            self.output,
            "Expense of ${:.2} for {} added successfully!",
            amount, category
        )?;
        self.expenses.push(Expense {
            date,
            amount,
            category,
            description,
        });
        self.save()?;
        Ok(State::MainMenu)
    }

    /// Writes the records to disk. A failure is reported to the user and the records stay in memory.
    fn save(&mut self) -> io::Result<bool> {
        match csv_handler::save_expenses(&self.path, &self.expenses) {
            Ok(()) => {
                writeln!(self.output, "Expenses saved to {}", self.path.display())?;
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to save {} expenses to {}: {}", self.expenses.len(), self.path.display(), e);
                writeln!(self.output, "Error saving expenses: {}", e)?;
                Ok(false)
            }
        }
    }

    /// Re-prompts until `parse` accepts the line. `None` once input is exhausted.
    fn prompt_until<T>(
        &mut self,
        text: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(text)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    debug!("Rejected input {:?}: {}", line, e);
                    writeln!(self.output, "{}", e)?;
                }
            }
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        // bytes that are not UTF-8 become U+FFFD and fail validation like any other bad input
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            self.input_closed = true;
            writeln!(self.output)?;
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&line);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
    }
}
