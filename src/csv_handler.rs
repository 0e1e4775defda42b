use log::{debug, trace};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::expense::{Expense, ValidationError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid expense on row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

/// Reads every expense from CSV data. Any row that fails to parse or validate aborts the read.
pub fn read_expenses(reader: impl Read) -> Result<Vec<Expense>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut expenses = Vec::new();
    for (index, result) in csv_reader.deserialize::<Expense>().enumerate() {
        let expense = result?;
        // header is row 1
        expense
            .validate()
            .map_err(|source| Error::InvalidRecord { row: index + 2, source })?;
        trace!("Read expense {:?}", expense);
        expenses.push(expense);
    }
    Ok(expenses)
}

/// Writes the header and every expense as CSV.
pub fn write_expenses(writer: impl Write, expenses: &[Expense]) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    // Written explicitly so an empty file still carries the header
    csv_writer.write_record(["Date", "Amount", "Category", "Description"])?;
    for expense in expenses {
        csv_writer.serialize(expense)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Loads the expense file, or an empty list when it does not exist yet.
pub fn load_expenses(path: &Path) -> Result<Vec<Expense>, Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found, starting with no expenses", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let expenses = read_expenses(file)?;
    debug!("Loaded {} expenses from {}", expenses.len(), path.display());
    Ok(expenses)
}

/// Replaces the contents of the expense file with `expenses`, creating it if needed.
pub fn save_expenses(path: &Path, expenses: &[Expense]) -> Result<(), Error> {
    let file = File::create(path)?;
    write_expenses(file, expenses)?;
    debug!("Saved {} expenses to {}", expenses.len(), path.display());
    Ok(())
}
