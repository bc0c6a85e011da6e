// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the functions to load a catalog of actions from a
//! delimited text (csv) file.
//!
//! The first non blank line of the file is a header telling where each column
//! is located. The recognized column names (case insensitive) are:
//! * `name` or `action` for the name of the action,
//! * `cost` or `price` for the cost of one unit,
//! * `benefit` or `benefits` for the absolute profit of one unit, or else
//!   `profit`, `profitability` or `percentage` for the profit expressed as a
//!   percentage of the cost (a trailing `%` is accepted).
//!
//! Fields may be enclosed in double quotes, in which case they may contain the
//! delimiter (and `""` stands for a single quote). A quoted field cannot span
//! several lines though: every line of the file is one record.
//!
//! Records which cannot be turned into a valid action are not fatal: they are
//! reported and skipped. This includes the records which are not valid UTF-8.

use std::{fs::File, io::{BufRead, BufReader}, path::Path};

use tracing::{info, warn};

use crate::{Action, ActionCatalog, DedupPolicy, ValidationError};

/// This enumeration simply groups the kind of errors that prevent a catalog
/// from being loaded at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The header does not tell where to find some mandatory column
    #[error("missing {0} column")]
    MissingColumn(&'static str),
    /// There is nothing in the file
    #[error("empty input")]
    EmptyInput,
}

/// The reasons why a single record was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// The record has fewer fields than what the header requires
    #[error("expected at least {expected} fields but got {got}")]
    MissingFields { expected: usize, got: usize },
    /// The parser expected a number but got something else
    #[error("'{value}' is not a valid {column}")]
    NotANumber { column: &'static str, value: String },
    /// The values do not make up a valid action
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The bytes of the record are not valid UTF-8 text
    #[error("the record is not valid UTF-8")]
    NotUtf8,
}

/// A record of the file which was discarded while loading it
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// The (1-based) line number of the record
    pub line: usize,
    pub error: RecordError,
}

/// Tells how a file is to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// The policy used to discard duplicate actions
    pub policy: DedupPolicy,
    /// The character separating the fields of a record
    pub delimiter: char,
}
impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { policy: DedupPolicy::default(), delimiter: ',' }
    }
}

/// The outcome of a successful load
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// The valid and distinct actions of the file
    pub catalog: ActionCatalog,
    /// The records that could not be turned into an action
    pub rejected: Vec<Rejection>,
    /// The number of valid records that duplicated an action of the catalog
    pub duplicates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BenefitColumn {
    Absolute(usize),
    Percentage(usize),
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    name   : usize,
    cost   : usize,
    benefit: BenefitColumn,
}
impl Header {
    fn parse(line: &str, delimiter: char) -> Result<Self, LoadError> {
        let mut name    = None;
        let mut cost    = None;
        let mut benefit = None;
        let mut percent = None;
        let line = line.trim_start_matches('\u{feff}');
        for (i, column) in split_fields(line, delimiter).iter().enumerate() {
            match column.to_lowercase().as_str() {
                "name"    | "action"   => { name.get_or_insert(i); },
                "cost"    | "price"    => { cost.get_or_insert(i); },
                "benefit" | "benefits" => { benefit.get_or_insert(i); },
                "profit"  | "profitability" | "percentage" => { percent.get_or_insert(i); },
                _ => {}
            }
        }
        let benefit = match (benefit, percent) {
            (Some(i), _)    => BenefitColumn::Absolute(i),
            (None, Some(i)) => BenefitColumn::Percentage(i),
            (None, None)    => return Err(LoadError::MissingColumn("benefit")),
        };
        Ok(Header {
            name: name.ok_or(LoadError::MissingColumn("name"))?,
            cost: cost.ok_or(LoadError::MissingColumn("cost"))?,
            benefit,
        })
    }
    fn width(&self) -> usize {
        let benefit = match self.benefit {
            BenefitColumn::Absolute(i) | BenefitColumn::Percentage(i) => i,
        };
        1 + self.name.max(self.cost).max(benefit)
    }
    fn parse_record(&self, line: &str, delimiter: char) -> Result<Action, RecordError> {
        let fields = split_fields(line, delimiter);
        if fields.len() < self.width() {
            return Err(RecordError::MissingFields { expected: self.width(), got: fields.len() });
        }
        let name = fields[self.name].as_str();
        let cost = number(&fields[self.cost], "cost")?;
        let action = match self.benefit {
            BenefitColumn::Absolute(i)   => Action::new(name, cost, number(&fields[i], "benefit")?)?,
            BenefitColumn::Percentage(i) => {
                let percent = fields[i].strip_suffix('%').unwrap_or(fields[i].as_str()).trim_end();
                Action::from_profitability(name, cost, number(percent, "profitability")?)?
            }
        };
        Ok(action)
    }
}

/// Splits a record in its (trimmed) fields. Double quotes protect the
/// delimiters they enclose; an unterminated quote runs to the end of the line.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = vec![];
    let mut field  = String::new();
    let mut quoted = false;
    let mut chars  = line.chars().peekable();
    while let Some(c) = chars.next() {
        if quoted {
            if c != '"' {
                field.push(c);
            } else if chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                quoted = false;
            }
        } else if c == '"' && field.trim().is_empty() {
            field.clear();
            quoted = true;
        } else if c == delimiter {
            fields.push(field.trim().to_string());
            field.clear();
        } else {
            field.push(c);
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Drops the carriage return of a CRLF line ending
fn strip_cr(record: &[u8]) -> &[u8] {
    record.strip_suffix(b"\r").unwrap_or(record)
}

fn number(text: &str, column: &'static str) -> Result<f64, RecordError> {
    text.parse::<f64>()
        .map_err(|_| RecordError::NotANumber { column, value: text.to_string() })
}

/// This function is used to read a catalog from file. It returns either a
/// report of the load if everything went on well or an error describing the
/// problem.
pub fn read_catalog<P: AsRef<Path>>(fname: P, options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let f = File::open(fname)?;
    let f = BufReader::new(f);
    parse_catalog(f, options)
}

/// Reads a catalog from any buffered source. The source is read as bytes so
/// that a record which is not valid text only gets that record rejected.
pub fn parse_catalog<R: BufRead>(reader: R, options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let mut records = reader.split(b'\n').enumerate();
    let mut header  = None;
    for (_, record) in &mut records {
        let record = record?;
        let line   = String::from_utf8_lossy(strip_cr(&record));
        if !line.trim().is_empty() {
            header = Some(Header::parse(&line, options.delimiter)?);
            break;
        }
    }
    let header = header.ok_or(LoadError::EmptyInput)?;

    let mut catalog    = ActionCatalog::new(options.policy);
    let mut rejected   = vec![];
    let mut duplicates = 0;
    for (i, record) in records {
        let record  = record?;
        let outcome = match std::str::from_utf8(strip_cr(&record)) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => header.parse_record(line, options.delimiter),
            Err(_)   => Err(RecordError::NotUtf8),
        };
        match outcome {
            Ok(action) => {
                if !catalog.insert(action) {
                    duplicates += 1;
                }
            },
            Err(error) => {
                warn!(line = i + 1, %error, "rejected record");
                rejected.push(Rejection { line: i + 1, error });
            }
        }
    }

    info!(actions = catalog.len(), rejected = rejected.len(), duplicates, "catalog loaded");
    Ok(LoadReport { catalog, rejected, duplicates })
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
