//! Invoice numbers: `PREFIX/YYYY-YY/NNN`, one sequence per fiscal year.
//!
//! The fiscal year runs April to March. Sequences start at 001 and are
//! zero-padded to at least three digits; the thousandth invoice prints as 1000.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    #[error("invalid fiscal year label '{0}' (expected YYYY-YY)")]
    FiscalYear(String),
    #[error("invalid invoice number '{0}' (expected PREFIX/YYYY-YY/NNN)")]
    InvoiceNumber(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Fiscal year
// ────────────────────────────────────────────────────────────────────────────

/// An April–March fiscal year, identified by the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FiscalYear {
    start_year: i32,
}

impl FiscalYear {
    pub fn starting(start_year: i32) -> Self {
        FiscalYear { start_year }
    }

    /// The fiscal year `date` falls in: 2026-02-10 → 2025-26, 2026-04-01 → 2026-27.
    pub fn containing(date: NaiveDate) -> Self {
        let start_year = if date.month() >= 4 {
            date.year()
        } else {
            date.year() - 1
        };
        FiscalYear { start_year }
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}",
            self.start_year,
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl FromStr for FiscalYear {
    type Err = NumberingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || NumberingError::FiscalYear(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(err)?;
        if start.len() != 4 || end.len() != 2 {
            return Err(err());
        }
        let start_year: i32 = start.parse().map_err(|_| err())?;
        let end_suffix: i32 = end.parse().map_err(|_| err())?;
        if (start_year + 1).rem_euclid(100) != end_suffix {
            return Err(err());
        }
        Ok(FiscalYear { start_year })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Invoice number
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvoiceNumber {
    prefix: String,
    fiscal_year: FiscalYear,
    sequence: u32,
}

impl InvoiceNumber {
    pub fn new(prefix: &str, fiscal_year: FiscalYear, sequence: u32) -> Self {
        InvoiceNumber {
            prefix: prefix.to_string(),
            fiscal_year,
            sequence,
        }
    }

    pub fn first(prefix: &str, fiscal_year: FiscalYear) -> Self {
        Self::new(prefix, fiscal_year, 1)
    }

    /// The number following `last_sequence` in the series, or 001 for an empty series.
    pub fn next_after(prefix: &str, fiscal_year: FiscalYear, last_sequence: Option<u32>) -> Self {
        match last_sequence {
            Some(last) => Self::new(prefix, fiscal_year, last.saturating_add(1)),
            None => Self::first(prefix, fiscal_year),
        }
    }

    /// The shared leading text of every number in a series, e.g. `PTPL/2025-26/`.
    pub fn series_prefix(prefix: &str, fiscal_year: FiscalYear) -> String {
        format!("{prefix}/{fiscal_year}/")
    }

    /// Sequence of `invoice_no` if it belongs to the series started by `series_prefix`.
    pub fn sequence_in_series(invoice_no: &str, series_prefix: &str) -> Option<u32> {
        let digits = invoice_no.strip_prefix(series_prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn fiscal_year(&self) -> FiscalYear {
        self.fiscal_year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{:03}",
            self.prefix, self.fiscal_year, self.sequence
        )
    }
}

impl FromStr for InvoiceNumber {
    type Err = NumberingError;

    /// Splits from the right so prefixes may themselves contain `/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || NumberingError::InvoiceNumber(s.to_string());
        let mut parts = s.rsplitn(3, '/');
        let (Some(seq), Some(fy), Some(prefix)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(err());
        };
        if prefix.is_empty() || seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        Ok(InvoiceNumber {
            prefix: prefix.to_string(),
            fiscal_year: fy.parse().map_err(|_| err())?,
            sequence: seq.parse().map_err(|_| err())?,
        })
    }
}
