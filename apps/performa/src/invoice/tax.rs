//! GST arithmetic for line items and invoice totals.
//!
//! Amounts are derived at render time and never stored:
//! `taxable = qty × rate`, `tax = taxable × rate% / 100`.

use std::str::FromStr;

use anyhow::anyhow;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::invoice::LineItem;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// An item or total exceeds what `Decimal` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invoice amounts are too large to compute")]
pub struct AmountOverflow;

/// Derived amounts for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineAmounts {
    pub taxable: Decimal,
    pub cgst_amt: Decimal,
    pub sgst_amt: Decimal,
    pub igst_amt: Decimal,
}

impl LineAmounts {
    pub fn of(item: &LineItem) -> Result<Self, AmountOverflow> {
        let taxable = item.qty.checked_mul(item.rate).ok_or(AmountOverflow)?;
        let tax = |percent: Decimal| {
            taxable
                .checked_mul(percent)
                .and_then(|v| v.checked_div(HUNDRED))
                .ok_or(AmountOverflow)
        };
        Ok(LineAmounts {
            taxable,
            cgst_amt: tax(item.cgst)?,
            sgst_amt: tax(item.sgst)?,
            igst_amt: tax(item.igst)?,
        })
    }
}

/// Column totals over all items of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvoiceTotals {
    pub taxable: Decimal,
    pub cgst_amt: Decimal,
    pub sgst_amt: Decimal,
    pub igst_amt: Decimal,
    /// Taxable value plus every tax component, unrounded.
    pub grand_total: Decimal,
}

impl InvoiceTotals {
    pub fn new(
        taxable: Decimal,
        cgst_amt: Decimal,
        sgst_amt: Decimal,
        igst_amt: Decimal,
    ) -> Result<Self, AmountOverflow> {
        let grand_total = [cgst_amt, sgst_amt, igst_amt]
            .into_iter()
            .try_fold(taxable, |acc, v| acc.checked_add(v))
            .ok_or(AmountOverflow)?;
        Ok(InvoiceTotals {
            taxable,
            cgst_amt,
            sgst_amt,
            igst_amt,
            grand_total,
        })
    }

    /// Fails if any line, column sum or the grand total overflows.
    pub fn from_items(items: &[LineItem]) -> Result<Self, AmountOverflow> {
        let mut sums = [Decimal::ZERO; 4];
        for item in items {
            let line = LineAmounts::of(item)?;
            let values = [line.taxable, line.cgst_amt, line.sgst_amt, line.igst_amt];
            for (sum, value) in sums.iter_mut().zip(values) {
                *sum = sum.checked_add(value).ok_or(AmountOverflow)?;
            }
        }
        let [taxable, cgst_amt, sgst_amt, igst_amt] = sums;
        Self::new(taxable, cgst_amt, sgst_amt, igst_amt)
    }
}

/// How the grand total is rounded for the payable figure and the amount in words.
/// The printed "Total Amount After Tax" and the words always use the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountRounding {
    /// Whole rupees, half-up: a fraction of .50 or more rounds up.
    #[default]
    WholeRupees,
    /// Nearest paisa, half-up; paise are spelled out separately.
    RupeesAndPaise,
}

impl AmountRounding {
    pub fn apply(self, total: Decimal) -> Decimal {
        let dp = match self {
            AmountRounding::WholeRupees => 0,
            AmountRounding::RupeesAndPaise => 2,
        };
        total.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl FromStr for AmountRounding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" | "rupees" => Ok(AmountRounding::WholeRupees),
            "paise" => Ok(AmountRounding::RupeesAndPaise),
            other => Err(anyhow!(
                "AMOUNT_ROUNDING must be 'whole' or 'paise', got '{other}'"
            )),
        }
    }
}

/// Two-decimal money text, half-up: 1350 → "1350.00".
pub fn format_money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
