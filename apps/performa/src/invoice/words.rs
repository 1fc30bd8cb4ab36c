//! Amounts in words using the Indian numbering system (lakh, crore).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// `rounded` spelled out for the invoice footer, e.g.
/// "One Thousand One Hundred And Eighty Rupees Only."
///
/// Whole amounts give rupees only; a fractional part adds "And N Paise".
/// Returns `None` for negative amounts or values too large to spell.
pub fn amount_in_words(rounded: Decimal) -> Option<String> {
    if rounded.is_sign_negative() && !rounded.is_zero() {
        return None;
    }
    let rupees = rounded.trunc().to_u64()?;
    let paise = (rounded.fract() * Decimal::ONE_HUNDRED).round().to_u64()?;

    let mut text = format!("{} Rupees", number_in_words(rupees));
    if paise > 0 {
        text.push_str(&format!(" And {} Paise", number_in_words(paise)));
    }
    text.push_str(" Only.");
    Some(text)
}

/// Cardinal words for `n`, Indian grouping: crore, lakh, thousand, hundred.
pub fn number_in_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;

    if rest >= CRORE {
        parts.push(format!("{} Crore", number_in_words(rest / CRORE)));
        rest %= CRORE;
    }
    if rest >= LAKH {
        parts.push(format!("{} Lakh", below_hundred(rest / LAKH)));
        rest %= LAKH;
    }
    if rest >= THOUSAND {
        parts.push(format!("{} Thousand", below_hundred(rest / THOUSAND)));
        rest %= THOUSAND;
    }
    if rest >= 100 {
        parts.push(format!("{} Hundred", ONES[(rest / 100) as usize]));
        rest %= 100;
    }
    if rest > 0 {
        if !parts.is_empty() {
            parts.push("And".to_string());
        }
        parts.push(below_hundred(rest));
    }
    parts.join(" ")
}

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        unit => format!("{tens} {}", ONES[unit as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_small_numbers() {
        assert_eq!(number_in_words(0), "Zero");
        assert_eq!(number_in_words(7), "Seven");
        assert_eq!(number_in_words(19), "Nineteen");
        assert_eq!(number_in_words(40), "Forty");
        assert_eq!(number_in_words(99), "Ninety Nine");
    }

    #[test]
    fn test_hundreds_use_and() {
        assert_eq!(number_in_words(100), "One Hundred");
        assert_eq!(number_in_words(105), "One Hundred And Five");
        assert_eq!(number_in_words(1180), "One Thousand One Hundred And Eighty");
        assert_eq!(number_in_words(2000), "Two Thousand");
        assert_eq!(number_in_words(1005), "One Thousand And Five");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(
            number_in_words(123_456),
            "One Lakh Twenty Three Thousand Four Hundred And Fifty Six"
        );
        assert_eq!(number_in_words(17_700), "Seventeen Thousand Seven Hundred");
        assert_eq!(number_in_words(2_500_000), "Twenty Five Lakh");
        assert_eq!(
            number_in_words(12_34_56_789),
            "Twelve Crore Thirty Four Lakh Fifty Six Thousand Seven Hundred And Eighty Nine"
        );
    }

    #[test]
    fn test_crore_of_crore() {
        assert_eq!(number_in_words(1_000 * CRORE), "One Thousand Crore");
    }

    #[test]
    fn test_amount_whole_rupees() {
        assert_eq!(
            amount_in_words(dec!(1180)).unwrap(),
            "One Thousand One Hundred And Eighty Rupees Only."
        );
        assert_eq!(
            amount_in_words(dec!(17700)).unwrap(),
            "Seventeen Thousand Seven Hundred Rupees Only."
        );
    }

    #[test]
    fn test_amount_zero() {
        assert_eq!(amount_in_words(dec!(0)).unwrap(), "Zero Rupees Only.");
    }

    #[test]
    fn test_amount_with_paise() {
        assert_eq!(
            amount_in_words(dec!(1180.50)).unwrap(),
            "One Thousand One Hundred And Eighty Rupees And Fifty Paise Only."
        );
        assert_eq!(
            amount_in_words(dec!(10.05)).unwrap(),
            "Ten Rupees And Five Paise Only."
        );
    }

    #[test]
    fn test_negative_amount_has_no_words() {
        assert!(amount_in_words(dec!(-1)).is_none());
    }
}
