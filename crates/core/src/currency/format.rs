//! Locale-aware money formatting.
//!
//! Prices are always shown with exactly two decimals. Rounding to two places
//! happens here (half away from zero, as shoppers expect); the converted
//! amount itself keeps four places.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use storefront_shared::{AppError, Money};

/// Decimal places shown on every price.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// How integer digits are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Groups of three: 1,234,567.
    Thousands,
    /// Last three digits, then groups of two: 12,34,567.
    Indian,
}

/// Where the currency symbol goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1.00`, or `CHF 1.00` for codes without a symbol.
    Prefix,
    /// `1,00 €`.
    Suffix,
}

/// Number formatting rules for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    tag: &'static str,
    group_separator: &'static str,
    decimal_separator: char,
    grouping: Grouping,
    symbol_position: SymbolPosition,
}

impl NumberLocale {
    /// `en-US`: `$1,234.56`.
    pub const EN_US: Self = Self {
        tag: "en-US",
        group_separator: ",",
        decimal_separator: '.',
        grouping: Grouping::Thousands,
        symbol_position: SymbolPosition::Prefix,
    };

    /// `en-IN`: `₹12,34,567.89`.
    pub const EN_IN: Self = Self {
        tag: "en-IN",
        group_separator: ",",
        decimal_separator: '.',
        grouping: Grouping::Indian,
        symbol_position: SymbolPosition::Prefix,
    };

    /// `de-DE`: `1.234,56 €`.
    pub const DE_DE: Self = Self {
        tag: "de-DE",
        group_separator: ".",
        decimal_separator: ',',
        grouping: Grouping::Thousands,
        symbol_position: SymbolPosition::Suffix,
    };

    /// `fr-FR`: `1 234,56 €` with a narrow no-break space.
    pub const FR_FR: Self = Self {
        tag: "fr-FR",
        group_separator: "\u{202f}",
        decimal_separator: ',',
        grouping: Grouping::Thousands,
        symbol_position: SymbolPosition::Suffix,
    };

    const ALL: [Self; 4] = [Self::EN_US, Self::EN_IN, Self::DE_DE, Self::FR_FR];

    /// Locale tag, e.g. `en-IN`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Groups the digits of a non-negative integer string.
    fn group(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 2);

        for (i, ch) in digits.chars().enumerate() {
            let remaining = len - i;
            if i > 0 && self.starts_group(remaining) {
                out.push_str(self.group_separator);
            }
            out.push(ch);
        }
        out
    }

    /// True if a separator goes before a digit with `remaining` digits
    /// left (itself included).
    fn starts_group(&self, remaining: usize) -> bool {
        match self.grouping {
            Grouping::Thousands => remaining % 3 == 0,
            Grouping::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::EN_US
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}

impl FromStr for NumberLocale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag.eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| AppError::Validation(format!("Unsupported locale: {s}")))
    }
}

/// Formats an amount with grouping, two decimals, and currency symbol.
///
/// ```
/// use rust_decimal_macros::dec;
/// use storefront_core::currency::{format_money, NumberLocale};
/// use storefront_shared::{CurrencyCode, Money};
///
/// let money = Money::new(dec!(8310), CurrencyCode::INR);
/// assert_eq!(format_money(&money, &NumberLocale::EN_US), "₹8,310.00");
/// ```
#[must_use]
pub fn format_money(money: &Money, locale: &NumberLocale) -> String {
    let (negative, number) = format_unsigned(money.amount, locale);
    let sign = if negative { "-" } else { "" };

    match (locale.symbol_position, money.currency.info()) {
        (SymbolPosition::Prefix, Some(info)) => format!("{sign}{}{number}", info.symbol),
        (SymbolPosition::Prefix, None) => format!("{sign}{} {number}", money.currency),
        (SymbolPosition::Suffix, Some(info)) => format!("{sign}{number} {}", info.symbol),
        (SymbolPosition::Suffix, None) => format!("{sign}{number} {}", money.currency),
    }
}

/// Rounds for display and renders the magnitude; returns whether the
/// rounded value is below zero.
fn format_unsigned(amount: Decimal, locale: &NumberLocale) -> (bool, String) {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(DISPLAY_DECIMAL_PLACES);

    let plain = rounded.to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    // rescale stops short of two places near Decimal::MAX
    let number = format!(
        "{}{}{frac_part:0<2}",
        locale.group(int_part),
        locale.decimal_separator,
    );
    (negative, number)
}
