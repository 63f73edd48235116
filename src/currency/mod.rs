//! Currency codes and the amount formatting seam used by billing events.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleConfig {
    /// Resolves separators for a BCP 47 tag, falling back to `en-US` conventions.
    pub fn for_tag(tag: &str) -> Self {
        let (decimal_separator, grouping_separator) = match primary_language(tag).as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" => (',', '.'),
            "fr" | "pl" | "cs" | "sv" | "nb" | "fi" | "ru" | "uk" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.trim().to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

fn primary_language(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Renders a monetary amount for display next to a billing event.
pub trait AmountFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &CurrencyCode) -> String;
}

/// Default formatter: currency symbol, locale separators and ISO minor units.
#[derive(Debug, Clone, Default)]
pub struct LocaleFormatter {
    pub locale: LocaleConfig,
}

impl LocaleFormatter {
    pub fn new(locale: LocaleConfig) -> Self {
        Self { locale }
    }
}

impl AmountFormatter for LocaleFormatter {
    fn format_amount(&self, amount: f64, currency: &CurrencyCode) -> String {
        format_currency_value(amount, currency, &self.locale)
    }
}

static SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("USD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("INR", "₹"),
        ("KRW", "₩"),
        ("BRL", "R$"),
        ("AUD", "A$"),
        ("CAD", "C$"),
        ("NZD", "NZ$"),
    ])
});

pub fn symbol_for(code: &str) -> Option<&'static str> {
    SYMBOLS.get(code).copied()
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut rendered = format!("{sign}{}", group_digits(digits, locale.grouping_separator));
    if let Some(frac) = frac_part {
        rendered.push(locale.decimal_separator);
        rendered.push_str(frac);
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `amount` as `$1,234.50`, or `CHF 1,234.50` when no symbol is known.
pub fn format_currency_value(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let sign = if amount < 0.0 { "-" } else { "" };
    match symbol_for(code.as_str()) {
        Some(symbol) => format!("{sign}{symbol}{body}"),
        None => format!("{sign}{} {body}", code.as_str()),
    }
}
