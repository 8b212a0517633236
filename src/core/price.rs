//! Price formatting for display

use super::currency::ExchangeRate;
use super::product::Cents;
use fixed_decimal::FixedDecimal;
use icu::decimal::{FixedDecimalFormatter, options::FixedDecimalFormatterOptions};
use icu::locid::locale;
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;
use writeable::Writeable;

/// Number and currency conventions used when rendering a price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    EnUs,
    DeDe,
    FrFr,
}

impl Locale {
    /// Currency shown when no code has been selected.
    pub fn default_currency(&self) -> &'static str {
        match self {
            Locale::EnUs => "USD",
            Locale::DeDe | Locale::FrFr => "EUR",
        }
    }

    fn to_icu_locale(self) -> icu::locid::Locale {
        match self {
            Locale::EnUs => locale!("en-US"),
            Locale::DeDe => locale!("de-DE"),
            Locale::FrFr => locale!("fr-FR"),
        }
    }

    /// Renders a non-negative amount with the locale's grouping and decimal
    /// separators, keeping every fraction digit of `amount`.
    fn format_number(self, amount: Decimal) -> Option<String> {
        let formatter = FixedDecimalFormatter::try_new(
            &self.to_icu_locale().into(),
            FixedDecimalFormatterOptions::default(),
        )
        .ok()?;
        let fixed = FixedDecimal::from_str(&amount.to_string()).ok()?;
        Some(formatter.format(&fixed).write_to_string().into_owned())
    }

    fn place_symbol(&self, code: &str, negative: bool, number: &str) -> String {
        let sign = if negative { "-" } else { "" };
        match (self, currency_symbol(code)) {
            (Locale::EnUs, Some(symbol)) => format!("{sign}{symbol}{number}"),
            (Locale::EnUs, None) => format!("{sign}{code}\u{a0}{number}"),
            (_, symbol) => format!("{sign}{number}\u{a0}{}", symbol.unwrap_or(code)),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Locale::EnUs => "en-US",
                Locale::DeDe => "de-DE",
                Locale::FrFr => "fr-FR",
            }
        )
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").to_lowercase().as_str() {
            "en" | "en-us" => Ok(Locale::EnUs),
            "de" | "de-de" => Ok(Locale::DeDe),
            "fr" | "fr-fr" => Ok(Locale::FrFr),
            _ => Err(anyhow::anyhow!("Unsupported locale: {}", s)),
        }
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "VND" => "₫",
        "PHP" => "₱",
        "CNY" => "CN¥",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "MXN" => "MX$",
        "TWD" => "NT$",
        "BRL" => "R$",
        _ => return None,
    };
    Some(symbol)
}

/// Digits after the decimal point in the currency's minor unit.
fn minor_unit_digits(code: &str) -> u32 {
    match code {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

fn normalize_code(code: &str) -> Option<String> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// Formats prices given in minor units for display in a selected currency.
#[derive(Debug, Clone)]
pub struct PriceFormatter {
    currency_code: Option<String>,
    exchange_rate: f64,
    locale: Locale,
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl PriceFormatter {
    pub fn new(locale: Locale) -> Self {
        Self {
            currency_code: None,
            exchange_rate: 1.0,
            locale,
        }
    }

    pub fn currency_code(&self) -> Option<&str> {
        self.currency_code.as_deref()
    }

    /// Selects the currency used for display. `None` falls back to the
    /// locale's currency.
    pub fn set_currency_code(&mut self, code: Option<&str>) {
        self.currency_code = code.map(str::to_string);
    }

    pub fn exchange_rate(&self) -> f64 {
        self.exchange_rate
    }

    /// Multiplier applied to every price before display.
    pub fn set_exchange_rate(&mut self, rate: f64) {
        self.exchange_rate = rate;
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Switches display to the currency and rate of `rate`.
    pub fn apply(&mut self, rate: &ExchangeRate) {
        self.currency_code = Some(rate.currency_code.clone());
        self.exchange_rate = rate.rate;
    }

    /// Returns a user-friendly price for display, or `None` if the selected
    /// currency code is invalid or the converted amount cannot be rendered.
    pub fn formatted_price(&self, cents: Cents) -> Option<String> {
        let code = match &self.currency_code {
            Some(code) => normalize_code(code)?,
            None => self.locale.default_currency().to_string(),
        };

        let adjusted = cents as f64 * self.exchange_rate;
        let amount = adjusted / 100.0;
        if !amount.is_finite() {
            return None;
        }

        // Sub-cent amounts keep six digits so tiny rates don't show as zero.
        let max_digits = if amount < 0.01 { 6 } else { 2 };
        let min_digits = minor_unit_digits(&code).min(max_digits);

        let rounded = Decimal::from_f64(amount)?
            .round_dp_with_strategy(max_digits, RoundingStrategy::MidpointNearestEven)
            .normalize();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let mut rounded = rounded.abs();
        if rounded.scale() < min_digits {
            rounded.rescale(min_digits);
        }

        let number = self.locale.format_number(rounded)?;
        Some(self.locale.place_symbol(&code, negative, &number))
    }
}
