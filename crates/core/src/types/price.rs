//! Money amounts using decimal arithmetic.
//!
//! The shop trades in Malagasy Ariary. The API transports amounts as floats;
//! they are converted once into [`Amount`] and summed as decimals from then on.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Currency suffix used when displaying amounts.
pub const CURRENCY_SUFFIX: &str = "Ar";

/// A money amount in Ariary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero Ariary.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Convert a float received from the API.
    ///
    /// Returns `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).map(Self)
    }

    /// The float sent back to the API.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Plain number for form inputs: at most two decimals, `.` separator, no grouping.
    #[must_use]
    pub fn input_value(self) -> String {
        self.0.round_dp(2).normalize().to_string()
    }

    /// Display form: space-grouped thousands, comma decimals, currency suffix.
    ///
    /// ```
    /// use minishop_core::Amount;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Amount::new(Decimal::new(1250000, 2)).display(), "12 500 Ar");
    /// assert_eq!(Amount::new(Decimal::new(12345, 1)).display(), "1 234,5 Ar");
    /// ```
    #[must_use]
    pub fn display(self) -> String {
        format!("{} {CURRENCY_SUFFIX}", self.grouped())
    }

    fn grouped(self) -> String {
        let rounded = self.0.round_dp(2).normalize();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (text.as_str(), None),
        };

        let mut out = String::with_capacity(text.len() + text.len() / 3 + 2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        let len = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(' ');
            }
            out.push(ch);
        }
        if let Some(frac) = frac_part {
            out.push(',');
            out.push_str(frac);
        }
        out
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
