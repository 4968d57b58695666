use std::{fmt::Display, iter::Sum, ops::Add};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const THB_CURRENCY_CODE: &str = "THB";

//--------------------------------------        Baht        -----------------------------------------------------------
/// A Thai Baht amount, stored internally as whole satang (1/100 THB).
///
/// The upstream orders API serialises prices as JSON numbers, so `Baht` converts to and
/// from `f64` at the serde boundary while all arithmetic stays in integer satang.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Baht(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in satang: {0}")]
pub struct BahtConversionError(String);

impl Baht {
    pub fn from_satang(satang: i64) -> Self {
        Self(satang)
    }

    pub fn from_baht(baht: i64) -> Self {
        Self(baht * 100)
    }

    pub fn satang(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Add for Baht {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Baht {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl TryFrom<f64> for Baht {
    type Error = BahtConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let satang = (value * 100.0).round();
        if !satang.is_finite() || satang.abs() > i64::MAX as f64 {
            return Err(BahtConversionError(format!("{value} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(satang as i64))
    }
}

impl Display for Baht {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / 100;
        let cents = (self.0 % 100).abs();
        let grouped = group_thousands(whole);
        if cents == 0 {
            write!(f, "{grouped}")
        } else {
            write!(f, "{grouped}.{cents:02}")
        }
    }
}

impl Serialize for Baht {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Baht {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Baht::try_from(value).map_err(serde::de::Error::custom)
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
