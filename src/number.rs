// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::str::FromStr;

use anyhow::{bail, Result};
use serde::ser::Serializer;
use serde::Serialize;

// Largest integer that survives a round trip through f64.
const F64_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

/// Numeric scalar used by expressions and form data.
///
/// Backed by an `f64`. NaN and infinities are rejected at construction time
/// through [`Number::try_from_f64`], `TryFrom<f64>` and [`Number::from_str`],
/// so the ordering below is total for every value that reaches the
/// interpreter.
#[derive(Clone, Copy)]
pub struct Number(f64);

impl Number {
    pub fn try_from_f64(f: f64) -> Result<Number> {
        if !f.is_finite() {
            bail!("`{f}` is not a finite number");
        }
        Ok(Number(f))
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    pub fn is_integer(&self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() <= F64_SAFE_INTEGER
    }

    pub fn as_i64(&self) -> Option<i64> {
        if self.is_integer() {
            Some(self.0 as i64)
        } else {
            None
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.as_i64() {
            Some(i) if i >= 0 => Some(i as u64),
            _ => None,
        }
    }

    /// Format with a fixed number of decimals, rounding half away from zero.
    pub fn to_fixed(&self, decimals: u32) -> String {
        let decimals = decimals.min(100);
        let scale = 10f64.powi(decimals as i32);
        let mut rounded = (self.0 * scale).round() / scale;
        if !rounded.is_finite() {
            rounded = self.0;
        }
        // Avoid printing "-0".
        if rounded == 0.0 {
            rounded = 0.0;
        }
        format!("{rounded:.prec$}", prec = decimals as usize)
    }
}

impl TryFrom<f64> for Number {
    type Error = anyhow::Error;

    fn try_from(f: f64) -> Result<Self> {
        Number::try_from_f64(f)
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number(i as f64)
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        Number(u as f64)
    }
}

impl From<usize> for Number {
    fn from(u: usize) -> Self {
        Number(u as f64)
    }
}

impl FromStr for Number {
    type Err = anyhow::Error;

    /// Parse a decimal literal: optional sign, digits, optional fraction and
    /// optional exponent. Words such as `inf` or `NaN` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let body = t.strip_prefix(['-', '+']).unwrap_or(t);
        let starts_with_digit = body
            .chars()
            .next()
            .map(|c| c.is_ascii_digit() || c == '.')
            .unwrap_or(false);
        if !starts_with_digit || body.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
        {
            bail!("`{s}` is not a number");
        }
        match f64::from_str(t) {
            Ok(f) => Number::try_from_f64(f),
            Err(_) => bail!("`{s}` is not a number"),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        // 0.0 and -0.0 are the same number for expression purposes.
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        self.0.total_cmp(&other.0)
    }
}

// Magnitudes outside [1e-6, 1e21) are written in exponent form.
const EXPONENT_ABOVE: f64 = 1e21;
const EXPONENT_BELOW: f64 = 1e-6;

impl Display for Number {
    /// Same text as number-to-string conversion in form scripts: `20`,
    /// `0.1`, `1e+21`, `1e-7`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(i) = self.as_i64() {
            return write!(f, "{i}");
        }
        let magnitude = self.0.abs();
        if magnitude < EXPONENT_ABOVE && magnitude >= EXPONENT_BELOW {
            return write!(f, "{}", self.0);
        }
        let text = format!("{:e}", self.0);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
            _ => f.write_str(&text),
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_i64() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}
