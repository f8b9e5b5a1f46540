//! IEEE 754-2008 128-bit decimal in binary integer decimal (BID) encoding.
//!
//! Only the pieces the conformance harness relies on are implemented:
//! wire conversion, the canonical string rendering and a strict parser.
//!
//! # Canonical string form
//!
//! - `NaN`, `Infinity`, `-Infinity` for the special values.
//! - Scientific notation (`1.23E+5`, `1E-7`) when the exponent is positive or
//!   the adjusted exponent is below -6.
//! - Plain notation otherwise, keeping every coefficient digit, so `1.0` and
//!   `1.00` render differently.
//!
//! # Parser
//!
//! The parser never rounds. Values that need more than 34 significant digits
//! or an exponent outside the representable range are clamped only when the
//! clamp is exact (padding or dropping zeros); anything else is rejected. A
//! rejection always carries the NaN poison value, see
//! [`ParseDecimalError::value`].

use std::fmt;
use std::str::FromStr;

const EXPONENT_BIAS: i64 = 6176;
const EXPONENT_MAX: i64 = 6111;
const EXPONENT_MIN: i64 = -6176;
const MAX_DIGITS: usize = 34;
/// 10^34 - 1.
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;
/// Exponent digits beyond this magnitude cannot change the outcome.
const EXPONENT_SATURATION: i64 = 1_000_000_000;

const SIGN_BIT: u64 = 1 << 63;
const NAN_HIGH: u64 = 0x7c00_0000_0000_0000;
const INFINITY_HIGH: u64 = 0x7800_0000_0000_0000;
const COEFFICIENT_HIGH_MASK: u64 = 0x0001_ffff_ffff_ffff;

/// A 128-bit decimal value, stored as its two 64-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    high: u64,
    low: u64,
}

impl Decimal128 {
    /// Quiet NaN. Also the poison value produced by a failed parse.
    pub const NAN: Self = Self::from_parts(NAN_HIGH, 0);
    pub const INFINITY: Self = Self::from_parts(INFINITY_HIGH, 0);
    pub const NEG_INFINITY: Self = Self::from_parts(INFINITY_HIGH | SIGN_BIT, 0);

    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    pub const fn high(&self) -> u64 {
        self.high
    }

    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Wire form: low word first, both words little-endian.
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        let mut low = [0_u8; 8];
        let mut high = [0_u8; 8];
        low.copy_from_slice(&bytes[..8]);
        high.copy_from_slice(&bytes[8..]);
        Self::from_parts(u64::from_le_bytes(high), u64::from_le_bytes(low))
    }

    pub fn to_le_bytes(&self) -> [u8; 16] {
        let mut out = [0_u8; 16];
        out[..8].copy_from_slice(&self.low.to_le_bytes());
        out[8..].copy_from_slice(&self.high.to_le_bytes());
        out
    }

    pub fn is_nan(&self) -> bool {
        self.combination() == 0x1f
    }

    pub fn is_infinite(&self) -> bool {
        self.combination() == 0x1e
    }

    pub fn is_sign_negative(&self) -> bool {
        self.high & SIGN_BIT != 0
    }

    /// Parse a decimal literal.
    ///
    /// Accepts `[+-]digits[.digits][(e|E)[+-]digits]` and `[+-]Infinity`.
    /// `NaN` is not a numeric literal and is rejected like any other
    /// malformed input.
    pub fn parse(input: &str) -> Result<Self, ParseDecimalError> {
        parse_literal(input).map_err(|reason| ParseDecimalError {
            input: input.to_string(),
            reason,
        })
    }

    fn combination(&self) -> u64 {
        (self.high >> 58) & 0x1f
    }

    /// Unbiased exponent and coefficient of a finite value.
    fn finite_parts(&self) -> (i64, u128) {
        let (biased, coefficient) = if self.combination() >> 3 == 0b11 {
            // Implied `100` significand prefix: always above the maximum coefficient.
            (((self.high >> 47) & 0x3fff) as i64, 0)
        } else {
            let coefficient =
                (u128::from(self.high & COEFFICIENT_HIGH_MASK) << 64) | u128::from(self.low);
            (((self.high >> 49) & 0x3fff) as i64, coefficient)
        };
        let coefficient = if coefficient > MAX_COEFFICIENT {
            0
        } else {
            coefficient
        };
        (biased - EXPONENT_BIAS, coefficient)
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return f.write_str("NaN");
        }
        let sign = if self.is_sign_negative() { "-" } else { "" };
        if self.is_infinite() {
            return write!(f, "{sign}Infinity");
        }

        let (exponent, coefficient) = self.finite_parts();
        let digits = coefficient.to_string();
        let adjusted = digits.len() as i64 - 1 + exponent;

        if exponent > 0 || adjusted < -6 {
            let (first, rest) = digits.split_at(1);
            if rest.is_empty() {
                write!(f, "{sign}{first}E{adjusted:+}")
            } else {
                write!(f, "{sign}{first}.{rest}E{adjusted:+}")
            }
        } else if exponent == 0 {
            write!(f, "{sign}{digits}")
        } else {
            let radix = digits.len() as i64 + exponent;
            if radix > 0 {
                let (int, frac) = digits.split_at(radix as usize);
                write!(f, "{sign}{int}.{frac}")
            } else {
                let zeros = "0".repeat((-radix) as usize);
                write!(f, "{sign}0.{zeros}{digits}")
            }
        }
    }
}

impl FromStr for Decimal128 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A rejected decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal128 literal {input:?}: {reason}")]
pub struct ParseDecimalError {
    input: String,
    reason: &'static str,
}

impl ParseDecimalError {
    /// The value a failed parse leaves behind: always NaN.
    pub fn value(&self) -> Decimal128 {
        Decimal128::NAN
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

fn parse_literal(input: &str) -> Result<Decimal128, &'static str> {
    let (negative, body) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if body == "Infinity" {
        return Ok(if negative {
            Decimal128::NEG_INFINITY
        } else {
            Decimal128::INFINITY
        });
    }

    let bytes = body.as_bytes();
    let mut digits = String::with_capacity(bytes.len());
    let mut fraction_digits: i64 = 0;
    let mut seen_point = false;
    let mut pos = 0;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'0'..=b'9' => {
                digits.push(char::from(b));
                if seen_point {
                    fraction_digits += 1;
                }
            }
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        pos += 1;
    }
    if digits.is_empty() {
        return Err("no digits");
    }

    let mut exponent: i64 = 0;
    if let Some(&marker) = bytes.get(pos) {
        if !matches!(marker, b'e' | b'E') {
            return Err("unexpected character");
        }
        pos += 1;
        let exponent_negative = match bytes.get(pos) {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let exponent_digits = &bytes[pos..];
        if exponent_digits.is_empty() || !exponent_digits.iter().all(u8::is_ascii_digit) {
            return Err("malformed exponent");
        }
        let magnitude = exponent_digits.iter().fold(0_i64, |acc, b| {
            (acc * 10 + i64::from(b - b'0')).min(EXPONENT_SATURATION)
        });
        exponent = if exponent_negative {
            -magnitude
        } else {
            magnitude
        };
    }
    let mut exponent = exponent - fraction_digits;

    let mut coefficient = digits.trim_start_matches('0').to_string();
    if coefficient.is_empty() {
        exponent = exponent.clamp(EXPONENT_MIN, EXPONENT_MAX);
        coefficient.push('0');
    } else {
        while coefficient.len() > MAX_DIGITS || exponent < EXPONENT_MIN {
            if !coefficient.ends_with('0') {
                return Err("value cannot be represented exactly");
            }
            coefficient.pop();
            exponent += 1;
        }
        while exponent > EXPONENT_MAX {
            if coefficient.len() >= MAX_DIGITS {
                return Err("exponent overflow");
            }
            coefficient.push('0');
            exponent -= 1;
        }
    }

    let coefficient = coefficient
        .bytes()
        .fold(0_u128, |acc, b| acc * 10 + u128::from(b - b'0'));
    let biased = (exponent + EXPONENT_BIAS) as u64;
    let mut high = (biased << 49) | (coefficient >> 64) as u64;
    if negative {
        high |= SIGN_BIT;
    }
    Ok(Decimal128::from_parts(high, coefficient as u64))
}
