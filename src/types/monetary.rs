use crate::types::MonetaryError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DECIMAL_PLACES: usize = 2;
const SCALE: i64 = 10i64.pow(DECIMAL_PLACES as u32);

/// Fixed-point amount stored as a whole number of hundredths.
///
/// Every value the generator produces is already at 2-decimal precision, so
/// additions and subtractions never need rounding and never drift.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Monetary(i64);

impl Monetary {
    pub const ZERO: Monetary = Monetary(0);
    pub const ONE: Monetary = Monetary(SCALE);

    pub fn from_cents(cents: i64) -> Self {
        Monetary(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[cfg(test)]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Monetary) -> Option<Monetary> {
        self.0.checked_add(rhs.0).map(Monetary)
    }

    pub fn checked_sub(self, rhs: Monetary) -> Option<Monetary> {
        self.0.checked_sub(rhs.0).map(Monetary)
    }
}

impl Display for Monetary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u64;
        let integer = abs / scale;
        let fraction = abs % scale;
        write!(formatter, "{}{}.{:0width$}", sign, integer, fraction, width = DECIMAL_PLACES)
    }
}

impl FromStr for Monetary {
    type Err = MonetaryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(MonetaryError::InvalidFormat("Value is an empty string".to_string()));
        }

        let (integer_part, fraction_part) = match value.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (value, None)
        };

        if fraction_part.is_some_and(|fraction| fraction.contains('.')) {
            return Err(MonetaryError::InvalidFormat("Value has more than one decimal point".to_string()));
        }

        let integer: i64 = integer_part.parse().map_err(|error| {
            MonetaryError::InvalidFormat(format!("Value has an invalid integer part: {:?}", error))
        })?;

        let fraction: i64 = match fraction_part {
            Some(fraction) if !fraction.is_empty() => {
                if fraction.len() > DECIMAL_PLACES {
                    return Err(MonetaryError::InvalidFormat("Value has too many decimal places".to_string()));
                }

                if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
                    return Err(MonetaryError::InvalidFormat(format!("Value has an invalid fraction part: {fraction}")));
                }

                format!("{:0<width$}", fraction, width = DECIMAL_PLACES).parse()?
            }
            _ => 0
        };

        let sign = if value.starts_with('-') { -1 } else { 1 };
        let result = integer.checked_mul(SCALE)
            .and_then(|v| v.checked_add(sign * fraction))
            .ok_or(MonetaryError::Overflow)?;

        Ok(Monetary(result))
    }
}

impl Serialize for Monetary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
