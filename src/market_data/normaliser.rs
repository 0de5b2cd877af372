// Convert wire strings into integer ticks.
// Fixed scale: `decimals` places after the point, anything beyond is truncated.

use crate::error::{TickerError, TickerResult};

// 10^18 is the largest power of ten an i64 holds
pub const MAX_DECIMALS: u32 = 18;

#[derive(Debug, Clone, Copy)]
pub struct Normaliser {
    pub decimals: u32,
    pub scale: i64, // 10^decimals
}

impl Normaliser {
    /// `decimals` above `MAX_DECIMALS` is clamped.
    pub fn new(decimals: u32) -> Self {
        let decimals = decimals.min(MAX_DECIMALS);
        let scale = 10i64.pow(decimals);
        Self { decimals, scale }
    }

    pub fn to_ticks(&self, s: &str) -> TickerResult<i64> {
        let invalid = || TickerError::InvalidDecimal { value: s.to_string() };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (integer_part, decimal_part) = match digits.split_once('.') {
            Some((i, d)) => (i, d),
            None => (digits, ""),
        };

        if integer_part.is_empty() && decimal_part.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer_part) || !all_digits(decimal_part) {
            return Err(invalid());
        }

        let integer: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| invalid())?
        };

        // Pad or truncate decimal part to match our scale
        let width = self.decimals as usize;
        let fraction: i64 = if width == 0 {
            0
        } else if decimal_part.len() >= width {
            decimal_part[..width].parse().map_err(|_| invalid())?
        } else {
            format!("{:0<width$}", decimal_part, width = width)
                .parse()
                .map_err(|_| invalid())?
        };

        let ticks = integer
            .checked_mul(self.scale)
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(invalid)?;

        Ok(if negative { -ticks } else { ticks })
    }

    /// Render ticks back into a decimal string with `decimals` places.
    pub fn format_ticks(&self, ticks: i64) -> String {
        let sign = if ticks < 0 { "-" } else { "" };
        let abs = ticks.unsigned_abs();
        let scale = self.scale as u64;
        if self.decimals == 0 {
            return format!("{sign}{abs}");
        }
        format!(
            "{sign}{}.{:0width$}",
            abs / scale,
            abs % scale,
            width = self.decimals as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_decimal_prices() {
        let norm = Normaliser::new(8);
        assert_eq!(norm.to_ticks("0.00000123").unwrap(), 123);
        assert_eq!(norm.to_ticks("1.5").unwrap(), 150_000_000);
        assert_eq!(norm.to_ticks("42").unwrap(), 4_200_000_000);
        assert_eq!(norm.to_ticks(".25").unwrap(), 25_000_000);
    }

    #[test]
    fn test_truncates_extra_places() {
        let norm = Normaliser::new(2);
        assert_eq!(norm.to_ticks("3.14159").unwrap(), 314);
    }

    #[test]
    fn test_negative_values() {
        let norm = Normaliser::new(4);
        assert_eq!(norm.to_ticks("-0.5").unwrap(), -5_000);
    }

    #[test]
    fn test_rejects_garbage() {
        let norm = Normaliser::new(8);
        for bad in ["", ".", "abc", "1.2.3", "1e-8", "0x10", "--1"] {
            match norm.to_ticks(bad) {
                Err(TickerError::InvalidDecimal { value }) => assert_eq!(value, bad),
                other => panic!("expected InvalidDecimal for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        let norm = Normaliser::new(8);
        assert!(norm.to_ticks("99999999999999999999").is_err());
    }

    #[test]
    fn test_decimals_are_clamped() {
        let norm = Normaliser::new(30);
        assert_eq!(norm.decimals, MAX_DECIMALS);
        assert_eq!(norm.scale, 1_000_000_000_000_000_000);
        assert_eq!(norm.format_ticks(1), "0.000000000000000001");
    }

    #[test]
    fn test_format_ticks() {
        let norm = Normaliser::new(8);
        assert_eq!(norm.format_ticks(123), "0.00000123");
        assert_eq!(norm.format_ticks(150_000_000), "1.50000000");
        assert_eq!(norm.format_ticks(-1), "-0.00000001");
        assert_eq!(Normaliser::new(0).format_ticks(7), "7");
    }
}
