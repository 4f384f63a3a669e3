use super::{INDICATOR_OFFSET, INDICATOR_SWEEP};
use derive_more::{AsRef, Deref, Display, From, Into};
use ringctl::geom::Point;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed text shown in place of the formatted progress.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ProgressText(String);

ringctl::impl_string_newtype!(ProgressText);

#[derive(Error, Debug, PartialEq)]
pub enum TextFormatError {
    #[error("Unexpected '{0}' in number pattern")]
    UnexpectedChar(char),
    #[error("Number pattern has no digits")]
    NoDigits,
}

/// Decimal number pattern in the `###,##0.0` style: a `,` anywhere in the integer
/// part turns on thousands grouping, every `0`/`#` after the `.` is one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct TextFormat {
    pub decimals: usize,
    pub grouping: bool,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            decimals: 1,
            grouping: true,
        }
    }
}

impl FromStr for TextFormat {
    type Err = TextFormatError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let (integer, fraction) = pattern.split_once('.').unwrap_or((pattern, ""));

        if let Some(c) = integer.chars().find(|c| !matches!(c, '#' | '0' | ',')) {
            return Err(TextFormatError::UnexpectedChar(c));
        }
        if let Some(c) = fraction.chars().find(|c| !matches!(c, '#' | '0')) {
            return Err(TextFormatError::UnexpectedChar(c));
        }
        if !integer.contains(['#', '0']) {
            return Err(TextFormatError::NoDigits);
        }

        Ok(Self {
            decimals: fraction.len(),
            grouping: integer.contains(','),
        })
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.grouping { "#,##0" } else { "0" })?;
        if self.decimals > 0 {
            write!(f, ".{}", "0".repeat(self.decimals))?;
        }
        Ok(())
    }
}

impl TextFormat {
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let fixed = format!("{:.*}", self.decimals, value.abs());
        let (integer, fraction) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
        // no "-0.0"
        if value < 0.0 && fixed.chars().any(|c| matches!(c, '1'..='9')) {
            out.push('-');
        }
        if self.grouping {
            out.push_str(&group_thousands(integer));
        } else {
            out.push_str(integer);
        }
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut acc, (i, c)| {
            if i > 0 && (len - i) % 3 == 0 {
                acc.push(',');
            }
            acc.push(c);
            acc
        })
}

/// Highlighted slice of the ring that follows the pointer while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub start_angle: f64,
    pub sweep: f64,
}

impl Indicator {
    pub fn at(touch_angle: f64) -> Self {
        Self {
            start_angle: touch_angle + INDICATOR_OFFSET,
            sweep: INDICATOR_SWEEP,
        }
    }
}

/// Everything a renderer needs to draw the control in its current state.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub show_inner_circle: bool,
    pub indicator: Option<Indicator>,
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_parsing() {
        let cases = vec![
            ("###,###,###,##0.0", TextFormat::default()),
            (
                "###,###,###,##0.00",
                TextFormat {
                    decimals: 2,
                    grouping: true,
                },
            ),
            (
                "0",
                TextFormat {
                    decimals: 0,
                    grouping: false,
                },
            ),
            (
                "#0.###",
                TextFormat {
                    decimals: 3,
                    grouping: false,
                },
            ),
        ];

        for (pattern, expected) in cases {
            assert_eq!(pattern.parse::<TextFormat>().unwrap(), expected, "{pattern}");
        }

        assert_eq!(
            "#,##0.0%".parse::<TextFormat>(),
            Err(TextFormatError::UnexpectedChar('%'))
        );
        assert_eq!(".00".parse::<TextFormat>(), Err(TextFormatError::NoDigits));
    }

    #[test]
    fn test_formatting() {
        let default = TextFormat::default();
        assert_eq!(default.format(1234.5), "1,234.5");
        assert_eq!(default.format(0.0), "0.0");
        assert_eq!(default.format(999.0), "999.0");
        assert_eq!(default.format(100.0), "100.0");
        assert_eq!(default.format(-0.01), "0.0");

        let two = TextFormat {
            decimals: 2,
            grouping: true,
        };
        assert_eq!(two.format(-1234567.25), "-1,234,567.25");

        let plain = TextFormat {
            decimals: 0,
            grouping: false,
        };
        assert_eq!(plain.format(123456.0), "123456");
    }

    #[test]
    fn test_format_serde() {
        let format: TextFormat = serde_json::from_str("\"#,##0.00\"").unwrap();
        assert_eq!(format.decimals, 2);
        assert!(format.grouping);
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"#,##0.00\"");
    }

    #[test]
    fn test_indicator_trails_touch_angle() {
        let indicator = Indicator::at(90.0);
        assert_eq!(indicator.start_angle, -15.0);
        assert_eq!(indicator.sweep, 30.0);
    }
}
