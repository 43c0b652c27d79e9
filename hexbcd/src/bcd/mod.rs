//! Compressed BCD literals.
//!
//! Two decimal digits per byte, right-padded with the filler digit `F` where
//! needed, e.g. `12 34 56 78 90 12 3F FF`.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::error::{Error, Result};
use crate::hextext::{normalize, HexText};

pub const FILLER_DIGIT: char = 'F';

const NOT_BCD: &str = "not a valid compressed BCD literal";
const EMPTY_BCD: &str = "empty compressed BCD literal";

/// Digits with the trailing filler run removed.
fn bare(text: &str) -> &str {
    text.trim_end_matches(FILLER_DIGIT)
}

fn validate(text: &str) -> Result<()> {
    if bare(text).bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }

    let offset = text.bytes().take_while(u8::is_ascii_digit).count();
    debug!("Rejecting compressed BCD {:?} at offset {}", text, offset);

    Err(Error::syntax(text, Some(offset), NOT_BCD))
}

fn pad_with_filler(text: &str, length: usize) -> String {
    format!("{:F<1$}", text, length)
}

fn round_up_to_even(length: usize) -> usize {
    (length + 1) & !1
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompressedBcd(HexText);

impl CompressedBcd {
    /// Encode `value` in decimal, right-padded with `F` to at least `min_digits`.
    ///
    /// Unless `allow_odd` is `Some(true)` the result is padded to an even number of digits.
    pub fn from_int(value: u64, min_digits: Option<usize>, allow_odd: Option<bool>) -> CompressedBcd {
        let decimal = value.to_string();
        let mut digits = decimal.len().max(min_digits.unwrap_or(0));

        if !allow_odd.unwrap_or(false) {
            digits = round_up_to_even(digits);
        }

        let text = pad_with_filler(&decimal, digits);
        trace!("Compressed BCD of {}: {}", value, text);

        CompressedBcd(HexText::from_normalized(text))
    }

    /// Create from numeric text that may contain whitespace.
    pub fn from_text(text: &str) -> Result<CompressedBcd> {
        let text = normalize(text);
        validate(&text)?;

        Ok(CompressedBcd(HexText::from_normalized(text)))
    }

    /// Validate binary data, e.g. a `cn` data element read from a card.
    pub fn from_binary(data: &[u8]) -> Result<CompressedBcd> {
        let hex = HexText::from_binary(data);
        validate(hex.as_str())?;

        Ok(CompressedBcd(hex))
    }

    pub fn into_string(self) -> String {
        self.0.into_string()
    }

    pub fn bare(&self) -> &str {
        bare(self.0.as_str())
    }

    /// Return a new literal right-padded with `F` to at least `min_length` digits.
    ///
    /// Unless `allow_odd` is `Some(true)` the result has an even number of digits.
    pub fn pad(&self, min_length: Option<usize>, allow_odd: Option<bool>) -> CompressedBcd {
        let mut length = min_length.unwrap_or(0);

        if !allow_odd.unwrap_or(false) {
            length = round_up_to_even(length.max(self.len()));
        }

        CompressedBcd(HexText::from_normalized(pad_with_filler(self.as_str(), length)))
    }

    /// Replace the digit at `offset` with a decimal digit or the filler digit.
    ///
    /// The whole literal is validated again, so fillers stay a trailing run.
    /// On failure `self` is unchanged.
    pub fn set(&mut self, offset: usize, digit: &str) -> Result<()> {
        let mut candidate = self.0.clone();
        candidate.set(offset, digit)?;
        validate(candidate.as_str())?;

        self.0 = candidate;
        Ok(())
    }

    pub fn with_digit(&self, offset: usize, digit: &str) -> Result<CompressedBcd> {
        let mut copy = self.clone();
        copy.set(offset, digit)?;
        Ok(copy)
    }

    pub fn to_u64(&self) -> Result<u64> {
        let digits = self.bare();

        if digits.is_empty() {
            return Err(Error::syntax(self.as_str(), None, EMPTY_BCD));
        }

        digits.parse::<u64>().map_err(|_| Error::Overflow {
            in_data: self.as_str().to_string(),
        })
    }
}

impl Deref for CompressedBcd {
    type Target = HexText;

    fn deref(&self) -> &HexText {
        &self.0
    }
}

impl From<u64> for CompressedBcd {
    fn from(value: u64) -> CompressedBcd {
        CompressedBcd::from_int(value, None, None)
    }
}

impl_digit_text!(CompressedBcd);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::init_logging;

    #[test]
    fn test_from_int() {
        init_logging();

        assert_eq!(CompressedBcd::from_int(1234, None, Some(false)).as_str(), "1234");
        assert_eq!(CompressedBcd::from_int(123, None, Some(false)).as_str(), "123F");
        assert_eq!(CompressedBcd::from_int(123, None, None).as_str(), "123F");
        assert_eq!(CompressedBcd::from_int(123, None, Some(true)).as_str(), "123");
        assert_eq!(CompressedBcd::from_int(5, Some(4), Some(true)).as_str(), "5FFF");
        assert_eq!(CompressedBcd::from_int(5, Some(3), Some(true)).as_str(), "5FF");
        assert_eq!(CompressedBcd::from_int(5, Some(3), None).as_str(), "5FFF");
        assert_eq!(CompressedBcd::from_int(0, None, None).as_str(), "0F");
        assert_eq!(CompressedBcd::from_int(0, Some(0), Some(true)).as_str(), "0");
        assert_eq!(CompressedBcd::from(42u64).as_str(), "42");
    }

    #[test]
    fn test_from_int_lengths() {
        let values: [u64; 7] = [0, 7, 10, 999, 123_456, 9_876_543, u64::MAX];

        for &value in values.iter() {
            for min_digits in 0..24 {
                let bcd = CompressedBcd::from_int(value, Some(min_digits), Some(false));
                assert_eq!(bcd.len() % 2, 0);
                assert!(bcd.len() >= min_digits);
                assert!(bcd.len() >= value.to_string().len());
                assert_eq!(bcd.to_u64(), Ok(value));
            }
        }
    }

    #[test]
    fn test_from_text() -> Result<()> {
        init_logging();

        assert_eq!(CompressedBcd::from_text("12 34")?.as_str(), "1234");
        assert_eq!(CompressedBcd::from_text("12F")?.as_str(), "12F");
        assert_eq!(CompressedBcd::from_text("12f")?.bare(), "12");
        assert_eq!(CompressedBcd::from_text("FFF")?.bare(), "");
        assert!(CompressedBcd::from_text("")?.is_empty());

        assert_eq!(
            CompressedBcd::from_text("1A3"),
            Err(Error::Syntax {
                in_data: "1A3".to_string(),
                at_offset: Some(1),
                reason: NOT_BCD,
            })
        );
        assert_eq!(
            CompressedBcd::from_text("12F3").unwrap_err().at_offset(),
            Some(2)
        );
        assert_eq!(
            CompressedBcd::from_text("F1").unwrap_err().at_offset(),
            Some(0)
        );
        assert!(CompressedBcd::from_text("12E").is_err());

        Ok(())
    }

    #[test]
    fn test_from_binary() -> Result<()> {
        let bcd = CompressedBcd::from_binary(&[0x44, 0x44, 0x55, 0x55, 0x66, 0x66, 0x77, 0x7F])?;
        assert_eq!(bcd.bare(), "444455556666777");
        assert_eq!(bcd.to_binary()?, vec![0x44, 0x44, 0x55, 0x55, 0x66, 0x66, 0x77, 0x7F]);

        assert_eq!(CompressedBcd::from_binary(&[0xFF, 0xFF])?.bare(), "");
        assert!(CompressedBcd::from_binary(&[0x44, 0x44, 0xAB, 0x55]).is_err());
        assert!(CompressedBcd::from_binary(&[0x44, 0x44, 0xF4]).is_err());

        Ok(())
    }

    #[test]
    fn test_pad() -> Result<()> {
        let bcd = CompressedBcd::from_text("1234")?;
        let padded = bcd.pad(Some(6), Some(false));
        assert_eq!(padded.as_str(), "1234FF");
        assert_eq!(bcd.as_str(), "1234");

        assert_eq!(bcd.pad(Some(5), None).as_str(), "1234FF");
        assert_eq!(bcd.pad(Some(5), Some(true)).as_str(), "1234F");
        assert_eq!(bcd.pad(Some(2), None), bcd);
        assert_eq!(bcd.pad(Some(bcd.len()), None), bcd);
        assert_eq!(bcd.pad(None, None), bcd);

        let odd = CompressedBcd::from_text("123")?;
        assert_eq!(odd.pad(None, None).as_str(), "123F");
        assert_eq!(odd.pad(Some(odd.len()), Some(true)), odd);
        assert_eq!(odd.pad(Some(1), Some(true)), odd);

        Ok(())
    }

    #[test]
    fn test_set() -> Result<()> {
        let mut bcd = CompressedBcd::from_text("123F")?;
        bcd.set(3, "4")?;
        assert_eq!(bcd.as_str(), "1234");

        bcd.set(3, "f")?;
        assert_eq!(bcd.as_str(), "123F");

        // filler in the middle
        assert!(matches!(bcd.set(1, "F"), Err(Error::Syntax { .. })));
        // hex digit that is not decimal
        assert!(matches!(bcd.set(0, "A"), Err(Error::Syntax { .. })));
        assert!(matches!(bcd.set(4, "1"), Err(Error::OutOfRange { .. })));
        assert_eq!(bcd.as_str(), "123F");

        let copy = bcd.with_digit(0, "9")?;
        assert_eq!(copy.as_str(), "923F");
        assert_eq!(bcd.as_str(), "123F");

        Ok(())
    }

    #[test]
    fn test_to_u64() -> Result<()> {
        assert_eq!(CompressedBcd::from_text("0012 3F")?.to_u64()?, 123);
        assert_eq!(
            CompressedBcd::from_text("FF")?.to_u64(),
            Err(Error::syntax("FF", None, EMPTY_BCD))
        );
        assert_eq!(
            CompressedBcd::from_text("18446744073709551616")?.to_u64(),
            Err(Error::Overflow {
                in_data: "18446744073709551616".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn test_serde() {
        let bcd: CompressedBcd = serde_yaml::from_str("'123f'").unwrap();
        assert_eq!(bcd.to_u64(), Ok(123));
        assert!(serde_yaml::from_str::<CompressedBcd>("'1A3'").is_err());

        let yaml = serde_yaml::to_string(&bcd).unwrap();
        assert_eq!(serde_yaml::from_str::<CompressedBcd>(&yaml).unwrap(), bcd);
    }
}
