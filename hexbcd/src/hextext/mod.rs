//! Uppercase hexadecimal text.
//!
//! `HexText` may hold an odd number of digits. Use [`EvenHexText`] when the
//! digits must always convert to whole bytes.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod even;

pub use self::even::EvenHexText;

pub(crate) const NOT_HEX_TEXT: &str = "not a valid hex string";
pub(crate) const NOT_HEX_DIGIT: &str = "not a valid hex digit";
pub(crate) const NOT_EVEN: &str = "not an even number of hex digits";

/// Strips all whitespace and uppercases. Every factory runs this before validating.
pub(crate) fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        _ => digit - b'A' + 0xA,
    }
}

/// Caller guarantees an even number of uppercase hex digits.
pub(crate) fn decode_pairs(digits: &str) -> Vec<u8> {
    digits
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| nibble(pair[0]) << 4 | nibble(pair[1]))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexText {
    digits: String,
}

impl HexText {
    pub fn from_binary(data: &[u8]) -> HexText {
        HexText {
            digits: hex::encode_upper(data),
        }
    }

    /// Create from hex text that may contain whitespace and lowercase digits.
    pub fn from_text(text: &str) -> Result<HexText> {
        let text = normalize(text);

        if let Some(offset) = text.bytes().position(|b| !b.is_ascii_hexdigit()) {
            debug!("Rejecting hex text {:?} at offset {}", text, offset);
            return Err(Error::syntax(&text, Some(offset), NOT_HEX_TEXT));
        }

        trace!("Hex text: {}", text);
        Ok(HexText { digits: text })
    }

    /// `digits` must already be normalized and valid for the calling type.
    pub(crate) fn from_normalized(digits: String) -> HexText {
        HexText { digits }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn into_string(self) -> String {
        self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.digits.chars()
    }

    pub fn get(&self, offset: usize) -> Result<char> {
        self.digits
            .as_bytes()
            .get(offset)
            .map(|&digit| digit as char)
            .ok_or_else(|| Error::OutOfRange {
                offset,
                length: self.len(),
            })
    }

    /// Replace the digit at `offset`. `digit` must be exactly one hex digit in either case.
    /// The length never changes.
    pub fn set(&mut self, offset: usize, digit: &str) -> Result<()> {
        let digit = parse_digit(digit)?;

        if offset >= self.len() {
            return Err(Error::OutOfRange {
                offset,
                length: self.len(),
            });
        }

        let mut buf = [0u8; 4];
        self.digits
            .replace_range(offset..offset + 1, digit.encode_utf8(&mut buf));

        Ok(())
    }

    /// Like [`HexText::set`] but returns the updated copy and leaves `self` untouched.
    pub fn with_digit(&self, offset: usize, digit: &str) -> Result<HexText> {
        let mut copy = self.clone();
        copy.set(offset, digit)?;
        Ok(copy)
    }

    /// Decode digit pairs into bytes, high nibble first.
    ///
    /// Fails on an odd number of digits. Nothing is truncated or padded.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        if self.len() % 2 == 1 {
            debug!("Cannot convert odd-length hex text {:?} to binary", self.digits);
            return Err(Error::syntax(&self.digits, None, NOT_EVEN));
        }

        Ok(decode_pairs(&self.digits))
    }
}

fn parse_digit(digit: &str) -> Result<char> {
    let mut chars = digit.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_hexdigit() => Ok(c.to_ascii_uppercase()),
        _ => Err(Error::syntax(
            &digit.to_ascii_uppercase(),
            Some(0),
            NOT_HEX_DIGIT,
        )),
    }
}

impl_digit_text!(HexText);
