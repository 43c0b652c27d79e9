use log::debug;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::ops::Deref;

use super::{decode_pairs, normalize, HexText, NOT_EVEN};
use crate::error::{Error, Result};

/// Hex text with an even number of digits, so that it always converts to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvenHexText(HexText);

impl EvenHexText {
    pub fn from_binary(data: &[u8]) -> EvenHexText {
        EvenHexText(HexText::from_binary(data))
    }

    /// Create from hex text that may contain whitespace.
    pub fn from_text(text: &str) -> Result<EvenHexText> {
        let text = normalize(text);

        if text.len() % 2 == 1 {
            debug!("Rejecting odd-length hex text {:?}", text);
            return Err(Error::syntax(&text, None, NOT_EVEN));
        }

        HexText::from_text(&text).map(EvenHexText)
    }

    pub fn into_string(self) -> String {
        self.0.into_string()
    }

    /// Same contract as [`HexText::set`]; the length and therefore the parity are kept.
    pub fn set(&mut self, offset: usize, digit: &str) -> Result<()> {
        self.0.set(offset, digit)
    }

    pub fn with_digit(&self, offset: usize, digit: &str) -> Result<EvenHexText> {
        self.0.with_digit(offset, digit).map(EvenHexText)
    }

    pub fn to_binary(&self) -> Vec<u8> {
        decode_pairs(self.0.as_str())
    }
}

impl Deref for EvenHexText {
    type Target = HexText;

    fn deref(&self) -> &HexText {
        &self.0
    }
}

impl TryFrom<HexText> for EvenHexText {
    type Error = Error;

    fn try_from(hex: HexText) -> Result<EvenHexText> {
        if hex.len() % 2 == 1 {
            return Err(Error::syntax(hex.as_str(), None, NOT_EVEN));
        }

        Ok(EvenHexText(hex))
    }
}

impl From<EvenHexText> for HexText {
    fn from(even: EvenHexText) -> HexText {
        even.0
    }
}

impl_digit_text!(EvenHexText);
