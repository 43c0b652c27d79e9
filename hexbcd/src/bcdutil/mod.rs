//! Fixed-size EMV numeric data elements.

use log::trace;

use crate::bcd::CompressedBcd;
use crate::error::{Error, Result};
use crate::hextext::EvenHexText;

const FILLER_IN_NUMERIC: &str = "filler digit in numeric data";

fn check_capacity(digits: &str, size: usize) -> Result<usize> {
    let capacity = size.checked_mul(2).ok_or(Error::SizeTooLarge { size })?;

    if digits.len() > capacity {
        return Err(Error::TooLong {
            in_data: digits.to_string(),
            length: digits.len(),
            capacity,
        });
    }

    Ok(capacity)
}

fn numeric_digits(bcd: &CompressedBcd) -> Result<&str> {
    let digits = bcd.bare();

    if digits.len() != bcd.len() {
        return Err(Error::syntax(
            bcd.as_str(),
            Some(digits.len()),
            FILLER_IN_NUMERIC,
        ));
    }

    Ok(digits)
}

//cn = 12 34 56 78 90 12 3F FF
pub fn encode_cn(digits: &str, size: usize) -> Result<Vec<u8>> {
    let bcd = CompressedBcd::from_text(digits)?;
    let capacity = check_capacity(bcd.bare(), size)?;

    let padded = CompressedBcd::from_text(bcd.bare())?.pad(Some(capacity), None);
    trace!("cn{}: {}", size, padded);

    padded.to_binary()
}

pub fn decode_cn(bcd_data: &[u8]) -> Result<String> {
    let bcd = CompressedBcd::from_binary(bcd_data)?;

    Ok(bcd.bare().to_string())
}

//n = 00 00 00 01 23 45
pub fn encode_n(digits: &str, size: usize) -> Result<Vec<u8>> {
    let bcd = CompressedBcd::from_text(digits)?;
    let digits = numeric_digits(&bcd)?;
    let capacity = check_capacity(digits, size)?;

    let aligned = EvenHexText::from_text(&format!("{:0>1$}", digits, capacity))?;
    trace!("n{}: {}", size, aligned);

    Ok(aligned.to_binary())
}

pub fn decode_n(bcd_data: &[u8]) -> Result<u64> {
    let bcd = CompressedBcd::from_binary(bcd_data)?;
    numeric_digits(&bcd)?;

    bcd.to_u64()
}
