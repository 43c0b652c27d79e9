//! Validated hex-digit text and compressed BCD value types.
//!
//! ```
//! use hexbcd::{CompressedBcd, HexText};
//!
//! let hex = HexText::from_binary(b"\x9F\x02");
//! assert_eq!(hex.as_str(), "9F02");
//!
//! let amount = CompressedBcd::from_int(123, None, None);
//! assert_eq!(amount.as_str(), "123F");
//! assert_eq!(amount.to_u64().unwrap(), 123);
//! ```

macro_rules! impl_digit_text {
    ($type:ident) => {
        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $type {
            type Err = crate::error::Error;

            fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
                $type::from_text(text)
            }
        }

        impl std::convert::TryFrom<&str> for $type {
            type Error = crate::error::Error;

            fn try_from(text: &str) -> std::result::Result<Self, Self::Error> {
                $type::from_text(text)
            }
        }

        impl std::convert::TryFrom<String> for $type {
            type Error = crate::error::Error;

            fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
                $type::from_text(&text)
            }
        }

        impl AsRef<str> for $type {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$type> for String {
            fn from(value: $type) -> String {
                value.into_string()
            }
        }
    };
}

pub mod bcd;
pub mod bcdutil;
pub mod error;
pub mod hextext;

pub use bcd::{CompressedBcd, FILLER_DIGIT};
pub use error::{Error, Result};
pub use hextext::{EvenHexText, HexText};
