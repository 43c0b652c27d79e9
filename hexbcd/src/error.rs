use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input text does not satisfy the alphabet, length or parity rules of the target type.
    #[error("Syntax error in {in_data:?}{}: {reason}", offset_suffix(.at_offset))]
    Syntax {
        in_data: String,
        at_offset: Option<usize>,
        reason: &'static str,
    },

    #[error("Offset {offset} out of range for {length} digits")]
    OutOfRange { offset: usize, length: usize },

    #[error("Value {in_data:?} does not fit into 64 bits")]
    Overflow { in_data: String },

    /// More digits than a fixed-size data element can hold.
    #[error("{length} digits of {in_data:?} do not fit into {capacity} digits")]
    TooLong {
        in_data: String,
        length: usize,
        capacity: usize,
    },

    #[error("Element size of {size} bytes is too large")]
    SizeTooLarge { size: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

fn offset_suffix(at_offset: &Option<usize>) -> String {
    match at_offset {
        Some(offset) => format!(" at offset {}", offset),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn syntax(in_data: &str, at_offset: Option<usize>, reason: &'static str) -> Error {
        Error::Syntax {
            in_data: in_data.to_string(),
            at_offset,
            reason,
        }
    }

    /// Offset of the first offending character, if the error carries one.
    pub fn at_offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { at_offset, .. } => *at_offset,
            Error::OutOfRange { offset, .. } => Some(*offset),
            Error::TooLong { capacity, .. } => Some(*capacity),
            Error::Overflow { .. } | Error::SizeTooLarge { .. } => None,
        }
    }
}
