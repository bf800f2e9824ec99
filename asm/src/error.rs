use std::{error::Error, fmt};

/// Everything that can go wrong while turning ASM text into an image.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AssembleError {
    UnknownMacro(String),
    BadInteger(String),
    MissingMain,
    CodeTooLarge(usize),
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssembleError::UnknownMacro(name) => write!(f, "reference to undefined macro {:?}", name),
            AssembleError::BadInteger(word) => write!(f, "{:?} is neither a macro reference, an instruction nor an integer", word),
            AssembleError::MissingMain => write!(f, "no &MAIN label was defined"),
            AssembleError::CodeTooLarge(len) => write!(f, "assembled code is {} bytes, which does not fit in a 256-byte image", len),
        }
    }
}

impl Error for AssembleError {}
