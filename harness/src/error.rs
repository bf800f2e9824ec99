use std::{error::Error, fmt};

#[derive(Eq, PartialEq, Debug)]
pub enum HarnessError {
    Parse(String),
    Timeout { cycles: usize },
    Compile(lang::CompileError),
    Assemble(asm::AssembleError),
    Interpret(octo::InterpretError),
    Mismatch { expected: Vec<u8>, actual: Vec<u8> },
    ExpectedFailureButSucceeded,
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HarnessError::Parse(msg) => write!(f, "malformed .ltest file: {}", msg),
            HarnessError::Timeout { cycles } => write!(f, "did not reach the expected condition within {} cycles", cycles),
            HarnessError::Compile(e) => write!(f, "{}", e),
            HarnessError::Assemble(e) => write!(f, "{}", e),
            HarnessError::Interpret(e) => write!(f, "{}", e),
            HarnessError::Mismatch { expected, actual } => {
                write!(f, "expected {:?}, got {:?}", expected, actual)
            }
            HarnessError::ExpectedFailureButSucceeded => {
                write!(f, "expected the compile or assemble step to fail, but it succeeded")
            }
        }
    }
}

impl Error for HarnessError {}

impl From<lang::CompileError> for HarnessError {
    fn from(e: lang::CompileError) -> Self {
        HarnessError::Compile(e)
    }
}

impl From<asm::AssembleError> for HarnessError {
    fn from(e: asm::AssembleError) -> Self {
        HarnessError::Assemble(e)
    }
}

impl From<octo::InterpretError> for HarnessError {
    fn from(e: octo::InterpretError) -> Self {
        HarnessError::Interpret(e)
    }
}
