use std::{error::Error, fmt};

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum LexError {
    IllegalChar(char),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexError::IllegalChar(c) => write!(f, "illegal character {:?}", c),
        }
    }
}

impl Error for LexError {}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SyntaxError {
    UnexpectedEndOfInput,
    ExpectedOpenBrace { found: String },
    UnmatchedCloseBrace,
    BadIdentifier(String),
    BadCondition(String),
    UnrecognizedToken(String),
    BadExpression(String),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            SyntaxError::ExpectedOpenBrace { found } => {
                write!(f, "expected '{{', found {:?}", found)
            }
            SyntaxError::UnmatchedCloseBrace => write!(f, "'}}' with no matching open block"),
            SyntaxError::BadIdentifier(word) => write!(f, "{:?} is not a valid identifier", word),
            SyntaxError::BadCondition(word) => {
                write!(f, "{:?} is not a valid condition (identifier or numeric literal)", word)
            }
            SyntaxError::UnrecognizedToken(word) => write!(f, "unrecognized token {:?}", word),
            SyntaxError::BadExpression(msg) => write!(f, "invalid expression: {}", msg),
        }
    }
}

impl Error for SyntaxError {}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NamespaceError {
    UnknownIdentifier(String),
    NoFreeAddress,
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NamespaceError::UnknownIdentifier(name) => {
                write!(f, "identifier {:?} is not defined", name)
            }
            NamespaceError::NoFreeAddress => write!(f, "no free address in [0, 64) remains"),
        }
    }
}

impl Error for NamespaceError {}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum CodegenError {
    Namespace(NamespaceError),
    NotAnIdentifier,
    Other(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodegenError::Namespace(e) => write!(f, "{}", e),
            CodegenError::NotAnIdentifier => write!(f, "left-hand side of an assignment must be an identifier"),
            CodegenError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for CodegenError {}

impl From<NamespaceError> for CodegenError {
    fn from(e: NamespaceError) -> Self {
        CodegenError::Namespace(e)
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum CompileError {
    Lex(LexError),
    Syntax(SyntaxError),
    Codegen(CodegenError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{}", e),
            CompileError::Syntax(e) => write!(f, "{}", e),
            CompileError::Codegen(e) => write!(f, "{}", e),
        }
    }
}

impl Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<SyntaxError> for CompileError {
    fn from(e: SyntaxError) -> Self {
        CompileError::Syntax(e)
    }
}

impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        CompileError::Codegen(e)
    }
}

impl From<NamespaceError> for CompileError {
    fn from(e: NamespaceError) -> Self {
        CompileError::Codegen(CodegenError::Namespace(e))
    }
}
