//! Compiles octo high-level language source into ASM text (§4).
//!
//! Pipeline: [`lexer`] tokenizes, [`parser`] builds an [`ast::Node`]
//! tree, [`codegen`] walks the tree against a [`namespace::Namespace`]
//! to produce ASM. [`expr`] is the precedence-climbing expression
//! reader the parser calls into for `Expression`/`CompoundAdd` bodies.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod namespace;
pub mod parser;

pub use error::CompileError;

/// Compiles a complete program's source into ASM text.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let body = parser::parse_program(source)?;
    let asm = codegen::translate(&body, &namespace::Namespace::new())?;
    Ok(asm)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compiles_a_tiny_program() {
        let asm = compile("int x\nx = 5\nprint x").unwrap();
        assert!(asm.contains("SET @A 5"));
        assert!(asm.contains("OUT @A"));
    }

    #[test]
    fn compiles_the_literal_if_scenario() {
        // if 0 { print 1 }; print 2  =>  only "2" is ever printed.
        let asm = compile("if 0 {\nprint 1\n}\nprint 2").unwrap();
        assert!(asm.contains("JZ"));
        assert!(asm.contains("OUTC 2"));
    }

    #[test]
    fn unknown_identifier_is_reported() {
        assert!(compile("x = 5").is_err());
    }
}
