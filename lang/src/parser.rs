//! Recursive-descent statement parser (§4.2).
//!
//! The original tracks block nesting with a mutable `open` flag on
//! every composite node and closes the innermost open node by
//! scanning back through the nodes built so far. This repo's
//! `parse_block` is an ordinary recursive function instead: an `if`,
//! `while`, or `def` body is just a nested call that returns once it
//! reads the matching `}`, so no node ever carries open/closed state.

use crate::ast::{Node, Operand};
use crate::error::SyntaxError;
use crate::expr::build_expression;
use crate::lexer::Lexer;

fn is_valid_identifier(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_alphabetic())
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn parse_literal(token: &str) -> Result<u8, SyntaxError> {
    let value: u32 = token
        .parse()
        .map_err(|_| SyntaxError::BadExpression(format!("{:?} is not a valid literal", token)))?;
    Ok((value % 256) as u8)
}

fn expect_identifier(token: &str) -> Result<String, SyntaxError> {
    if is_valid_identifier(token) {
        Ok(token.to_owned())
    } else {
        Err(SyntaxError::BadIdentifier(token.to_owned()))
    }
}

fn expect_operand(token: &str) -> Result<Operand, SyntaxError> {
    if is_numeric(token) {
        Ok(Operand::Literal(parse_literal(token)?))
    } else if is_valid_identifier(token) {
        Ok(Operand::Identifier(token.to_owned()))
    } else {
        Err(SyntaxError::BadExpression(format!("{:?} is not a literal or identifier", token)))
    }
}

fn expect_open_brace(lexer: &mut Lexer) -> Result<(), SyntaxError> {
    match lexer.read_token(true) {
        Some(ref t) if t == "{" => Ok(()),
        Some(other) => Err(SyntaxError::ExpectedOpenBrace { found: other }),
        None => Err(SyntaxError::UnexpectedEndOfInput),
    }
}

fn next_token(lexer: &mut Lexer) -> Result<String, SyntaxError> {
    lexer.read_token(true).ok_or(SyntaxError::UnexpectedEndOfInput)
}

/// Parses one statement. `Ok(None)` means the block ended (either `}`
/// was consumed, for a nested block, or input ran out, at top level).
fn parse_statement(lexer: &mut Lexer, nested: bool) -> Result<Option<Node>, SyntaxError> {
    let token = match lexer.read_token(true) {
        Some(t) => t,
        None => return Ok(None),
    };

    if token == "}" {
        if nested {
            return Ok(None);
        }
        return Err(SyntaxError::UnmatchedCloseBrace);
    }

    if token.starts_with('#') {
        return Ok(Some(Node::Comment(token)));
    }

    if token == "if" {
        let cond_token = next_token(lexer)?;
        let condition = if is_numeric(&cond_token) {
            Operand::Literal(parse_literal(&cond_token)?)
        } else if is_valid_identifier(&cond_token) {
            Operand::Identifier(cond_token)
        } else {
            return Err(SyntaxError::BadCondition(cond_token));
        };
        expect_open_brace(lexer)?;
        let body = parse_block(lexer)?;
        return Ok(Some(Node::If { condition, body }));
    }

    if token == "while" {
        let cond_token = next_token(lexer)?;
        if !is_valid_identifier(&cond_token) {
            return Err(SyntaxError::BadCondition(cond_token));
        }
        expect_open_brace(lexer)?;
        let body = parse_block(lexer)?;
        return Ok(Some(Node::While {
            condition: cond_token,
            body,
        }));
    }

    if token == "def" {
        let name = expect_identifier(&next_token(lexer)?)?;
        match lexer.read_token(true) {
            Some(ref t) if t == "(" => {}
            Some(other) => {
                return Err(SyntaxError::BadExpression(format!(
                    "expected '(' after function name, found {:?}",
                    other
                )))
            }
            None => return Err(SyntaxError::UnexpectedEndOfInput),
        }
        let mut params = Vec::new();
        loop {
            match lexer.read_token(true) {
                Some(ref t) if t == ")" => break,
                Some(t) => params.push(expect_identifier(&t)?),
                None => return Err(SyntaxError::UnexpectedEndOfInput),
            }
        }
        expect_open_brace(lexer)?;
        let body = parse_block(lexer)?;
        return Ok(Some(Node::FunctionDef { name, params, body }));
    }

    if token == "print" {
        let value = expect_operand(&next_token(lexer)?)?;
        return Ok(Some(Node::Print(value)));
    }

    // `int`/`var` followed by a name is a VarDef; anything else starting
    // with this identifier is an expression/compound-add run.
    if token == "int" || token == "var" {
        if let Some(next) = lexer.peek_token(true) {
            if is_valid_identifier(&next) {
                lexer.read_token(true);
                return Ok(Some(Node::VarDef { var_type: token, name: next }));
            }
        }
    }

    let first = expect_identifier(&token)?;
    let mut run = vec![first];
    run.extend(lexer.read_until_separator());

    if run.len() >= 2 && run[1] == "+=" {
        if run.len() != 3 {
            return Err(SyntaxError::BadExpression("+= takes exactly one right-hand operand".to_owned()));
        }
        let value = expect_operand(&run[2])?;
        return Ok(Some(Node::CompoundAdd { name: run[0].clone(), value }));
    }

    let expr = build_expression(&run)?;
    Ok(Some(Node::Expression(expr)))
}

fn parse_block(lexer: &mut Lexer) -> Result<Vec<Node>, SyntaxError> {
    let mut body = Vec::new();
    loop {
        match parse_statement(lexer, true)? {
            Some(node) => body.push(node),
            None => break,
        }
    }
    Ok(body)
}

/// Parses a complete program (the top-level body, with no enclosing
/// braces).
pub fn parse_program(source: &str) -> Result<Vec<Node>, crate::error::CompileError> {
    let mut lexer = Lexer::new(source)?;
    let mut body = Vec::new();
    loop {
        match parse_statement(&mut lexer, false)? {
            Some(node) => body.push(node),
            None => break,
        }
    }
    Ok(body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::{Expr, Op};

    #[test]
    fn parses_a_var_def() {
        let body = parse_program("int x").unwrap();
        assert_eq!(body, vec![Node::VarDef { var_type: "int".to_owned(), name: "x".to_owned() }]);
    }

    #[test]
    fn two_bare_identifiers_with_no_operator_is_an_error() {
        assert!(parse_program("foo bar").is_err());
    }

    #[test]
    fn parses_a_simple_assignment() {
        let body = parse_program("x = 5").unwrap();
        assert_eq!(
            body,
            vec![Node::Expression(Expr::BinaryOp(
                Box::new(Expr::Identifier("x".to_owned())),
                Op::Assign,
                Box::new(Expr::Literal(5))
            ))]
        );
    }

    #[test]
    fn parses_a_compound_add() {
        let body = parse_program("x += 3").unwrap();
        assert_eq!(body, vec![Node::CompoundAdd { name: "x".to_owned(), value: Operand::Literal(3) }]);
    }

    #[test]
    fn parses_an_if_with_identifier_condition() {
        let body = parse_program("if x {\nprint 1\n}").unwrap();
        match &body[0] {
            Node::If { condition, body } => {
                assert_eq!(*condition, Operand::Identifier("x".to_owned()));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn parses_an_if_with_literal_condition() {
        let body = parse_program("if 0 {\nprint 1\n}\nprint 2").unwrap();
        assert_eq!(body.len(), 2);
        match &body[0] {
            Node::If { condition, .. } => assert_eq!(*condition, Operand::Literal(0)),
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn parses_a_while_loop() {
        let body = parse_program("while x {\nx += 1\n}").unwrap();
        match &body[0] {
            Node::While { condition, body } => {
                assert_eq!(condition, "x");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected While, got {:?}", other),
        }
    }

    #[test]
    fn while_with_literal_condition_is_rejected() {
        assert!(parse_program("while 0 {\nprint 1\n}").is_err());
    }

    #[test]
    fn parses_a_function_def_with_params() {
        let body = parse_program("def add ( a b ) {\nprint a\n}").unwrap();
        match &body[0] {
            Node::FunctionDef { name, params, body } => {
                assert_eq!(name, "add");
                assert_eq!(params, &vec!["a".to_owned(), "b".to_owned()]);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected FunctionDef, got {:?}", other),
        }
    }

    #[test]
    fn parses_comments_verbatim() {
        let body = parse_program("# a note\nint x").unwrap();
        assert_eq!(body[0], Node::Comment("# a note".to_owned()));
    }

    #[test]
    fn unmatched_close_brace_is_an_error() {
        assert!(parse_program("}").is_err());
    }

    #[test]
    fn missing_open_brace_after_if_is_an_error() {
        assert!(parse_program("if x print 1").is_err());
    }
}
