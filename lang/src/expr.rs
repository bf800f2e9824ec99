//! Pratt-style (explicit precedence) expression builder.
//!
//! Mirrors the original's scope-shifting precedence algorithm exactly:
//! `(` and `)` shift every subsequent operator's effective precedence
//! by ±10, and the operator with the highest effective precedence is
//! reduced first, ties broken leftmost (the original relies on
//! Python's `max()` returning the first maximal element; this repo's
//! reduction loop does the same by only replacing the current best on
//! a strictly-greater comparison).

use crate::ast::{Expr, Op};
use crate::error::SyntaxError;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum OpSym {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Open,
    Close,
}

fn base_precedence(sym: OpSym) -> i32 {
    match sym {
        OpSym::Assign => 0,
        OpSym::Add | OpSym::Sub => 1,
        OpSym::Mul | OpSym::Div => 2,
        OpSym::Open | OpSym::Close => 0,
    }
}

fn to_op(sym: OpSym) -> Op {
    match sym {
        OpSym::Assign => Op::Assign,
        OpSym::Add => Op::Add,
        OpSym::Sub => Op::Sub,
        OpSym::Mul => Op::Mul,
        OpSym::Div => Op::Div,
        OpSym::Open | OpSym::Close => unreachable!("parentheses are stripped before reduction"),
    }
}

enum Item {
    Operator(OpSym, i32),
    Value(Expr),
}

fn classify(token: &str) -> Result<Item, SyntaxError> {
    let sym = match token {
        "=" => Some(OpSym::Assign),
        "+" => Some(OpSym::Add),
        "-" => Some(OpSym::Sub),
        "*" => Some(OpSym::Mul),
        "/" => Some(OpSym::Div),
        "(" => Some(OpSym::Open),
        ")" => Some(OpSym::Close),
        _ => None,
    };
    if let Some(sym) = sym {
        return Ok(Item::Operator(sym, 0));
    }

    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        let value: u32 = token
            .parse()
            .map_err(|_| SyntaxError::BadExpression(format!("{:?} is not a valid literal", token)))?;
        return Ok(Item::Value(Expr::Literal((value % 256) as u8)));
    }

    if !token.is_empty() && token.chars().all(|c| c.is_alphabetic()) {
        return Ok(Item::Value(Expr::Identifier(token.to_owned())));
    }

    Err(SyntaxError::UnrecognizedToken(token.to_owned()))
}

/// Builds an `Expr` tree from a flat token run (no separators).
pub fn build_expression(tokens: &[String]) -> Result<Expr, SyntaxError> {
    let mut items: Vec<Item> = tokens.iter().map(|t| classify(t)).collect::<Result<_, _>>()?;

    let mut scope = 0i32;
    for item in items.iter_mut() {
        if let Item::Operator(sym, precedence) = item {
            match sym {
                OpSym::Open => scope += 10,
                OpSym::Close => scope -= 10,
                _ => {}
            }
            *precedence = base_precedence(*sym) + scope;
        }
    }
    if scope != 0 {
        return Err(SyntaxError::BadExpression("unbalanced parentheses".to_owned()));
    }

    items.retain(|item| !matches!(item, Item::Operator(OpSym::Open, _) | Item::Operator(OpSym::Close, _)));

    loop {
        let mut best: Option<(usize, i32)> = None;
        for (index, item) in items.iter().enumerate() {
            if let Item::Operator(_, precedence) = item {
                let replace = match best {
                    Some((_, best_precedence)) => *precedence > best_precedence,
                    None => true,
                };
                if replace {
                    best = Some((index, *precedence));
                }
            }
        }

        let (index, _) = match best {
            Some(found) => found,
            None => break,
        };

        if index == 0 || index + 1 >= items.len() {
            return Err(SyntaxError::BadExpression(
                "operator is missing a left or right operand".to_owned(),
            ));
        }

        let right = match items.remove(index + 1) {
            Item::Value(expr) => expr,
            Item::Operator(..) => {
                return Err(SyntaxError::BadExpression("operator missing a right operand".to_owned()))
            }
        };
        let op_sym = match items.remove(index) {
            Item::Operator(sym, _) => sym,
            Item::Value(_) => unreachable!(),
        };
        let left = match items.remove(index - 1) {
            Item::Value(expr) => expr,
            Item::Operator(..) => {
                return Err(SyntaxError::BadExpression("operator missing a left operand".to_owned()))
            }
        };

        items.insert(
            index - 1,
            Item::Value(Expr::BinaryOp(Box::new(left), to_op(op_sym), Box::new(right))),
        );
    }

    if items.len() != 1 {
        return Err(SyntaxError::BadExpression(format!(
            "expression did not reduce to a single value ({} items remain)",
            items.len()
        )));
    }

    match items.into_iter().next().unwrap() {
        Item::Value(expr) => Ok(expr),
        Item::Operator(..) => Err(SyntaxError::BadExpression("expression is a bare operator".to_owned())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn simple_addition() {
        let expr = build_expression(&tokens("1 + 2")).unwrap();
        assert_eq!(
            expr,
            Expr::BinaryOp(Box::new(Expr::Literal(1)), Op::Add, Box::new(Expr::Literal(2)))
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // a + b * 4  =>  a + (b * 4)
        let expr = build_expression(&tokens("a + b * 4")).unwrap();
        let expected = Expr::BinaryOp(
            Box::new(Expr::Identifier("a".to_owned())),
            Op::Add,
            Box::new(Expr::BinaryOp(
                Box::new(Expr::Identifier("b".to_owned())),
                Op::Mul,
                Box::new(Expr::Literal(4)),
            )),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn parentheses_override_precedence() {
        // (a + b) * 4
        let expr = build_expression(&tokens("( a + b ) * 4")).unwrap();
        let expected = Expr::BinaryOp(
            Box::new(Expr::BinaryOp(
                Box::new(Expr::Identifier("a".to_owned())),
                Op::Add,
                Box::new(Expr::Identifier("b".to_owned())),
            )),
            Op::Mul,
            Box::new(Expr::Literal(4)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn unbalanced_parentheses_is_an_error() {
        assert!(build_expression(&tokens("( a + b")).is_err());
    }

    #[test]
    fn dangling_operator_is_an_error() {
        assert!(build_expression(&tokens("a +")).is_err());
    }

    #[test]
    fn assignment_has_lowest_precedence() {
        // a = b + c  =>  a = (b + c)
        let expr = build_expression(&tokens("a = b + c")).unwrap();
        let expected = Expr::BinaryOp(
            Box::new(Expr::Identifier("a".to_owned())),
            Op::Assign,
            Box::new(Expr::BinaryOp(
                Box::new(Expr::Identifier("b".to_owned())),
                Op::Add,
                Box::new(Expr::Identifier("c".to_owned())),
            )),
        );
        assert_eq!(expr, expected);
    }
}
