//! The typed tree of HLL constructs.
//!
//! The original's block nesting is a mutable `open` flag carried on
//! every composite node, closed by scanning back from the last-added
//! node. This repo uses the REDESIGN FLAG's own suggestion instead: the
//! parser (`crate::parser`) is a plain recursive-descent reader, where
//! a nested block is just a nested function call that returns its body
//! once it consumes the matching `}`. No node ever needs to remember
//! whether it is still open.

/// A literal or a variable reference, the two atoms everywhere an
/// operand is accepted (`If`/`Print`'s numeric-or-identifier operand
/// position, `BinOp`'s right-hand side, `Expr`'s leaves).
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Operand {
    Literal(u8),
    Identifier(String),
}

/// The operators the expression builder (`crate::expr`) recognizes.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Op {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

/// An arithmetic/assignment expression tree, as built by
/// `crate::expr::build_expression`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Expr {
    Literal(u8),
    Identifier(String),
    BinaryOp(Box<Expr>, Op, Box<Expr>),
}

/// A single statement in the program body. `Root` and `FunctionDef`'s
/// nesting is represented directly as `Vec<Node>`; `Type` is folded
/// into `VarDef`'s `var_type` field; `Literal`/`Identifier` live inside
/// `Operand`/`Expr`; `Operator` is `crate::expr`'s internal `Op`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Node {
    Comment(String),
    VarDef { var_type: String, name: String },
    /// The general arithmetic/assignment form, e.g. `a = b + c * 4`.
    Expression(Expr),
    /// The compound-assignment form `id += (lit|id)`. `+=` is not one
    /// of the expression builder's recognized operators (see §4.3), so
    /// it is parsed directly into this node rather than through `Expr`.
    CompoundAdd { name: String, value: Operand },
    If { condition: Operand, body: Vec<Node> },
    /// While's condition must be an identifier (§4.2).
    While { condition: String, body: Vec<Node> },
    Print(Operand),
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
    },
}
