//! AST to ASM text (§4.5).
//!
//! The original's expression codegen assumes "the result of an
//! expression lives at the lowest free address on entry" and protects
//! that convention across recursive calls with a throwaway dummy
//! identifier. This repo follows the REDESIGN FLAG instead: every
//! recursive call allocates its own result slot through the namespace
//! up front and returns that address explicitly, so a caller's live
//! values (already bound in the namespace) can never be handed out to
//! a callee by accident — there is no implicit convention left to
//! protect.

use crate::ast::{Expr, Node, Op, Operand};
use crate::error::CodegenError;
use crate::namespace::Namespace;

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_tokens_excluding_comments(text: &str) -> usize {
    text.lines()
        .map(|line| line.split_whitespace().take_while(|w| !w.starts_with('#')).count())
        .sum()
}

fn instr_pair(op: Op) -> (&'static str, &'static str) {
    match op {
        Op::Add => ("ADD", "ADDC"),
        Op::Sub => ("SUB", "SUBC"),
        Op::Mul => ("MUL", "MULC"),
        Op::Div => ("DIV", "DIVC"),
        Op::Assign => unreachable!("assignment has no addr/const instruction pair"),
    }
}

/// Compiles an expression, returning the instructions to compute it and
/// the address its value ends up at.
fn compile_expr(expr: &Expr, ns: &mut Namespace, temp_count: &mut u32) -> Result<(Vec<String>, u8), CodegenError> {
    match expr {
        Expr::Literal(value) => {
            let name = fresh_temp_name(temp_count);
            let var = ns.add_identifier(&name, "tmp")?;
            Ok((vec![format!("SET {} {}", Namespace::addr_as_str(var.addr), value)], var.addr))
        }

        Expr::Identifier(name) => {
            let addr = ns.get(name)?.addr;
            Ok((Vec::new(), addr))
        }

        Expr::BinaryOp(left, Op::Assign, right) => {
            let dest_name = match left.as_ref() {
                Expr::Identifier(name) => name.clone(),
                _ => return Err(CodegenError::NotAnIdentifier),
            };
            let dest_addr = ns.get(&dest_name)?.addr;
            let mut lines = Vec::new();

            match right.as_ref() {
                Expr::Identifier(name) => {
                    let src_addr = ns.get(name)?.addr;
                    lines.push(format!(
                        "MOV {} {}",
                        Namespace::addr_as_str(dest_addr),
                        Namespace::addr_as_str(src_addr)
                    ));
                }
                Expr::Literal(value) => {
                    lines.push(format!("SET {} {}", Namespace::addr_as_str(dest_addr), value));
                }
                Expr::BinaryOp(..) => {
                    let (sub_lines, result_addr) = compile_expr(right, ns, temp_count)?;
                    lines.extend(sub_lines);
                    lines.push(format!(
                        "MOV {} {}",
                        Namespace::addr_as_str(dest_addr),
                        Namespace::addr_as_str(result_addr)
                    ));
                }
            }

            Ok((lines, dest_addr))
        }

        Expr::BinaryOp(left, op, right) => {
            let name = fresh_temp_name(temp_count);
            let result = ns.add_identifier(&name, "tmp")?;
            let mut lines = Vec::new();

            match left.as_ref() {
                Expr::Identifier(name) => {
                    let addr = ns.get(name)?.addr;
                    lines.push(format!(
                        "MOV {} {}",
                        Namespace::addr_as_str(result.addr),
                        Namespace::addr_as_str(addr)
                    ));
                }
                Expr::Literal(value) => {
                    lines.push(format!("SET {} {}", Namespace::addr_as_str(result.addr), value));
                }
                Expr::BinaryOp(..) => {
                    let (sub_lines, addr) = compile_expr(left, ns, temp_count)?;
                    lines.extend(sub_lines);
                    lines.push(format!(
                        "MOV {} {}",
                        Namespace::addr_as_str(result.addr),
                        Namespace::addr_as_str(addr)
                    ));
                }
            }

            let (addr_instr, const_instr) = instr_pair(*op);
            match right.as_ref() {
                Expr::Identifier(name) => {
                    let addr = ns.get(name)?.addr;
                    lines.push(format!(
                        "{} {} {}",
                        addr_instr,
                        Namespace::addr_as_str(result.addr),
                        Namespace::addr_as_str(addr)
                    ));
                }
                Expr::Literal(value) => {
                    lines.push(format!("{} {} {}", const_instr, Namespace::addr_as_str(result.addr), value));
                }
                Expr::BinaryOp(..) => {
                    let (sub_lines, addr) = compile_expr(right, ns, temp_count)?;
                    lines.extend(sub_lines);
                    lines.push(format!(
                        "{} {} {}",
                        addr_instr,
                        Namespace::addr_as_str(result.addr),
                        Namespace::addr_as_str(addr)
                    ));
                }
            }

            Ok((lines, result.addr))
        }
    }
}

fn fresh_temp_name(counter: &mut u32) -> String {
    *counter += 1;
    format!("__t{}", counter)
}

fn pretty_print(expr: &Expr) -> String {
    match expr {
        Expr::Literal(value) => value.to_string(),
        Expr::Identifier(name) => name.clone(),
        Expr::BinaryOp(left, op, right) => {
            let sym = match op {
                Op::Assign => "=",
                Op::Add => "+",
                Op::Sub => "-",
                Op::Mul => "*",
                Op::Div => "/",
            };
            format!("{} {} {}", pretty_print(left), sym, pretty_print(right))
        }
    }
}

fn operand_addr_or_literal(operand: &Operand, ns: &Namespace) -> Result<String, CodegenError> {
    match operand {
        Operand::Identifier(name) => Ok(Namespace::addr_as_str(ns.get(name)?.addr)),
        Operand::Literal(value) => Ok(value.to_string()),
    }
}

/// Resolves an `If` condition to the address to test, synthesizing a
/// `SET` into a scratch slot first when the condition is a literal
/// (the original's codegen only ever matches an identifier condition;
/// this closes that gap so a literal condition, e.g. `if 0 { ... }`,
/// compiles too).
fn condition_addr(
    condition: &Operand,
    ns: &mut Namespace,
    temp_count: &mut u32,
) -> Result<(Vec<String>, u8), CodegenError> {
    match condition {
        Operand::Identifier(name) => Ok((Vec::new(), ns.get(name)?.addr)),
        Operand::Literal(value) => {
            let name = fresh_temp_name(temp_count);
            let var = ns.add_identifier(&name, "tmp")?;
            Ok((vec![format!("SET {} {}", Namespace::addr_as_str(var.addr), value)], var.addr))
        }
    }
}

/// Translates a block body, creating a child namespace of `parent` so
/// that declarations local to this block do not leak out.
pub fn translate(body: &[Node], parent: &Namespace) -> Result<String, CodegenError> {
    let mut ns = parent.child();
    let mut temp_count = 0u32;
    let mut lines: Vec<String> = Vec::new();

    for node in body {
        match node {
            Node::Comment(text) => lines.push(text.clone()),

            Node::VarDef { var_type, name } => {
                ns.add_identifier(name, var_type)?;
            }

            Node::Expression(expr) => {
                lines.push(format!("# {}", pretty_print(expr)));
                let (expr_lines, _result_addr) = compile_expr(expr, &mut ns, &mut temp_count)?;
                for line in expr_lines {
                    lines.push(format!("    {}", line));
                }
                ns.drop_temporaries();
            }

            Node::CompoundAdd { name, value } => {
                let dest_addr = ns.get(name)?.addr;
                let line = match value {
                    Operand::Literal(k) => format!("ADDC {} {}", Namespace::addr_as_str(dest_addr), k),
                    Operand::Identifier(src_name) => {
                        let src_addr = ns.get(src_name)?.addr;
                        format!(
                            "ADD {} {}",
                            Namespace::addr_as_str(dest_addr),
                            Namespace::addr_as_str(src_addr)
                        )
                    }
                };
                lines.push(format!("    {}", line));
            }

            Node::If { condition, body } => {
                let (cond_lines, cond_addr) = condition_addr(condition, &mut ns, &mut temp_count)?;
                for line in cond_lines {
                    lines.push(format!("    {}", line));
                }
                ns.drop_temporaries();

                let body_asm = translate(body, &ns)?;
                let body_len = count_tokens_excluding_comments(&body_asm);

                lines.push(format!("JZ {} @LEN+{}", Namespace::addr_as_str(cond_addr), body_len + 1));
                lines.push(indent_block(&body_asm));
            }

            Node::While { condition, body } => {
                let cond_addr = ns.get(condition)?.addr;
                let body_asm = translate(body, &ns)?;
                let body_len = count_tokens_excluding_comments(&body_asm);

                lines.push(format!("JZ {} @LEN+{}", Namespace::addr_as_str(cond_addr), body_len + 3));
                lines.push(indent_block(&body_asm));
                lines.push(format!("JMPC @LEN-{}", body_len + 4));
            }

            Node::Print(value) => {
                let line = match value {
                    Operand::Identifier(_) => format!("OUT {}", operand_addr_or_literal(value, &ns)?),
                    Operand::Literal(k) => format!("OUTC {}", k),
                };
                lines.push(line);
            }

            Node::FunctionDef { name, params: _, body } => {
                if name == "main" {
                    lines.push("&MAIN".to_owned());
                    lines.push(translate(body, &ns)?);
                    lines.push("END".to_owned());
                } else {
                    lines.push(format!("&{}", name));
                    lines.push(translate(body, &ns)?);
                    lines.push("JMPC @A".to_owned());
                }
            }
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_program;

    fn compile(source: &str) -> String {
        let body = parse_program(source).unwrap();
        translate(&body, &Namespace::new()).unwrap()
    }

    #[test]
    fn var_def_emits_nothing() {
        let asm = compile("int x");
        assert_eq!(asm.trim(), "");
    }

    #[test]
    fn simple_assignment_emits_set() {
        let asm = compile("int x\nx = 5");
        assert!(asm.contains("SET @A 5"));
    }

    #[test]
    fn identifier_assignment_emits_mov() {
        let asm = compile("int x\nint y\nx = y");
        assert!(asm.contains("MOV @A @B"));
    }

    #[test]
    fn compound_add_literal_emits_addc() {
        let asm = compile("int x\nx += 4");
        assert!(asm.contains("ADDC @A 4"));
    }

    #[test]
    fn print_literal_emits_outc() {
        let asm = compile("print 9");
        assert!(asm.contains("OUTC 9"));
    }

    #[test]
    fn print_identifier_emits_out() {
        let asm = compile("int x\nprint x");
        assert!(asm.contains("OUT @A"));
    }

    #[test]
    fn if_with_literal_condition_synthesizes_a_set() {
        let asm = compile("if 0 {\nprint 1\n}\nprint 2");
        assert!(asm.contains("SET"));
        assert!(asm.contains("JZ"));
    }
}
