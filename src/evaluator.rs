//! The tree-walking evaluator.
//!
//! One node kind, one statement result: every `Node` reduces to exactly
//! one `Value`, with `Value::Undefined` standing in for the constructs that
//! have no expression value of their own — declarations (with or without an
//! initializer), `nonlocal`, blocks, loops, and `if`. The outer `evaluate`
//! entry point collects the top-level block's per-statement results into
//! the list the host API returns.

use log::{debug, trace};

use crate::ast::{Node, Position};
use crate::env::Context;
use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{apply_binary, apply_comparison, apply_compound, apply_dot, apply_incdec, apply_unary, DotOperand, Value};

/// Evaluates a parsed program (a top-level `Block`) and returns one value
/// per top-level statement, in source order.
pub fn evaluate(program: &Node, context: &mut Context) -> RuntimeResult<Vec<Value>> {
    let Node::Block { statements, .. } = program else {
        return Err(RuntimeError::type_error("a program must be a block of statements"));
    };
    statements.iter().map(|stmt| eval_node(stmt, context)).collect()
}

fn eval_node(node: &Node, context: &mut Context) -> RuntimeResult<Value> {
    match node {
        Node::Block { statements, .. } => context.scoped(|inner| {
            for stmt in statements {
                eval_node(stmt, inner)?;
            }
            Ok(Value::Undefined)
        }),

        Node::VarDecl {
            name,
            type_name,
            init,
            is_const,
            position,
        } => eval_var_decl(name, type_name.as_deref(), init.as_deref(), *is_const, *position, context),

        Node::VarAssign { name, value, position } => {
            let value = eval_node(value, context)?;
            context.set(name, value).map_err(|e| e.with_position(*position))
        }

        Node::VarRef { name, position } => context.resolve_var_ref(name).map_err(|e| e.with_position(*position)),

        Node::NonLocal { name, .. } => {
            context.declare_nonlocal(name);
            Ok(Value::Undefined)
        }

        Node::BinaryOp {
            op,
            left,
            right,
            position,
        } => {
            let left = eval_node(left, context)?;
            let right = eval_node(right, context)?;
            trace!("binary {op} {left} {right}");
            apply_binary(&left, *op, &right).map_err(|e| e.with_position(*position))
        }

        Node::ComparisonOp {
            op,
            left,
            right,
            position,
        } => {
            let left = eval_node(left, context)?;
            let right = eval_node(right, context)?;
            apply_comparison(&left, *op, &right).map_err(|e| e.with_position(*position))
        }

        Node::UnaryOp { op, child, position } => {
            let operand = eval_node(child, context)?;
            apply_unary(*op, &operand).map_err(|e| e.with_position(*position))
        }

        Node::IncDec { op, name, position } => {
            let current = context.get(name).map_err(|e| e.with_position(*position))?;
            let updated = apply_incdec(*op, &current).map_err(|e| e.with_position(*position))?;
            context.set(name, updated).map_err(|e| e.with_position(*position))
        }

        Node::AssignOp {
            op,
            name,
            value,
            position,
        } => {
            let current = context.get(name).map_err(|e| e.with_position(*position))?;
            let rhs = eval_node(value, context)?;
            let updated = apply_compound(&current, *op, &rhs).map_err(|e| e.with_position(*position))?;
            context.set(name, updated).map_err(|e| e.with_position(*position))
        }

        Node::Dot { left, right, position } => {
            let left_value = eval_node(left, context)?;
            let operand = match right.as_ref() {
                Node::VarRef { name, .. } => DotOperand::Name(name.clone()),
                other => DotOperand::Value(eval_node(other, context)?),
            };
            apply_dot(&left_value, &operand).map_err(|e| e.with_position(*position))
        }

        Node::For {
            init,
            check,
            change,
            body,
            ..
        } => eval_for(init, check, change, body, context),

        Node::While { check, body, .. } => eval_while(check, body, context),

        Node::If {
            check,
            body,
            else_body,
            ..
        } => eval_if(check, body, else_body, context),
    }
}

fn eval_var_decl(
    name: &str,
    type_name: Option<&str>,
    init: Option<&Node>,
    is_const: bool,
    position: Position,
    context: &mut Context,
) -> RuntimeResult<Value> {
    let value = match init {
        Some(expr) => eval_node(expr, context)?,
        None => Value::Undefined,
    };

    if value == Value::Undefined && type_name.is_none() {
        return Err(RuntimeError::type_error_at(
            "cannot infer the type of \"undefined\"",
            position,
        ));
    }

    let declared_type = match type_name {
        Some(type_name) => match context.get(type_name).map_err(|e| e.with_position(position))? {
            Value::Type(tag) => tag,
            other => {
                return Err(RuntimeError::type_error_at(
                    format!("cannot create a variable of type \"{other}\" - it is not a type"),
                    position,
                ))
            }
        },
        None => value.type_tag(),
    };

    debug!("declare '{name}' : {declared_type} (const={is_const})");
    context.declare(name, declared_type, value, is_const);
    Ok(Value::Undefined)
}

fn eval_for(init: &Node, check: &Node, change: &Node, body: &Node, context: &mut Context) -> RuntimeResult<Value> {
    context.scoped(|outer| {
        eval_node(init, outer)?;
        loop {
            let condition = eval_node(check, outer)?;
            if !truthy(&condition, check.position())? {
                break;
            }
            outer.scoped(|inner| eval_node(body, inner))?;
            eval_node(change, outer)?;
        }
        Ok(Value::Undefined)
    })
}

fn eval_while(check: &Node, body: &Node, context: &mut Context) -> RuntimeResult<Value> {
    context.scoped(|outer| {
        loop {
            let condition = eval_node(check, outer)?;
            if !truthy(&condition, check.position())? {
                break;
            }
            outer.scoped(|inner| eval_node(body, inner))?;
        }
        Ok(Value::Undefined)
    })
}

fn eval_if(check: &Node, body: &Node, else_body: &Node, context: &mut Context) -> RuntimeResult<Value> {
    let condition = eval_node(check, context)?;
    if truthy(&condition, check.position())? {
        context.scoped(|inner| eval_node(body, inner))?;
    } else {
        context.scoped(|inner| eval_node(else_body, inner))?;
    }
    Ok(Value::Undefined)
}

fn truthy(value: &Value, position: Position) -> RuntimeResult<bool> {
    value.is_truthy_condition().map_err(|e| e.with_position(position))
}
