//! The value system: tagged variants plus the operator-handler dispatch
//! protocol.
//!
//! There is no dynamic method lookup here — Rust's dispatch is static, so
//! "looking up a handler by name" becomes a `match` over `(Value, op)` that
//! returns `None` for "no handler" rather than a missing method. The
//! evaluator retains the fallback shape: try the left/forward handler,
//! then the right/reverse handler, then fail.

use std::fmt::{self, Display};

use once_cell::sync::Lazy;

use crate::ast::{BinaryOpKind, ComparisonOpKind, CompoundOpKind, IncDecKind, UnaryOpKind};
use crate::error::{RuntimeError, RuntimeResult};
use crate::util::gcd;

/// The type tag carried by every `Value`. `int`, `rational` and `bool` are
/// exposed to source as root-frame variables holding `Value::Type`; `Type`
/// has no surface name of its own (nothing in the grammar produces one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Integer,
    Rational,
    Boolean,
    Undefined,
    Null,
    Type,
    Function,
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Integer => "int",
            TypeTag::Rational => "rational",
            TypeTag::Boolean => "bool",
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Type => "type",
            TypeTag::Function => "function",
        };
        f.write_str(name)
    }
}

/// The right operand of a dot expression, fixed up at evaluation time from
/// the parsed right child's *kind*: a bare `VarRef` is passed as its name,
/// anything else is evaluated first.
#[derive(Debug, Clone)]
pub enum DotOperand {
    Name(String),
    Value(Value),
}

/// A native handler carrier. Surface grammar never produces a `Function`
/// value; this variant exists only so the value model has a home for the
/// handler methods below, matching the shape the value system describes
/// even though nothing in this crate ever constructs one from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHandle {
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer { value: i64, leading_zeros: u32 },
    Rational { numerator: i64, denominator: i64 },
    Boolean(bool),
    Undefined,
    Null,
    Type(TypeTag),
    Function(FunctionHandle),
}

impl Value {
    pub fn integer(value: i64) -> Value {
        Value::Integer {
            value,
            leading_zeros: 0,
        }
    }

    /// Build an `Integer` from a lexed digit-identifier, preserving leading
    /// zeros for later use by the dot operator.
    pub fn integer_from_lexeme(lexeme: &str) -> Value {
        let leading_zeros = lexeme.bytes().take_while(|b| *b == b'0').count() as u32;
        let value: i64 = lexeme.parse().unwrap_or(0);
        Value::Integer {
            value,
            leading_zeros,
        }
    }

    pub fn rational(numerator: i64, denominator: i64) -> RuntimeResult<Value> {
        if denominator == 0 {
            return Err(RuntimeError::zero_division(format!(
                "attempted to divide {numerator} by 0"
            )));
        }
        let g = gcd(numerator, denominator);
        let (mut n, mut d) = (numerator / g, denominator / g);
        if d < 0 {
            n = -n;
            d = -d;
        }
        Ok(Value::Rational {
            numerator: n,
            denominator: d,
        })
    }

    pub fn boolean(value: bool) -> Value {
        Value::Boolean(value)
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Integer { .. } => TypeTag::Integer,
            Value::Rational { .. } => TypeTag::Rational,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Undefined => TypeTag::Undefined,
            Value::Null => TypeTag::Null,
            Value::Type(_) => TypeTag::Type,
            Value::Function(_) => TypeTag::Function,
        }
    }

    /// "is an instance of" for the purposes of `Context::set`/`declare`:
    /// there is no subtyping, so this is tag equality.
    pub fn matches_type(&self, declared: TypeTag) -> bool {
        self.type_tag() == declared
    }

    pub fn is_truthy_condition(&self) -> RuntimeResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(RuntimeError::type_error(format!(
                "condition must be a bool, found {}",
                other.type_tag()
            ))),
        }
    }

    // ---- binary arithmetic -------------------------------------------

    /// `operator_<name>` on `self` as the left operand. `None` means "no
    /// handler" (the `NotImplemented` sentinel); callers fall back to the
    /// right operand's reverse handler.
    fn try_binary(&self, op: BinaryOpKind, other: &Value) -> Option<RuntimeResult<Value>> {
        match self {
            Value::Integer { value: a, .. } => {
                let Value::Integer { value: b, .. } = other else {
                    return None;
                };
                Some(match op {
                    BinaryOpKind::Plus => Ok(Value::integer(a + b)),
                    BinaryOpKind::Minus => Ok(Value::integer(a - b)),
                    BinaryOpKind::Star => Ok(Value::integer(a * b)),
                    BinaryOpKind::Slash => Value::rational(*a, *b),
                })
            }
            Value::Rational {
                numerator: n,
                denominator: d,
            } => rational_binary_checked(*n, *d, op, other),
            _ => None,
        }
    }

    /// `reverse_operator_<name>` on `self` as the right operand, `other`
    /// the left. Only `Rational` defines one — `Integer`'s forward handler
    /// already covers `Integer op Integer`, and `Integer op Rational`
    /// always resolves here instead.
    fn try_reverse_binary(&self, op: BinaryOpKind, other: &Value) -> Option<RuntimeResult<Value>> {
        let Value::Rational {
            numerator: n,
            denominator: d,
        } = self
        else {
            return None;
        };
        let Value::Integer { value: a, .. } = other else {
            return None;
        };
        let a = Value::integer(*a);
        // `other` is always Integer here, so the forward formula below
        // always matches and `rational_binary_checked` never returns None.
        Some(match op {
            // a + b == b + a
            BinaryOpKind::Plus => rational_binary_checked(*n, *d, BinaryOpKind::Plus, &a)
                .expect("integer operand always matches"),
            // a - b == -(b - a)
            BinaryOpKind::Minus => rational_binary_checked(*n, *d, BinaryOpKind::Minus, &a)
                .expect("integer operand always matches")
                .map(negate_rational),
            // a * b == b * a
            BinaryOpKind::Star => rational_binary_checked(*n, *d, BinaryOpKind::Star, &a)
                .expect("integer operand always matches"),
            // a / b == (1/b) * a
            BinaryOpKind::Slash => reciprocal(*n, *d).and_then(|recip| match recip {
                Value::Rational {
                    numerator: rn,
                    denominator: rd,
                } => rational_binary_checked(rn, rd, BinaryOpKind::Star, &a)
                    .expect("integer operand always matches"),
                _ => unreachable!("reciprocal always returns a Rational"),
            }),
        })
    }

    // ---- comparisons ----------------------------------------------------

    fn try_comparison(&self, op: ComparisonOpKind, other: &Value) -> Option<RuntimeResult<Value>> {
        match self {
            Value::Integer { value: a, .. } => match other {
                Value::Integer { value: b, .. } => Some(Ok(Value::boolean(compare_ord(*a, *b, op)))),
                Value::Rational { .. } => None,
                _ => None,
            },
            Value::Rational {
                numerator: n,
                denominator: d,
            } => {
                let (on, od) = match other {
                    Value::Rational {
                        numerator,
                        denominator,
                    } => (*numerator, *denominator),
                    Value::Integer { value, .. } => (*value, 1),
                    _ => return None,
                };
                // d, od > 0 always (invariant), so cross-multiplication
                // preserves ordering without a sign flip.
                let lhs = (*n as i128) * (od as i128);
                let rhs = (on as i128) * (*d as i128);
                Some(Ok(Value::boolean(compare_ord(lhs, rhs, op))))
            }
            Value::Boolean(a) => match other {
                Value::Boolean(b) => match op {
                    ComparisonOpKind::Equality | ComparisonOpKind::Identity => {
                        Some(Ok(Value::boolean(a == b)))
                    }
                    ComparisonOpKind::Nonequality => Some(Ok(Value::boolean(a != b))),
                    _ => None,
                },
                _ => None,
            },
            Value::Null => match other {
                Value::Null => match op {
                    ComparisonOpKind::Equality | ComparisonOpKind::Identity => Some(Ok(Value::boolean(true))),
                    ComparisonOpKind::Nonequality => Some(Ok(Value::boolean(false))),
                    _ => None,
                },
                _ => None,
            },
            Value::Undefined => match other {
                Value::Undefined => match op {
                    ComparisonOpKind::Equality | ComparisonOpKind::Identity => Some(Ok(Value::boolean(true))),
                    ComparisonOpKind::Nonequality => Some(Ok(Value::boolean(false))),
                    _ => None,
                },
                _ => None,
            },
            Value::Type(a) => match other {
                Value::Type(b) => match op {
                    ComparisonOpKind::Equality | ComparisonOpKind::Identity => Some(Ok(Value::boolean(a == b))),
                    ComparisonOpKind::Nonequality => Some(Ok(Value::boolean(a != b))),
                    _ => None,
                },
                _ => None,
            },
            Value::Function(_) => None,
        }
    }

    // ---- unary ----------------------------------------------------------

    fn try_unary(&self, op: UnaryOpKind) -> Option<RuntimeResult<Value>> {
        match self {
            Value::Integer { value, .. } => Some(Ok(match op {
                UnaryOpKind::Plus => Value::integer(*value),
                UnaryOpKind::Minus => Value::integer(-value),
            })),
            Value::Rational {
                numerator,
                denominator,
            } => Some(match op {
                UnaryOpKind::Plus => Value::rational(*numerator, *denominator),
                UnaryOpKind::Minus => Value::rational(-numerator, *denominator),
            }),
            _ => None,
        }
    }

    fn try_incdec(&self, op: IncDecKind) -> Option<RuntimeResult<Value>> {
        match self {
            Value::Integer { value, .. } => Some(Ok(match op {
                IncDecKind::Increment => Value::integer(value + 1),
                IncDecKind::Decrement => Value::integer(value - 1),
            })),
            Value::Rational {
                numerator,
                denominator,
            } => Some(match op {
                IncDecKind::Increment => Value::rational(numerator + denominator, *denominator),
                IncDecKind::Decrement => Value::rational(numerator - denominator, *denominator),
            }),
            _ => None,
        }
    }

    /// `assignment_operator_<name>`: tried on the current (LHS) value only
    /// — unlike `try_binary`, there is no reverse fallback on the RHS. The
    /// result still goes through `Context::set`, which is where an
    /// Integer-declared slot on the receiving end of `/=` surfaces its
    /// type mismatch (the handler itself returns a `Rational`).
    pub fn try_compound(&self, op: CompoundOpKind, rhs: &Value) -> Option<RuntimeResult<Value>> {
        let op = match op {
            CompoundOpKind::Plus => BinaryOpKind::Plus,
            CompoundOpKind::Minus => BinaryOpKind::Minus,
            CompoundOpKind::Star => BinaryOpKind::Star,
            CompoundOpKind::Slash => BinaryOpKind::Slash,
        };
        self.try_binary(op, rhs)
    }

    pub fn try_unary_op(&self, op: UnaryOpKind) -> Option<RuntimeResult<Value>> {
        self.try_unary(op)
    }

    pub fn try_incdec_op(&self, op: IncDecKind) -> Option<RuntimeResult<Value>> {
        self.try_incdec(op)
    }

    /// `operator_get`: the dot handler, defined only on `Integer` (decimal
    /// literal reconstruction). Nothing else supports a dot right-hand
    /// side.
    pub fn try_dot(&self, rhs: &DotOperand) -> Option<RuntimeResult<Value>> {
        let Value::Integer {
            value: v_l,
            leading_zeros: _,
        } = self
        else {
            return None;
        };
        let (v_r, x) = match rhs {
            DotOperand::Name(s) => {
                let leading_zeros = s.bytes().take_while(|b| *b == b'0').count() as i64;
                let len = s.len() as i64;
                let x = if leading_zeros > 0 {
                    len + leading_zeros - 1
                } else {
                    len
                };
                let v_r: i64 = s.parse().unwrap_or(0);
                (v_r, x)
            }
            DotOperand::Value(Value::Integer {
                value,
                leading_zeros,
            }) => {
                // `to_string().len()` counts a leading '-' on a negative
                // right operand as a digit, same as the source this was
                // ported from; `3.(-5)` picks up one extra place of ten
                // because of it.
                let digits = value.to_string().len() as i64;
                (*value, digits + *leading_zeros as i64)
            }
            DotOperand::Value(_) => return None,
        };
        let pow = 10i64.checked_pow(x.max(0) as u32).unwrap_or(i64::MAX);
        Some(Value::rational(v_l * pow + v_r, pow))
    }
}

fn compare_ord<T: PartialOrd + PartialEq>(a: T, b: T, op: ComparisonOpKind) -> bool {
    match op {
        ComparisonOpKind::Less => a < b,
        ComparisonOpKind::LessEqual => a <= b,
        ComparisonOpKind::Greater => a > b,
        ComparisonOpKind::GreaterEqual => a >= b,
        ComparisonOpKind::Equality | ComparisonOpKind::Identity => a == b,
        ComparisonOpKind::Nonequality => a != b,
    }
}

fn negate_rational(value: Value) -> Value {
    match value {
        Value::Rational {
            numerator,
            denominator,
        } => Value::Rational {
            numerator: -numerator,
            denominator,
        },
        other => other,
    }
}

fn reciprocal(numerator: i64, denominator: i64) -> RuntimeResult<Value> {
    Value::rational(denominator, numerator)
}

/// Body of `Rational::operator_<name>` / `reverse_operator_<name>`.
/// Returns `None` when `other` isn't a number (Integer or Rational).
fn rational_binary_checked(
    n: i64,
    d: i64,
    op: BinaryOpKind,
    other: &Value,
) -> Option<RuntimeResult<Value>> {
    let (on, od) = match other {
        Value::Rational {
            numerator,
            denominator,
        } => (*numerator, *denominator),
        Value::Integer { value, .. } => (*value, 1),
        _ => return None,
    };
    Some(match op {
        BinaryOpKind::Plus => Value::rational(n * od + on * d, d * od),
        BinaryOpKind::Minus => Value::rational(n * od - on * d, d * od),
        BinaryOpKind::Star => Value::rational(n * on, d * od),
        BinaryOpKind::Slash => Value::rational(n * od, d * on),
    })
}

/// Dispatches a binary operator using the full forward/reverse protocol:
/// try `left`'s handler, then `right`'s reverse handler.
pub fn apply_binary(left: &Value, op: BinaryOpKind, right: &Value) -> RuntimeResult<Value> {
    if let Some(result) = left.try_binary(op, right) {
        return result;
    }
    if let Some(result) = right.try_reverse_binary(op, left) {
        return result;
    }
    Err(RuntimeError::type_error(format!(
        "unsupported operand type(s) for {}: \"{}\" and \"{}\"",
        op.symbol(),
        left.type_tag(),
        right.type_tag()
    )))
}

/// Dispatches a comparison using the forward/back protocol.
pub fn apply_comparison(left: &Value, op: ComparisonOpKind, right: &Value) -> RuntimeResult<Value> {
    if let Some(result) = left.try_comparison(op, right) {
        return result;
    }
    let back = op.back();
    if let Some(result) = right.try_comparison(back, left) {
        return result;
    }
    Err(RuntimeError::type_error(format!(
        "unsupported operand type(s) for {}: \"{}\" and \"{}\"",
        op.symbol(),
        left.type_tag(),
        right.type_tag()
    )))
}

pub fn apply_unary(op: UnaryOpKind, operand: &Value) -> RuntimeResult<Value> {
    operand.try_unary_op(op).unwrap_or_else(|| {
        Err(RuntimeError::type_error(format!(
            "bad operand type for unary {}: \"{}\"",
            op.symbol(),
            operand.type_tag()
        )))
    })
}

pub fn apply_incdec(op: IncDecKind, operand: &Value) -> RuntimeResult<Value> {
    operand.try_incdec_op(op).unwrap_or_else(|| {
        Err(RuntimeError::type_error(format!(
            "bad operand type for {}: \"{}\"",
            op.symbol(),
            operand.type_tag()
        )))
    })
}

pub fn apply_compound(current: &Value, op: CompoundOpKind, rhs: &Value) -> RuntimeResult<Value> {
    current.try_compound(op, rhs).unwrap_or_else(|| {
        Err(RuntimeError::type_error(format!(
            "unsupported operand type(s) for {}=: \"{}\" and \"{}\"",
            op.symbol().trim_end_matches('='),
            current.type_tag(),
            rhs.type_tag()
        )))
    })
}

pub fn apply_dot(left: &Value, right: &DotOperand) -> RuntimeResult<Value> {
    left.try_dot(right).unwrap_or_else(|| {
        let right_desc = match right {
            DotOperand::Name(name) => name.clone(),
            DotOperand::Value(value) => value.type_tag().to_string(),
        };
        Err(RuntimeError::name(format!(
            "cannot get {right_desc} from {}",
            left.type_tag()
        )))
    })
}

/// Process-wide singletons. `once_cell` gives the one-time-initialized
/// shared statics; identity comparison (`is`) for these variants is
/// modelled as ordinary value equality since nothing here carries pointer
/// identity.
pub static TRUE: Lazy<Value> = Lazy::new(|| Value::Boolean(true));
pub static FALSE: Lazy<Value> = Lazy::new(|| Value::Boolean(false));
pub static NULL: Lazy<Value> = Lazy::new(|| Value::Null);
pub static UNDEFINED: Lazy<Value> = Lazy::new(|| Value::Undefined);

pub static TYPE_INT: Lazy<Value> = Lazy::new(|| Value::Type(TypeTag::Integer));
pub static TYPE_RATIONAL: Lazy<Value> = Lazy::new(|| Value::Type(TypeTag::Rational));
pub static TYPE_BOOL: Lazy<Value> = Lazy::new(|| Value::Type(TypeTag::Boolean));

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer { value, .. } => write!(f, "{value}"),
            Value::Rational {
                numerator,
                denominator,
            } => write!(f, "{numerator} / {denominator}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Type(tag) => write!(f, "{tag}"),
            Value::Function(handle) => write!(f, "<function {}>", handle.name),
        }
    }
}
