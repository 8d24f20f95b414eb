//! Operator kinds and the handler-name table used for method dispatch.

use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpKind {
    Plus,
    Minus,
    Star,
    Slash,
}

impl BinaryOpKind {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOpKind::Plus => "plus",
            BinaryOpKind::Minus => "minus",
            BinaryOpKind::Star => "star",
            BinaryOpKind::Slash => "slash",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOpKind::Plus => "+",
            BinaryOpKind::Minus => "-",
            BinaryOpKind::Star => "*",
            BinaryOpKind::Slash => "/",
        }
    }
}

impl Display for BinaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOpKind {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equality,
    Nonequality,
    Identity,
}

impl ComparisonOpKind {
    pub fn name(self) -> &'static str {
        match self {
            ComparisonOpKind::Less => "less",
            ComparisonOpKind::LessEqual => "less_equal",
            ComparisonOpKind::Greater => "greater",
            ComparisonOpKind::GreaterEqual => "greater_equal",
            ComparisonOpKind::Equality => "equality",
            ComparisonOpKind::Nonequality => "nonequality",
            ComparisonOpKind::Identity => "identity",
        }
    }

    /// The operator tried on the right operand, with operands swapped, if
    /// the left operand has no matching handler: `a < b` falls back to
    /// `b > a`.
    pub fn back(self) -> ComparisonOpKind {
        match self {
            ComparisonOpKind::Less => ComparisonOpKind::Greater,
            ComparisonOpKind::LessEqual => ComparisonOpKind::GreaterEqual,
            ComparisonOpKind::Greater => ComparisonOpKind::Less,
            ComparisonOpKind::GreaterEqual => ComparisonOpKind::LessEqual,
            ComparisonOpKind::Equality => ComparisonOpKind::Equality,
            ComparisonOpKind::Nonequality => ComparisonOpKind::Nonequality,
            ComparisonOpKind::Identity => ComparisonOpKind::Identity,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOpKind::Less => "<",
            ComparisonOpKind::LessEqual => "<=",
            ComparisonOpKind::Greater => ">",
            ComparisonOpKind::GreaterEqual => ">=",
            ComparisonOpKind::Equality => "==",
            ComparisonOpKind::Nonequality => "!=",
            ComparisonOpKind::Identity => "is",
        }
    }
}

impl Display for ComparisonOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Plus,
    Minus,
}

impl UnaryOpKind {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOpKind::Plus => "plus",
            UnaryOpKind::Minus => "minus",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOpKind::Plus => "+",
            UnaryOpKind::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecKind {
    Increment,
    Decrement,
}

impl IncDecKind {
    pub fn name(self) -> &'static str {
        match self {
            IncDecKind::Increment => "increment",
            IncDecKind::Decrement => "decrement",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            IncDecKind::Increment => "++",
            IncDecKind::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOpKind {
    Plus,
    Minus,
    Star,
    Slash,
}

impl CompoundOpKind {
    pub fn name(self) -> &'static str {
        match self {
            CompoundOpKind::Plus => "plus",
            CompoundOpKind::Minus => "minus",
            CompoundOpKind::Star => "star",
            CompoundOpKind::Slash => "slash",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompoundOpKind::Plus => "+=",
            CompoundOpKind::Minus => "-=",
            CompoundOpKind::Star => "*=",
            CompoundOpKind::Slash => "/=",
        }
    }
}
