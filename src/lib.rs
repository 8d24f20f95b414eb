//! A small interpreter for a C-like expression/statement language with
//! exact rational arithmetic, scoped lexical environments, and operator
//! dispatch driven by per-value handler methods.
//!
//! ```
//! use ratioscript::evaluate;
//!
//! let values = evaluate("1 + 2;").unwrap();
//! assert_eq!(values.len(), 1);
//! ```

pub mod ast;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod util;
pub mod value;

use std::sync::Mutex;

use once_cell::sync::Lazy;

pub use env::Context;
pub use error::{RuntimeError, RuntimeResult};
pub use parser::Parser;
pub use value::Value;

/// Tokenizes, parses, and evaluates `source` against a fresh `Context`,
/// returning one value per top-level statement.
pub fn evaluate(source: &str) -> RuntimeResult<Vec<Value>> {
    let mut parser = Parser::from_source(source)?;
    let program = parser.parse_program()?;
    evaluator::evaluate(&program, parser.context_mut())
}

/// Process-wide default parser: its `Context` persists across calls, so
/// later calls see declarations made by earlier ones — intended for
/// REPL-style incremental evaluation.
static DEFAULT_PARSER: Lazy<Mutex<Parser>> = Lazy::new(|| Mutex::new(Parser::new(vec![])));

/// Tokenizes, parses, and evaluates `source` against the shared default
/// parser's persistent context.
pub fn run_default(source: &str) -> RuntimeResult<Vec<Value>> {
    let mut guard = DEFAULT_PARSER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.reset_source(source)?;
    let program = guard.parse_program()?;
    evaluator::evaluate(&program, guard.context_mut())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_returns_one_value_per_statement() {
        let values = evaluate("1 + 2; 3 + 4;").unwrap();
        assert_eq!(values, vec![Value::integer(3), Value::integer(7)]);
    }

    #[test]
    fn run_default_persists_context_across_calls() {
        run_default("int lib_counter = 1;").unwrap();
        let values = run_default("lib_counter = lib_counter + 1; lib_counter;").unwrap();
        assert_eq!(values.last(), Some(&Value::integer(2)));
    }
}
