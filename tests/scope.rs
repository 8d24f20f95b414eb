//! Lexical scoping: shadowing, scope balance across errors, and `const`.

use ratioscript::Value;

fn last(source: &str) -> Value {
    ratioscript::evaluate(source)
        .unwrap_or_else(|err| panic!("evaluating {source:?} failed: {err}"))
        .into_iter()
        .last()
        .expect("at least one statement")
}

#[test]
fn inner_declaration_shadows_outer_of_the_same_name() {
    assert_eq!(last("int x = 1; { int x = 2; } x;"), Value::integer(1));
}

#[test]
fn inner_block_can_read_and_mutate_an_outer_variable() {
    assert_eq!(last("int x = 1; { x = x + 1; } x;"), Value::integer(2));
}

#[test]
fn a_name_undeclared_anywhere_is_a_name_error() {
    let err = ratioscript::evaluate("never_declared;").unwrap_err();
    assert!(err.to_string().starts_with("NameError"));
}

#[test]
fn const_cannot_be_reassigned() {
    let err = ratioscript::evaluate("const int x = 1; x = 2;").unwrap_err();
    assert!(err.to_string().starts_with("NameError"));
}

#[test]
fn declaring_with_a_non_type_name_is_a_type_error() {
    // `y` is a variable, not a type, so it can't head a declaration.
    let err = ratioscript::evaluate("int y = 1; y x = 2;").unwrap_err();
    assert!(err.to_string().starts_with("TypeError"));
}

#[test]
fn a_declared_type_is_not_checked_against_the_initializer_at_declaration_time() {
    // Declaration only validates that the *type name* resolves to a Type;
    // the slot's value can still mismatch until the next `set`.
    assert_eq!(last("int x = 1 / 2; x;"), Value::rational(1, 2).unwrap());
}

#[test]
fn auto_without_an_initializer_is_rejected_at_parse_time() {
    let err = ratioscript::evaluate("auto x;").unwrap_err();
    assert!(matches!(err, ratioscript::RuntimeError::Syntax { .. }));
}

#[test]
fn frames_balance_after_a_runtime_error_inside_a_block() {
    // Can't observe depth() through the public `evaluate` API directly, but
    // a variable declared inside a failing block must not survive it.
    let err = ratioscript::evaluate("{ int x = 1 / 0; } x;").unwrap_err();
    assert!(err.to_string().starts_with("ZeroDivisionError"));
}
