//! `nonlocal` marking and its interaction with digit-identifier shadowing.

use ratioscript::Value;

fn last(source: &str) -> Value {
    ratioscript::evaluate(source)
        .unwrap_or_else(|err| panic!("evaluating {source:?} failed: {err}"))
        .into_iter()
        .last()
        .expect("at least one statement")
}

#[test]
fn nonlocal_makes_an_inner_assignment_visible_outside() {
    assert_eq!(last("int x = 0; { nonlocal x; x = 5; } x;"), Value::integer(5));
}

#[test]
fn without_nonlocal_an_inner_name_declaration_shadows_instead_of_writing_through() {
    assert_eq!(last("int x = 0; { int x = 5; } x;"), Value::integer(0));
}

#[test]
fn nonlocal_on_a_digit_identifier_with_no_outer_binding_is_a_name_error() {
    // `nonlocal` means "skip the top frame and search outward" — with no
    // outer frame declaring "7", that search comes up empty rather than
    // falling back to the digit-literal rule (which only applies when the
    // top frame itself has no entry for the name at all).
    let err = ratioscript::evaluate("{ nonlocal 7; 7; }").unwrap_err();
    assert!(err.to_string().starts_with("NameError"));
}

#[test]
fn nonlocal_digit_identifier_reads_through_to_the_outer_variable() {
    assert_eq!(last("int 3 = 0; int x; { nonlocal 3; x = 3; } x;"), Value::integer(0));
}
