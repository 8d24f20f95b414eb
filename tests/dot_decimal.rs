//! The dot operator's decimal-literal reconstruction, and the distinction
//! between a bare-identifier right operand vs. an evaluated one.

use ratioscript::Value;

fn last(source: &str) -> Value {
    ratioscript::evaluate(source)
        .unwrap_or_else(|err| panic!("evaluating {source:?} failed: {err}"))
        .into_iter()
        .last()
        .expect("at least one statement")
}

#[test]
fn one_point_five() {
    assert_eq!(last("1.5;"), Value::rational(3, 2).unwrap());
}

#[test]
fn three_point_one_four() {
    assert_eq!(last("3.14;"), Value::rational(157, 50).unwrap());
}

#[test]
fn a_leading_zero_in_the_fractional_part_is_significant() {
    // .05 is five hundredths, not five tenths: the leading zero in "05"
    // shifts the decimal point by one more place.
    assert_eq!(last("1.05;"), Value::rational(105, 100).unwrap());
}

#[test]
fn dot_on_a_variable_holding_an_integer_uses_the_name_form() {
    assert_eq!(last("int whole = 3; whole.14;"), Value::rational(157, 50).unwrap());
}

#[test]
fn dot_is_left_associative() {
    // `1.2.3` parses as `(1.2).3`; evaluating the left dot first yields a
    // Rational, and Rational has no dot handler.
    let err = ratioscript::evaluate("1.2.3;").unwrap_err();
    assert!(err.to_string().starts_with("NameError"));
}
