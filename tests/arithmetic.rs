//! Integer and mixed-type arithmetic, including the forward/reverse
//! operator-handler dispatch protocol.

use ratioscript::Value;

fn last(source: &str) -> Value {
    ratioscript::evaluate(source)
        .unwrap_or_else(|err| panic!("evaluating {source:?} failed: {err}"))
        .into_iter()
        .last()
        .expect("at least one statement")
}

#[test]
fn integer_addition_stays_integer() {
    assert_eq!(last("41 + 1;"), Value::integer(42));
}

#[test]
fn integer_subtraction_can_go_negative() {
    assert_eq!(last("3 - 10;"), Value::integer(-7));
}

#[test]
fn integer_division_always_yields_rational() {
    assert_eq!(last("10 / 2;"), Value::rational(5, 1).unwrap());
    assert_eq!(last("22 / 7;"), Value::rational(22, 7).unwrap());
}

#[test]
fn integer_minus_rational_uses_reverse_handler() {
    // Integer has no handler for `Integer - Rational`; Rational's reverse
    // handler picks it up as -(rational - integer).
    assert_eq!(last("2 - (1 / 2);"), Value::rational(3, 2).unwrap());
}

#[test]
fn rational_times_integer_and_integer_times_rational_agree() {
    assert_eq!(last("(1 / 2) * 4;"), last("4 * (1 / 2);"));
}

#[test]
fn unary_minus_on_integer() {
    assert_eq!(last("-5;"), Value::integer(-5));
}

#[test]
fn postfix_increment_and_decrement() {
    assert_eq!(last("int x = 1; x++; x;"), Value::integer(2));
    assert_eq!(last("int x = 1; x--; x;"), Value::integer(0));
}

#[test]
fn compound_plus_assign_on_integer() {
    assert_eq!(last("int x = 10; x += 5; x;"), Value::integer(15));
}
