//! Rational reduction and the ordering/equality comparison protocol.

use ratioscript::Value;

fn last(source: &str) -> Value {
    ratioscript::evaluate(source)
        .unwrap_or_else(|err| panic!("evaluating {source:?} failed: {err}"))
        .into_iter()
        .last()
        .expect("at least one statement")
}

#[test]
fn rational_addition_reduces_to_lowest_terms() {
    // (1/4) + (1/4) = 2/4, reduced to 1/2.
    assert_eq!(last("(1 / 4) + (1 / 4);"), Value::rational(1, 2).unwrap());
}

#[test]
fn negative_denominator_is_normalized_to_the_numerator() {
    // 1 / -2 should come out as Rational(-1, 2), never Rational(1, -2).
    assert_eq!(last("1 / -2;"), Value::rational(-1, 2).unwrap());
}

#[test]
fn rational_increment_and_decrement() {
    assert_eq!(last("rational x = 1 / 2; x++; x;"), Value::rational(3, 2).unwrap());
    assert_eq!(last("rational x = 1 / 2; x--; x;"), Value::rational(-1, 2).unwrap());
}

#[test]
fn comparison_between_integer_and_rational() {
    assert_eq!(last("3 < (7 / 2);"), Value::boolean(true));
    assert_eq!(last("(7 / 2) > 3;"), Value::boolean(true));
    assert_eq!(last("(6 / 2) == 3;"), Value::boolean(true));
}

#[test]
fn comparison_reversibility_holds_for_less_and_less_equal() {
    assert_eq!(last("3 < (7 / 2);"), last("(7 / 2) > 3;"));
    assert_eq!(last("(7 / 2) <= (7 / 2);"), last("(7 / 2) >= (7 / 2);"));
}

#[test]
fn zero_division_from_a_rational_literal() {
    let err = ratioscript::evaluate("1 / (2 - 2);").unwrap_err();
    assert!(err.to_string().starts_with("ZeroDivisionError"));
}
