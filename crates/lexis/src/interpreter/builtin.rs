//! Comparison placeholders available to every template that opts in.
//!
//! Each takes four arguments: `<if_eq:left:right:then:else>`. String
//! comparisons compare the raw argument text. Numeric comparisons parse both
//! operands as arbitrary-precision decimals, without trimming; an operand that
//! does not parse makes the comparison false.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use bigdecimal::BigDecimal;

use crate::interpreter::placeholder::Placeholder;
use crate::interpreter::resolver::Resolver;

static BUILTIN: LazyLock<Resolver> = LazyLock::new(|| Resolver::of(placeholders()));

pub(crate) fn resolver() -> Resolver {
    BUILTIN.clone()
}

pub(crate) fn placeholders() -> Vec<Placeholder> {
    vec![
        Placeholder::comparison("if_eq", |left, right| left == right),
        Placeholder::comparison("if_ne", |left, right| left != right),
        Placeholder::comparison("if_neq", |left, right| left != right),
        numeric("if_num_eq", Ordering::is_eq),
        numeric("if_num_ne", Ordering::is_ne),
        numeric("if_num_neq", Ordering::is_ne),
        numeric("if_num_lt", Ordering::is_lt),
        numeric("if_num_gt", Ordering::is_gt),
        numeric("if_num_le", Ordering::is_le),
        numeric("if_num_ge", Ordering::is_ge),
    ]
}

fn numeric(key: &str, test: fn(Ordering) -> bool) -> Placeholder {
    Placeholder::comparison(key, move |left, right| {
        compare_numbers(left, right).is_some_and(test)
    })
}

fn compare_numbers(left: &str, right: &str) -> Option<Ordering> {
    let left = BigDecimal::from_str(left).ok()?;
    let right = BigDecimal::from_str(right).ok()?;
    Some(left.cmp(&right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compares_decimal_text() {
        assert_eq!(compare_numbers("2", "10"), Some(Ordering::Less));
        assert_eq!(compare_numbers("1.50", "1.5"), Some(Ordering::Equal));
        assert_eq!(compare_numbers("3", "-3"), Some(Ordering::Greater));
        assert_eq!(compare_numbers("1e2", "100"), Some(Ordering::Equal));
    }

    #[test]
    fn test_large_integers_keep_full_precision() {
        assert_eq!(
            compare_numbers("9007199254740993", "9007199254740992"),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_numbers("0.10000000000000000001", "0.1"),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_unparsable_operand_has_no_order() {
        assert_eq!(compare_numbers("two", "2"), None);
        assert_eq!(compare_numbers("NaN", "NaN"), None);
        assert_eq!(compare_numbers("inf", "infinity"), None);
        assert_eq!(compare_numbers(" 3 ", "3"), None);
    }
}
