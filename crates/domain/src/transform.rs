//! Dynamic test-value transformation.
//!
//! A step fills a payload field with a *token* rather than a literal value.
//! The token optionally starts with a length prefix (`"<N>."`) and the rest
//! names a rule that produces edge-case data:
//!
//! | token              | value                                        |
//! |--------------------|----------------------------------------------|
//! | `""`               | `" "`                                        |
//! | `"0"`              | `0`                                          |
//! | `"null"`           | `null`                                       |
//! | `"negativeNumber"` | a random negative integer                    |
//! | `"decimalNumber"`  | a decimal in `[1, 9999)`, 1 to 3 places      |
//! | `"N.numbers"`      | an integer of `N` random digits              |
//! | `"N.stringNumbers"`| a string of `N` random digits                |
//! | `"N.specialString"`| `N` random punctuation/letters/digits/accents|
//! | `"true"`/`"false"` | booleans                                     |
//!
//! Anything else is passed through unchanged, as is a token whose length
//! prefix exceeds [`MAX_TOKEN_LENGTH`].

use std::sync::LazyLock;

use rand::Rng;
use serde_json::{Number, Value};

const SPECIAL_CHARACTERS: &str = "!@#$%¨&*()-_=+[]{}^~´`<>,.;:/?|\"'";
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const ACCENTED_LETTERS: &str = "áàãâéêíóôõúüçÁÀÃÂÉÊÍÓÔÕÚÜÇ";

/// Largest digit count that always fits an `i64`.
const MAX_INTEGER_DIGITS: usize = 18;

/// Largest accepted length prefix. Longer prefixes make the token a literal.
pub const MAX_TOKEN_LENGTH: usize = 10_000;

static SPECIAL_ALPHABET: LazyLock<Vec<char>> = LazyLock::new(|| {
    [SPECIAL_CHARACTERS, LETTERS, DIGITS, ACCENTED_LETTERS]
        .iter()
        .flat_map(|set| set.chars())
        .collect()
});

/// Returns every character `specialString` may draw from.
#[must_use]
pub fn special_alphabet() -> &'static [char] {
    &SPECIAL_ALPHABET
}

/// The rule selected by the part of a token after the length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRule {
    /// `""`: a single space.
    Blank,
    /// `"0"`: integer zero.
    Zero,
    /// `"null"`: JSON null.
    Null,
    /// `"negativeNumber"`
    NegativeNumber,
    /// `"decimalNumber"`
    DecimalNumber,
    /// `"numbers"`: integer of `length` digits.
    Numbers,
    /// `"stringNumbers"`: digit string of `length` characters.
    StringNumbers,
    /// `"specialString"`: mixed-character string of `length` characters.
    SpecialString,
    /// `"false"`
    False,
    /// `"true"`
    True,
    /// Unrecognized token, returned as written.
    Literal(String),
}

impl TransformRule {
    fn from_name(name: &str) -> Option<Self> {
        let rule = match name {
            "" => Self::Blank,
            "0" => Self::Zero,
            "null" => Self::Null,
            "negativeNumber" => Self::NegativeNumber,
            "decimalNumber" => Self::DecimalNumber,
            "numbers" => Self::Numbers,
            "stringNumbers" => Self::StringNumbers,
            "specialString" => Self::SpecialString,
            "false" => Self::False,
            "true" => Self::True,
            _ => return None,
        };
        Some(rule)
    }
}

/// A parsed token: the optional length prefix and the selected rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Length prefix, 0 when the token has none.
    pub length: usize,
    /// Rule that produces the value.
    pub rule: TransformRule,
}

impl Token {
    /// Parses a token.
    ///
    /// Only the first `.` separates the length from the rule name. A prefix
    /// that is not a non-negative integer, or a rule name that is not
    /// recognized, makes the whole token a [`TransformRule::Literal`].
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let (length, name) = match token.split_once('.') {
            Some((prefix, rest)) => match prefix.parse::<usize>() {
                Ok(length) if length <= MAX_TOKEN_LENGTH => (length, rest),
                _ => return Self::literal(token),
            },
            None => (0, token),
        };

        TransformRule::from_name(name).map_or_else(
            || Self::literal(token),
            |rule| Self { length, rule },
        )
    }

    fn literal(token: &str) -> Self {
        Self {
            length: 0,
            rule: TransformRule::Literal(token.to_string()),
        }
    }

    /// Produces the value for this token using `rng` for the random rules.
    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R) -> Value {
        match &self.rule {
            TransformRule::Blank => Value::String(" ".to_string()),
            TransformRule::Zero => Value::from(0),
            TransformRule::Null => Value::Null,
            TransformRule::NegativeNumber => {
                Value::from(rng.random_range(i64::from(i32::MIN)..0))
            }
            TransformRule::DecimalNumber => decimal_number(rng),
            TransformRule::Numbers => {
                let digits = random_digits(rng, self.length.min(MAX_INTEGER_DIGITS));
                Value::from(digits.parse::<i64>().unwrap_or(0))
            }
            TransformRule::StringNumbers => Value::String(random_digits(rng, self.length)),
            TransformRule::SpecialString => Value::String(special_string(rng, self.length)),
            TransformRule::False => Value::Bool(false),
            TransformRule::True => Value::Bool(true),
            TransformRule::Literal(original) => Value::String(original.clone()),
        }
    }
}

/// Transforms a token into a test value using the thread-local CSPRNG.
#[must_use]
pub fn transform(token: &str) -> Value {
    transform_with(token, &mut rand::rng())
}

/// Transforms a token into a test value using the given random source.
pub fn transform_with<R: Rng + ?Sized>(token: &str, rng: &mut R) -> Value {
    Token::parse(token).apply(rng)
}

fn random_digits<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn special_string<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let alphabet = special_alphabet();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

fn decimal_number<R: Rng + ?Sized>(rng: &mut R) -> Value {
    let places = rng.random_range(1..=3);
    let factor = 10f64.powi(places);
    let value = (rng.random_range(1.0..9999.0) * factor).floor() / factor;
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use regex::Regex;
    use serde_json::json;

    #[test]
    fn test_fixed_rules() {
        assert_eq!(transform(""), json!(" "));
        assert_eq!(transform("0"), json!(0));
        assert_eq!(transform("null"), Value::Null);
        assert_eq!(transform("true"), json!(true));
        assert_eq!(transform("false"), json!(false));
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(transform("Maria"), json!("Maria"));
        assert_eq!(transform("1.5"), json!("1.5"));
        assert_eq!(transform("abc.numbers"), json!("abc.numbers"));
        assert_eq!(transform("user@mail.com"), json!("user@mail.com"));
    }

    #[test]
    fn test_length_rules_without_prefix_are_empty() {
        assert_eq!(transform("numbers"), json!(0));
        assert_eq!(transform("stringNumbers"), json!(""));
        assert_eq!(transform("specialString"), json!(""));
    }

    #[test]
    fn test_string_numbers_keep_exact_length() {
        let pattern = Regex::new(r"^\d{3}$").unwrap();
        for _ in 0..50 {
            let value = transform("3.stringNumbers");
            let text = value.as_str().unwrap();
            assert!(pattern.is_match(text), "unexpected value {text}");
        }
    }

    #[test]
    fn test_string_numbers_can_start_with_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen_leading_zero = (0..500)
            .filter_map(|_| transform_with("2.stringNumbers", &mut rng).as_str().map(str::to_owned))
            .any(|s| s.starts_with('0'));
        assert!(seen_leading_zero);
    }

    #[test]
    fn test_numbers_is_integer_within_digit_count() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let value = transform_with("4.numbers", &mut rng);
            let number = value.as_i64().unwrap();
            assert!((0..10_000).contains(&number));
        }
    }

    #[test]
    fn test_numbers_clamps_to_i64_range() {
        let value = transform("40.numbers");
        assert!(value.as_i64().is_some());
    }

    #[test]
    fn test_special_string_alphabet_and_length() {
        let value = transform("5.specialString");
        let text = value.as_str().unwrap();
        assert_eq!(text.chars().count(), 5);
        assert!(text.chars().all(|c| special_alphabet().contains(&c)));
    }

    #[test]
    fn test_oversized_length_prefix_is_literal() {
        assert_eq!(
            transform("99999999999.specialString"),
            json!("99999999999.specialString")
        );
        let limit = format!("{MAX_TOKEN_LENGTH}.stringNumbers");
        assert_eq!(
            transform(&limit).as_str().map(str::len),
            Some(MAX_TOKEN_LENGTH)
        );
        let over = format!("{}.stringNumbers", MAX_TOKEN_LENGTH + 1);
        assert_eq!(transform(&over), json!(over));
    }

    #[test]
    fn test_special_string_is_not_deterministic() {
        let first = transform("32.specialString");
        let second = transform("32.specialString");
        assert_ne!(first, second);
    }

    #[test]
    fn test_negative_number() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(transform_with("negativeNumber", &mut rng).as_i64().unwrap() < 0);
        }
    }

    #[test]
    fn test_decimal_number_range_and_places() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let value = transform_with("decimalNumber", &mut rng).as_f64().unwrap();
            assert!((1.0..9999.0).contains(&value));
            let places = value
                .to_string()
                .split_once('.')
                .map_or(0, |(_, fraction)| fraction.len());
            assert!(places <= 3, "too many places in {value}");
        }
    }

    #[test]
    fn test_token_parse() {
        assert_eq!(
            Token::parse("12.stringNumbers"),
            Token {
                length: 12,
                rule: TransformRule::StringNumbers
            }
        );
        assert_eq!(
            Token::parse("decimalNumber"),
            Token {
                length: 0,
                rule: TransformRule::DecimalNumber
            }
        );
        assert_eq!(
            Token::parse("-1.numbers").rule,
            TransformRule::Literal("-1.numbers".to_string())
        );
    }
}
