//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern matching any word of the search input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Builds a [`FuzzPattern`] out of the given search `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "({})",
            input.split_ascii_whitespace().format_with("|", |word, f| {
                f(&format_args!("%{}%", escaped(word)))
            }),
        ))
    }
}

/// Escapes `SIMILAR TO` metacharacters in the given word.
fn escaped(word: &str) -> String {
    word.chars()
        .fold(String::with_capacity(word.len()), |mut out, c| {
            if matches!(
                c,
                '\\' | '%'
                    | '|'
                    | '*'
                    | '+'
                    | '?'
                    | '{'
                    | '}'
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '_'
            ) {
                out.push('\\');
            }
            out.push(c);
            out
        })
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn alternates_words_and_escapes_metacharacters() {
        assert_eq!(
            FuzzPattern::new("gan yavne 12").to_string(),
            "(%gan%|%yavne%|%12%)",
        );
        assert_eq!(FuzzPattern::new("50%").to_string(), r"(%50\%%)");
    }
}
