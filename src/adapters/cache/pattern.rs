//! Glob matching for pattern invalidation.
//!
//! `*` matches any run of characters (including none), `?` matches exactly
//! one character and `\` makes the character after it literal. Everything
//! else matches itself. This is the subset of Redis `MATCH` syntax the cache
//! layer emits; brackets only ever reach here escaped.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Star,
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '*' => Token::Star,
            '?' => Token::AnyOne,
            // A trailing lone backslash stands for itself.
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        });
    }
    tokens
}

/// Returns whether `key` matches the glob `pattern`.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let pattern = tokenize(pattern);
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some(Token::Star) => {
                backtrack = Some((p, k));
                p += 1;
            }
            Some(Token::AnyOne) => {
                p += 1;
                k += 1;
            }
            Some(Token::Literal(c)) if *c == key[k] => {
                p += 1;
                k += 1;
            }
            _ => match backtrack {
                Some((star, tried)) => {
                    p = star + 1;
                    k = tried + 1;
                    backtrack = Some((star, tried + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|t| *t == Token::Star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::escape_glob;
    use proptest::prelude::*;

    #[test]
    fn star_suffix_matches_prefix() {
        assert!(glob_match("course:*", "course:c-1"));
        assert!(glob_match("course:*", "course:"));
        assert!(!glob_match("course:*", "courses:c-1"));
        assert!(!glob_match("course:*", "lesson:course:c-1"));
    }

    #[test]
    fn entity_id_pattern_matches_any_scope_in_between() {
        assert!(glob_match("course:*:c-1", "course:get:c-1"));
        assert!(glob_match("course:*:c-1", "course:list:t-1:c-1"));
        assert!(!glob_match("course:*:c-1", "course:get:c-10"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(glob_match("lesson:?", "lesson:1"));
        assert!(!glob_match("lesson:?", "lesson:12"));
        assert!(!glob_match("lesson:?", "lesson:"));
    }

    #[test]
    fn literal_pattern_matches_exactly() {
        assert!(glob_match("a:b", "a:b"));
        assert!(!glob_match("a:b", "a:bc"));
        assert!(glob_match("", ""));
        assert!(!glob_match("", "x"));
        assert!(glob_match("*", ""));
    }

    #[test]
    fn escaped_specials_match_only_themselves() {
        assert!(glob_match(r"course:*:c\[1\]", "course:get:c[1]"));
        assert!(!glob_match(r"course:*:c\[1\]", "course:get:c1"));
        assert!(glob_match(r"a\*", "a*"));
        assert!(!glob_match(r"a\*", "ab"));
        assert!(glob_match(r"a\?", "a?"));
        assert!(!glob_match(r"a\?", "ab"));
        assert!(glob_match(r"a\\b", r"a\b"));
    }

    #[test]
    fn trailing_backslash_is_literal() {
        assert!(glob_match("a\\", "a\\"));
        assert!(!glob_match("a\\", "a"));
    }

    proptest! {
        #[test]
        fn prefix_star_matches_every_extension(prefix in "[a-z:]{0,12}", rest in "[a-z0-9:]{0,12}") {
            let pattern = format!("{}*", prefix);
            let key = format!("{}{}", prefix, rest);
            prop_assert!(glob_match(&pattern, &key));
        }

        #[test]
        fn literal_pattern_is_equality(a in "[a-z:]{0,8}", b in "[a-z:]{0,8}") {
            prop_assert_eq!(glob_match(&a, &b), a == b);
        }

        #[test]
        fn escaped_literal_matches_only_itself(a in r"[a-c*?\\\[\]]{0,8}", b in r"[a-c*?\\\[\]]{0,8}") {
            prop_assert_eq!(glob_match(&escape_glob(&a), &b), a == b);
        }

        #[test]
        fn lone_star_matches_anything(key in "\\PC{0,24}") {
            prop_assert!(glob_match("*", &key));
        }
    }
}
