/// Strict rules: ASCII atext plus '.', never leading, trailing or doubled.
pub(crate) fn is_local_strict(s: &str) -> bool {
    if s.starts_with('.') || s.ends_with('.') || s.contains("..") {
        return false;
    }
    s.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '!' | '#'
                    | '$'
                    | '%'
                    | '&'
                    | '\''
                    | '*'
                    | '+'
                    | '-'
                    | '/'
                    | '='
                    | '?'
                    | '^'
                    | '_'
                    | '`'
                    | '{'
                    | '|'
                    | '}'
                    | '~'
                    | '.'
            )
    })
}

/// Relaxed rules: a quoted string of printable ASCII is also accepted,
/// otherwise falls back to [`is_local_strict`].
pub(crate) fn is_local_relaxed(s: &str) -> bool {
    match s.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) if s.len() >= 2 => is_quoted_content(inner),
        _ => is_local_strict(s),
    }
}

fn is_quoted_content(inner: &str) -> bool {
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) if escaped == ' ' || escaped.is_ascii_graphic() => {}
                _ => return false,
            },
            '"' => return false,
            c if c == ' ' || c.is_ascii_graphic() => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_dots() {
        assert!(!is_local_strict(".abc"));
        assert!(!is_local_strict("abc."));
        assert!(!is_local_strict("a..b"));
        assert!(is_local_strict("a.b"));
    }

    #[test]
    fn strict_rejects_space_and_quotes() {
        assert!(!is_local_strict("a b"));
        assert!(!is_local_strict("\"ab\""));
    }

    #[test]
    fn relaxed_quoted() {
        assert!(is_local_relaxed("\"a b\""));
        assert!(is_local_relaxed("\"a\\\"b\""));
    }

    #[test]
    fn relaxed_rejects_unescaped_quote_and_controls() {
        assert!(!is_local_relaxed("\"a\"b\""));
        assert!(!is_local_relaxed("\"a\tb\""));
        assert!(!is_local_relaxed("\"abc\\\""));
    }
}
