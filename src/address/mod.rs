//! Address syntax checks (simplified RFC 5322 `addr-spec`).

mod domain;
mod local;
mod types;

pub use types::{EmailAddress, InvalidSyntax, ValidationMode, ValidationReport};

use domain::check_domain;
use local::{is_local_relaxed, is_local_strict};

pub fn validate_email(email: &str, mode: ValidationMode) -> ValidationReport {
    let (report, _) = inspect(email, mode);
    report
}

/// Validates `email` and splits it into an [`EmailAddress`].
pub fn parse_address(email: &str, mode: ValidationMode) -> Result<EmailAddress, InvalidSyntax> {
    match inspect(email, mode) {
        (report, Some(address)) if report.ok => Ok(address),
        (report, _) => Err(InvalidSyntax {
            input: email.to_string(),
            reasons: report.reasons,
        }),
    }
}

fn inspect(email: &str, mode: ValidationMode) -> (ValidationReport, Option<EmailAddress>) {
    let input = email.trim();
    let mut reasons = Vec::new();

    let Some((local, domain)) = split_once_at(input) else {
        reasons.push("must contain exactly one '@'".to_string());
        return (ValidationReport { ok: false, reasons }, None);
    };

    if input.len() > 254 {
        reasons.push(format!("total length {} > 254", input.len()));
    }

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    }

    let ascii_domain = check_domain(domain, &mut reasons);

    let local_ok = match mode {
        ValidationMode::Strict => is_local_strict(local),
        ValidationMode::Relaxed => is_local_relaxed(local),
    };
    if !local_ok {
        reasons.push(match mode {
            ValidationMode::Strict => "invalid local part (strict rules)".into(),
            ValidationMode::Relaxed => "invalid local part (relaxed rules)".into(),
        });
    }

    let ok = reasons.is_empty();
    let address = ascii_domain
        .filter(|_| ok)
        .map(|ascii| EmailAddress::new(local, domain, ascii));
    (ValidationReport { ok, reasons }, address)
}

fn split_once_at(input: &str) -> Option<(&str, &str)> {
    if input.matches('@').count() != 1 {
        return None;
    }
    input.split_once('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = validate_email("alice@example.com", ValidationMode::Strict);
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn rejects_double_at() {
        let r = validate_email("a@@b.com", ValidationMode::Strict);
        assert!(!r.ok);
        assert_eq!(r.reasons, vec!["must contain exactly one '@'".to_string()]);
    }

    #[test]
    fn parse_splits_local_and_domain() {
        let address = parse_address("  Alice.B@Exämple.com ", ValidationMode::Strict)
            .expect("valid address");
        assert_eq!(address.local(), "Alice.B");
        assert_eq!(address.domain(), "Exämple.com");
        assert_eq!(address.ascii_domain(), "xn--exmple-cua.com");
        assert_eq!(address.to_ascii(), "Alice.B@xn--exmple-cua.com");
        assert_eq!(address.to_string(), "Alice.B@Exämple.com");
    }

    #[test]
    fn not_an_email_is_invalid_syntax() {
        let err = parse_address("not-an-email", ValidationMode::Strict).expect_err("no '@'");
        assert_eq!(err.input, "not-an-email");
        assert!(err.reasons[0].contains("exactly one '@'"));
    }

    #[test]
    fn empty_parts_rejected() {
        assert!(parse_address("@example.com", ValidationMode::Strict).is_err());
        assert!(parse_address("user@", ValidationMode::Strict).is_err());
    }

    #[test]
    fn domain_without_dot_rejected() {
        let err = parse_address("user@localhost", ValidationMode::Strict).expect_err("dotless");
        assert!(err.reasons.iter().any(|r| r.contains("at least one dot")));
    }

    #[test]
    fn quoted_local_only_in_relaxed_mode() {
        assert!(parse_address("\"john doe\"@example.com", ValidationMode::Strict).is_err());
        let address = parse_address("\"john doe\"@example.com", ValidationMode::Relaxed)
            .expect("relaxed accepts quoted local part");
        assert_eq!(address.local(), "\"john doe\"");
    }

    #[test]
    fn from_str_uses_strict_mode() {
        let address: EmailAddress = "bob@example.org".parse().expect("parse");
        assert_eq!(address.ascii_domain(), "example.org");
        assert!("bob smith@example.org".parse::<EmailAddress>().is_err());
    }

    #[test]
    fn overlong_local_part_rejected() {
        let input = format!("{}@example.com", "a".repeat(65));
        let err = parse_address(&input, ValidationMode::Strict).expect_err("too long");
        assert!(err.reasons.iter().any(|r| r.contains("local part length 65")));
    }

    proptest! {
        #[test]
        fn strings_without_exactly_one_at_are_rejected(
            s in "[a-z.@]{0,24}".prop_filter("at-count != 1", |s| s.matches('@').count() != 1)
        ) {
            prop_assert!(parse_address(&s, ValidationMode::Strict).is_err());
            prop_assert!(parse_address(&s, ValidationMode::Relaxed).is_err());
        }

        #[test]
        fn simple_addresses_round_trip_their_parts(
            local in "[a-z0-9]{1,20}",
            label in "[a-z0-9]{1,20}",
        ) {
            let input = format!("{local}@{label}.com");
            let address = parse_address(&input, ValidationMode::Strict).expect("valid");
            prop_assert_eq!(address.local(), local.as_str());
            prop_assert_eq!(address.ascii_domain(), format!("{label}.com"));
        }
    }
}
