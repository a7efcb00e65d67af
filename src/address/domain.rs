/// IDNA conversion plus label checks. Problems are pushed onto `reasons`; the
/// ASCII form is returned whenever the conversion itself succeeded.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) -> Option<String> {
    let Ok(ascii) = idna::domain_to_ascii(domain) else {
        reasons.push("domain punycode conversion failed".to_string());
        return None;
    };
    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return None;
    }

    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }
    reasons.extend(ascii.split('.').filter_map(label_problem));
    Some(ascii)
}

fn label_problem(label: &str) -> Option<String> {
    let problem = if label.is_empty() {
        "empty domain label".to_string()
    } else if label.len() > 63 {
        format!("domain label '{label}' length {} > 63", label.len())
    } else if label.starts_with('-') || label.ends_with('-') {
        format!("domain label '{label}' cannot start/end with '-'")
    } else if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        format!("domain label '{label}' has invalid chars")
    } else {
        return None;
    };
    Some(problem)
}
