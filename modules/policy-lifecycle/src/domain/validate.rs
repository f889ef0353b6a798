use super::error::DomainError;

/// The evaluator's own parser is the network-free source of truth for
/// syntax; this is the shape-level check the lifecycle API performs
/// before a source ever reaches it — balanced blocks and a non-empty
/// package declaration, matching the Rego-style module shape assumed
/// elsewhere in this codebase.
pub fn validate_policy_source(source: &str) -> Result<(), DomainError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidSource("source is empty".to_owned()));
    }
    if !trimmed.lines().any(|line| line.trim_start().starts_with("package ")) {
        return Err(DomainError::InvalidSource("missing `package` declaration".to_owned()));
    }
    let mut depth: i32 = 0;
    for c in trimmed.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err(DomainError::InvalidSource("unbalanced braces".to_owned()));
        }
    }
    if depth != 0 {
        return Err(DomainError::InvalidSource("unbalanced braces".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_source() {
        assert!(validate_policy_source("   ").is_err());
    }

    #[test]
    fn rejects_source_without_package_declaration() {
        assert!(validate_policy_source("default allow = false").is_err());
    }

    #[test]
    fn rejects_unbalanced_braces() {
        assert!(validate_policy_source("package p\nallow { true").is_err());
    }

    #[test]
    fn accepts_well_formed_source() {
        validate_policy_source("package control_core.example\n\ndefault allow = false\n\nallow {\n  input.role == \"admin\"\n}\n").unwrap();
    }
}
