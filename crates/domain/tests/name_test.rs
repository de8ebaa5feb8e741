use ferrous_resolver_domain::{DomainName, Label, ResolverError};

// ── parsing ────────────────────────────────────────────────────────────────

#[test]
fn test_parse_simple_name() {
    let name: DomainName = "example.org".parse().unwrap();
    assert_eq!(name.level(), 2);
    assert_eq!(name.to_string(), "example.org.");
}

#[test]
fn test_parse_normalizes_case() {
    let name: DomainName = "WWW.Example.ORG.".parse().unwrap();
    assert_eq!(name.to_string(), "www.example.org.");
}

#[test]
fn test_parse_trims_whitespace() {
    let name: DomainName = "  example.org.  ".parse().unwrap();
    assert_eq!(name.to_string(), "example.org.");
}

#[test]
fn test_parse_is_idempotent_under_reparse() {
    for input in ["example.org", "a.b.c.d.example.org.", "_sip.example.com"] {
        let once: DomainName = input.parse().unwrap();
        let twice: DomainName = once.to_string().parse().unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_parse_rejects_empty_and_bare_root() {
    assert!(matches!(
        "".parse::<DomainName>(),
        Err(ResolverError::InvalidName(_))
    ));
    assert!(matches!(
        "   ".parse::<DomainName>(),
        Err(ResolverError::InvalidName(_))
    ));
    assert!(matches!(
        ".".parse::<DomainName>(),
        Err(ResolverError::InvalidName(_))
    ));
}

#[test]
fn test_parse_rejects_consecutive_dots() {
    assert!("example..org".parse::<DomainName>().is_err());
}

#[test]
fn test_parse_rejects_too_long_name() {
    // 128 labels of one character each: 256 canonical characters.
    let long = vec!["a"; 128].join(".");
    assert!(matches!(
        long.parse::<DomainName>(),
        Err(ResolverError::NameTooLong(_))
    ));
}

// ── labels ─────────────────────────────────────────────────────────────────

#[test]
fn test_label_length_limits() {
    let max = "a".repeat(63);
    assert!(Label::new(&max).is_ok());

    let over = "a".repeat(64);
    assert!(matches!(
        Label::new(&over),
        Err(ResolverError::InvalidLabel(_))
    ));
}

#[test]
fn test_label_hyphen_placement() {
    assert!(Label::new("ex-ample").is_ok());
    assert!(Label::new("-example").is_err());
    assert!(Label::new("example-").is_err());
}

#[test]
fn test_label_leading_underscore_is_tolerated() {
    assert!(Label::new("_sip").is_ok());
    assert!(Label::new("si_p").is_err());
}

#[test]
fn test_label_rejects_illegal_characters() {
    assert!(Label::new("exa mple").is_err());
    assert!(Label::new("exa!mple").is_err());
}

// ── structure ──────────────────────────────────────────────────────────────

#[test]
fn test_root_has_level_zero() {
    let root = DomainName::root();
    assert!(root.is_root());
    assert_eq!(root.level(), 0);
    assert_eq!(root.to_string(), ".");
}

#[test]
fn test_parent_walk() {
    let name: DomainName = "ns1.example.org".parse().unwrap();
    let parent = name.parent().unwrap();
    assert_eq!(parent.to_string(), "example.org.");
    let grandparent = parent.parent().unwrap();
    assert_eq!(grandparent.to_string(), "org.");
    assert!(grandparent.parent().unwrap().is_root());
    assert!(DomainName::root().parent().is_none());
}

#[test]
fn test_labels_root_first_order() {
    let name: DomainName = "ns1.example.org".parse().unwrap();
    let walked: Vec<&str> = name.labels_root_first().map(|l| l.as_str()).collect();
    assert_eq!(walked, vec!["org", "example", "ns1"]);
}

// ── containment ────────────────────────────────────────────────────────────

#[test]
fn test_is_below_ancestors() {
    let name: DomainName = "ns1.example.org.".parse().unwrap();
    let zone: DomainName = "example.org.".parse().unwrap();
    let tld: DomainName = "org.".parse().unwrap();
    let other: DomainName = "example.com.".parse().unwrap();

    assert!(name.is_below(&zone));
    assert!(name.is_below(&tld));
    assert!(!name.is_below(&other));
}

#[test]
fn test_is_below_self_and_root() {
    let name: DomainName = "example.org".parse().unwrap();
    assert!(name.is_below(&name.clone()));
    assert!(name.is_below(&DomainName::root()));
    assert!(!DomainName::root().is_below(&name));
}

#[test]
fn test_is_below_is_structural_not_textual() {
    // "ample.org." is a textual suffix of "example.org." but not a zone.
    let name: DomainName = "example.org".parse().unwrap();
    let not_a_zone: DomainName = "ample.org".parse().unwrap();
    assert!(!name.is_below(&not_a_zone));
}

// ── equality ───────────────────────────────────────────────────────────────

#[test]
fn test_equality_ignores_case_and_trailing_dot() {
    let a: DomainName = "Example.ORG".parse().unwrap();
    let b: DomainName = "example.org.".parse().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_comparable_with_str() {
    let name: DomainName = "example.org".parse().unwrap();
    assert!(name == "example.org.");
    assert!(name == "EXAMPLE.ORG");
    assert!(name != "example.com.");
    assert!(DomainName::root() == ".");
}
