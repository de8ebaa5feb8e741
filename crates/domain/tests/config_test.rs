use ferrous_resolver_domain::{Config, IpPreference, RecordType};
use std::net::IpAddr;

#[test]
fn test_default_config_validates() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert!(config.resolver.use_authority_cache);
    assert!(config.resolver.follow_cname);
    assert_eq!(config.resolver.max_iterations, 40);
    assert_eq!(config.transport.query_timeout, 2000);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_parse_partial_toml() {
    let config: Config = toml::from_str(
        r#"
        [resolver]
        ip_preference = "v4_only"
        max_iterations = 0

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.resolver.ip_preference, IpPreference::V4Only);
    assert_eq!(config.resolver.max_iterations, 0);
    assert_eq!(config.logging.level, "debug");
    // untouched sections keep their defaults
    assert!(config.resolver.retry_tcp_on_truncation);
    assert_eq!(config.transport.query_timeout, 2000);
}

#[test]
fn test_zero_timeout_fails_validation() {
    let config: Config = toml::from_str(
        r#"
        [transport]
        query_timeout = 0
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_ip_preference_question_types() {
    assert_eq!(IpPreference::V4Only.question_type(), RecordType::A);
    assert_eq!(IpPreference::V6Only.question_type(), RecordType::AAAA);
    assert_eq!(IpPreference::DualStack.question_type(), RecordType::ANY);
}

#[test]
fn test_ip_preference_pick() {
    let v4: IpAddr = "192.0.2.1".parse().unwrap();
    let v6: IpAddr = "2001:db8::1".parse().unwrap();
    let both = [v4, v6];

    assert_eq!(IpPreference::V4Only.pick(&both), Some(&v4));
    assert_eq!(IpPreference::V6Only.pick(&both), Some(&v6));
    // dual stack prefers v6 when both are present
    assert_eq!(IpPreference::DualStack.pick(&both), Some(&v6));
    assert_eq!(IpPreference::DualStack.pick(&[v4]), Some(&v4));
    assert_eq!(IpPreference::V6Only.pick(&[v4]), None);
}
