use ferrous_resolver_domain::RecordType;

#[test]
fn test_wire_code_round_trip() {
    for rtype in [
        RecordType::A,
        RecordType::NS,
        RecordType::CNAME,
        RecordType::SOA,
        RecordType::PTR,
        RecordType::MX,
        RecordType::TXT,
        RecordType::AAAA,
        RecordType::SRV,
        RecordType::ANY,
    ] {
        assert_eq!(RecordType::from_u16(rtype.to_u16()), rtype);
    }
}

#[test]
fn test_unknown_codes_fall_through() {
    let rtype = RecordType::from_u16(4711);
    assert_eq!(rtype, RecordType::Unknown(4711));
    assert_eq!(rtype.to_u16(), 4711);
    assert_eq!(format!("{}", rtype), "TYPE4711");
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::AAAA);
    assert_eq!("Mx".parse::<RecordType>().unwrap(), RecordType::MX);
    assert_eq!("*".parse::<RecordType>().unwrap(), RecordType::ANY);
    assert_eq!(
        "TYPE4711".parse::<RecordType>().unwrap(),
        RecordType::Unknown(4711)
    );
    assert!("NOTATYPE".parse::<RecordType>().is_err());
}

#[test]
fn test_is_address() {
    assert!(RecordType::A.is_address());
    assert!(RecordType::AAAA.is_address());
    assert!(!RecordType::MX.is_address());
}
