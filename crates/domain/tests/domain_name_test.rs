use ferrous_resolver_domain::{DomainName, Query, RecordType, ResolveError};

#[test]
fn test_parse_accepts_trailing_dot() {
    let a = DomainName::parse("example.com").unwrap();
    let b = DomainName::parse("example.com.").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.label_count(), 2);
}

#[test]
fn test_parse_root() {
    let root = DomainName::parse(".").unwrap();
    assert!(root.is_root());
    assert_eq!(root.to_string(), ".");
}

#[test]
fn test_parse_accepts_service_labels_and_reverse_names() {
    assert!(DomainName::parse("_xmpp-server._tcp.google.com").is_ok());
    assert!(DomainName::parse("8.8.8.8.in-addr.arpa").is_ok());
    assert!(DomainName::parse("1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.ip6.arpa").is_ok());
}

#[test]
fn test_parse_rejects_malformed_names() {
    for bad in ["", "..", "a..b", "-bad.com", "bad-.com", "sp ace.com", "semi;colon.com"] {
        assert!(
            matches!(DomainName::parse(bad), Err(ResolveError::InvalidName(_))),
            "expected {:?} to be rejected",
            bad
        );
    }
}

#[test]
fn test_parse_rejects_long_label() {
    let label = "a".repeat(64);
    assert!(DomainName::parse(&format!("{}.com", label)).is_err());
    let label = "a".repeat(63);
    assert!(DomainName::parse(&format!("{}.com", label)).is_ok());
}

#[test]
fn test_parse_rejects_long_name() {
    let name = vec!["abcdefghi"; 26].join(".");
    assert!(name.len() > 255);
    assert!(DomainName::parse(&name).is_err());
}

#[test]
fn test_hash_ignores_case() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(DomainName::parse("Mail.Example.COM").unwrap());
    assert!(set.contains(&DomainName::parse("mail.example.com.").unwrap()));
}

#[test]
fn test_query_parse_validates_name() {
    let query = Query::parse("example.org", RecordType::MX).unwrap();
    assert_eq!(query.to_string(), "example.org. IN MX");
    assert_eq!(query.class(), 1);
    assert!(Query::parse("bad name", RecordType::A).is_err());
}

#[test]
fn test_record_type_codes_round_trip() {
    for rt in RecordType::QUERYABLE {
        assert_eq!(RecordType::from_u16(rt.to_u16()), rt);
        assert!(rt.is_queryable());
        assert_eq!(rt.as_str().parse::<RecordType>().unwrap(), rt);
    }
    assert_eq!(RecordType::from_u16(99), RecordType::Unknown(99));
    assert_eq!(RecordType::Unknown(99).to_string(), "TYPE99");
    assert_eq!("type99".parse::<RecordType>().unwrap(), RecordType::Unknown(99));
    assert!(!RecordType::SOA.is_queryable());
}
