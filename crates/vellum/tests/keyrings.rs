//! Key ring scenarios: rotation, key selection by footer, config loading.

use std::io::Write;

use serde_json::json;
use vellum::core::CoreError;
use vellum::keyring::KeyRingError;
use vellum::{
    extract_footer, key_id_from_footer, Error, KeyRing, KeyRingConfig, Purpose, SymmetricKey,
    TokenBuilder, TokenConfig, TokenParser, Version,
};
use vellum_testkit::fixtures::{rotation_rings, KeyFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_rotation_with_rings() {
    init_tracing();
    let (sending, receiving) = rotation_rings(Version::V4, &["2024-01", "2024-02"]);

    for id in ["2024-01", "2024-02"] {
        let local_id = format!("{}.local", id);
        let token = TokenBuilder::local(Version::V4)
            .payload("secret")
            .key_id(local_id.as_str())
            .build(&sending)
            .unwrap();
        assert_eq!(key_id_from_footer(&extract_footer(&token).unwrap()), Some(local_id));
        assert_eq!(TokenParser::local().parse(&token, &receiving).unwrap(), b"secret");

        let token = TokenBuilder::public(Version::V4)
            .payload("claims")
            .key_id(format!("{}.public", id))
            .build(&sending)
            .unwrap();
        assert_eq!(TokenParser::public().parse(&token, &receiving).unwrap(), b"claims");
    }
}

#[test]
fn test_token_without_key_id_rejected_by_ring() {
    init_tracing();
    let (_, receiving) = rotation_rings(Version::V4, &["a"]);
    let fixture = KeyFixture::with_seed(Version::V4, 7);
    let token = TokenBuilder::local(Version::V4)
        .payload("x")
        .build(&fixture.local)
        .unwrap();

    assert!(matches!(
        TokenParser::local().parse(&token, &receiving),
        Err(Error::KeyRing(KeyRingError::MissingKeyId))
    ));
}

#[test]
fn test_unknown_key_id_rejected() {
    init_tracing();
    let (sending, _) = rotation_rings(Version::V4, &["old"]);
    let (_, receiving) = rotation_rings(Version::V4, &["new"]);

    let token = TokenBuilder::local(Version::V4)
        .payload("x")
        .key_id("old.local")
        .build(&sending)
        .unwrap();
    assert!(matches!(
        TokenParser::local().parse(&token, &receiving),
        Err(Error::KeyRing(KeyRingError::KeyNotFound(id))) if id == "old.local"
    ));
}

#[test]
fn test_key_id_pointing_at_wrong_key_fails_authentication() {
    init_tracing();
    let a = SymmetricKey::generate(Version::V4);
    let b = SymmetricKey::generate(Version::V4);
    let ring = KeyRing::receiving()
        .with_key("a", a.clone())
        .unwrap()
        .with_key("b", b)
        .unwrap();

    // Signed with key "a" but the footer claims "b".
    let token = TokenBuilder::local(Version::V4)
        .payload("x")
        .key_id("b")
        .build(&a)
        .unwrap();
    let err = TokenParser::local().parse(&token, &ring).unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::AuthenticationFailed)));
}

#[test]
fn test_overwritten_key_is_used() {
    let old = SymmetricKey::generate(Version::V4);
    let new = SymmetricKey::generate(Version::V4);

    let mut ring = KeyRing::receiving();
    ring.add_key("k", old.clone()).unwrap();
    ring.add_key("k", new.clone()).unwrap();
    assert_eq!(ring.len(), 1);

    let token_new = TokenBuilder::local(Version::V4).key_id("k").build(&new).unwrap();
    let token_old = TokenBuilder::local(Version::V4).key_id("k").build(&old).unwrap();
    assert!(TokenParser::local().parse(&token_new, &ring).is_ok());
    assert!(TokenParser::local().parse(&token_old, &ring).is_err());
}

#[test]
fn test_mixed_purpose_ring_selects_by_footer() {
    let fixture = KeyFixture::new(Version::V3);
    let ring = KeyRing::receiving()
        .with_key("local", fixture.local.clone())
        .unwrap()
        .with_key("public", fixture.public.clone())
        .unwrap();

    let token = TokenBuilder::public(Version::V3)
        .payload("x")
        .key_id("local")
        .build(&fixture.secret)
        .unwrap();

    // Footer names a local key for a public token.
    assert!(matches!(
        TokenParser::public().parse(&token, &ring),
        Err(Error::Core(CoreError::WrongPurpose { .. }))
    ));
}

#[test]
fn test_config_files() {
    init_tracing();
    let fixture = KeyFixture::new(Version::V4);
    let dir = tempfile::tempdir().unwrap();

    let keys_path = dir.path().join("keys.json");
    let keys = json!({
        "keys": [
            { "id": "enc", "version": "v4", "kind": "local", "key": fixture.local.encode() },
            { "id": "sig", "version": "v4", "kind": "public", "key": fixture.public.encode() },
        ]
    });
    std::fs::File::create(&keys_path)
        .unwrap()
        .write_all(keys.to_string().as_bytes())
        .unwrap();

    let tokens_path = dir.path().join("tokens.json");
    std::fs::write(&tokens_path, r#"{"allowed_versions": ["v4"], "max_footer_len": 128}"#)
        .unwrap();

    let ring = KeyRingConfig::from_json_file(&keys_path)
        .unwrap()
        .receiving_ring()
        .unwrap();
    let config = TokenConfig::from_json_file(&tokens_path).unwrap();

    let token = config
        .builder(Purpose::Public)
        .payload("claims")
        .key_id("sig")
        .build(&fixture.secret)
        .unwrap();
    let payload = config.parser(Purpose::Public).parse(&token, &ring).unwrap();
    assert_eq!(payload, b"claims");

    // Parser from config rejects other versions before touching keys.
    let v2 = KeyFixture::new(Version::V2);
    let token = TokenBuilder::local(Version::V2).build(&v2.local).unwrap();
    assert!(matches!(
        config.parser(Purpose::Local).parse(&token, &ring),
        Err(Error::VersionNotAllowed(Version::V2))
    ));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = KeyRingConfig::from_json_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
