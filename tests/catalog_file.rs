use std::io::Write;

use noobhack_events::{CatalogConfig, CatalogError, Dispatcher, Event, EventKind, RuleCatalogs};

const CATALOG: &str = r#"{
    "dungeon": {
        "engulfed": ["you are engulfed"],
        "altar": ["there is an altar to .* here"]
    },
    "status": {
        "hunger": {
            "you are hungry": "Hungry",
            "you are satiated": "Satiated"
        },
        "encumbrance": {
            "you are burdened": 1,
            "you are stressed": 2
        }
    }
}"#;

#[test]
fn catalog_file_drives_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(CATALOG.as_bytes())
        .unwrap();

    let catalogs = RuleCatalogs::from_json_file(&path, &CatalogConfig::default()).unwrap();
    assert_eq!(catalogs.dungeon.event_names(), vec!["engulfed", "altar"]);
    assert_eq!(catalogs.status.event_names(), vec!["hunger", "encumbrance"]);

    let dispatcher = Dispatcher::with_catalogs(catalogs);
    let events = dispatcher.scan("There is an altar to Anhur (chaotic) here.\nYou are stressed.");
    assert_eq!(
        events,
        vec![Event::dungeon("altar"), Event::status("encumbrance", 2)]
    );
    assert_eq!(events[1].kind(), EventKind::Status);
}

#[test]
fn same_document_same_fingerprint() {
    let a = RuleCatalogs::from_json_str(CATALOG, &CatalogConfig::default()).unwrap();
    let b = RuleCatalogs::from_json_str(CATALOG, &CatalogConfig::default()).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a, b);
}

#[test]
fn malformed_pattern_in_file_is_reported_at_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"dungeon": {"trap": ["you fall [through"]}}"#)
        .unwrap();

    let err = RuleCatalogs::from_json_file(file.path(), &CatalogConfig::default()).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, CatalogError::InvalidPattern { .. }));
    assert!(msg.contains("trap"));
    assert!(msg.contains("you fall [through"));
}
