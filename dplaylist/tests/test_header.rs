use dplaylist::{Error, Header, Playlist};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const TEMPLATE: &str = include_str!("fixtures/template.dpls");

/// Crée une playlist temporaire avec le contenu donné
fn create_test_playlist(content: &str) -> (TempDir, Playlist) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("header.dpls");
    fs::write(&path, content).unwrap();
    (temp_dir, Playlist::open(path))
}

#[test]
fn test_set_header_title() {
    let (_temp_dir, mut playlist) = create_test_playlist("");

    let mut header = playlist.header();
    header.set_title("Playlist title").unwrap();
    playlist.set_header(&header).unwrap();

    let another = Playlist::open(playlist.file_name());
    assert_eq!(another.header().title(), Some("Playlist title"));
}

#[test]
fn test_set_header_description() {
    let (_temp_dir, mut playlist) = create_test_playlist("");

    let mut header = playlist.header();
    header.set_description("Playlist description").unwrap();
    playlist.set_header(&header).unwrap();

    let another = Playlist::open(playlist.file_name());
    assert_eq!(another.header().description(), Some("Playlist description"));
}

#[test]
fn test_read_header() {
    let (_temp_dir, playlist) = create_test_playlist(TEMPLATE);

    let header = playlist.header();
    assert_eq!(header.title(), Some("Template for tests"));
    assert_eq!(header.description(), Some("test description"));
}

#[test]
fn test_set_custom_property() {
    let (_temp_dir, mut playlist) = create_test_playlist(TEMPLATE);

    let mut header = playlist.header();
    header.set("xxxCustomProperty", "test").unwrap();
    playlist.set_header(&header).unwrap();

    let another = Playlist::open(playlist.file_name());
    assert_eq!(another.header().get_str("xxxCustomProperty"), Some("test"));
    // Les items ne bougent pas
    assert_eq!(another.get_item(0).unwrap().title(), Some("Lazy Day Blues"));
    assert_eq!(another.line_count(), 11);
}

#[test]
fn test_unknown_property_is_rejected() {
    let mut header = Header::new();
    let err = header.set("genre", "Metal").unwrap_err();

    assert_eq!(err.validation_errors(), Some(&["unrecognized genre property".to_string()][..]));
    assert!(!header.is_set("genre"));
}

#[test]
fn test_invalid_header_is_not_written() {
    let (_temp_dir, mut playlist) = create_test_playlist(TEMPLATE);

    let before = fs::read_to_string(playlist.file_name()).unwrap();

    let header = Header::from_object(json!({"title": 42}).as_object().cloned().unwrap());
    let err = playlist.set_header(&header).unwrap_err();

    assert!(matches!(err, Error::InvalidRecord(_)));
    assert_eq!(
        err.validation_errors(),
        Some(&["title should be of the types: string".to_string()][..])
    );
    assert_eq!(fs::read_to_string(playlist.file_name()).unwrap(), before);
}
