use dplaylist::{Direction, Error, Logic, Operator, Playlist};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const TEMPLATE: &str = include_str!("fixtures/template.dpls");

fn create_test_playlist() -> (TempDir, Playlist) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("template.dpls");
    fs::write(&path, TEMPLATE).unwrap();
    (temp_dir, Playlist::open(path))
}

fn positions<T>(results: &[(usize, T)]) -> Vec<usize> {
    results.iter().map(|(position, _)| *position).collect()
}

#[test]
fn test_search_items_by_artist() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::And);
    search.condition("artist", "Blind Guardian", Operator::Equals);
    let items = search.find().unwrap();

    assert_eq!(positions(&items), vec![4, 5]);
    assert_eq!(items[0].1.title(), Some("The Bard's Song The Hobbit"));
    assert_eq!(items[1].1.title(), Some("Nightfall"));
}

#[test]
fn test_search_items_by_incomplete_term() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::And);
    search.condition("title", json!(["Blues", "kandeloj"]), Operator::Like);
    let items = search.find().unwrap();

    assert_eq!(positions(&items), vec![0, 2]);
    assert_eq!(items[0].1.title(), Some("Lazy Day Blues"));
    assert_eq!(items[1].1.title(), Some("Nigraj kandeloj dancas"));
}

#[test]
fn test_search_order_results() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::And);
    search.order_by("title", Direction::Asc);
    let items = search.find().unwrap();

    // L'en-tête n'apparaît jamais, la ligne vide non plus
    assert_eq!(items.len(), 8);
    assert_eq!(items.first().unwrap().1.title(), Some("If I could Fly"));
    assert_eq!(items.last().unwrap().1.title(), Some("The Bard's Song The Hobbit"));
}

#[test]
fn test_search_array_property() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::Or);
    search
        .condition("artist", "Nightwish", Operator::Equals)
        .condition("genre", "Blues", Operator::Equals);
    let items = search.find().unwrap();

    assert_eq!(positions(&items), vec![0, 8]);
}

#[test]
fn test_search_nested_groups() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::And);
    search.condition("artist", "Blind Guardian", Operator::Equals);
    search
        .or_group()
        .condition("title", "night", Operator::Like)
        .condition("album", "Kajto", Operator::Equals);
    search.order_by("title", Direction::Desc);
    let items = search.find().unwrap();

    assert_eq!(positions(&items), vec![5]);
}

#[test]
fn test_search_header_is_excluded() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::And);
    search.condition("description", "test description", Operator::Equals);
    assert!(search.find().unwrap().is_empty());
}

#[test]
fn test_search_invalid_regex() {
    let (_temp_dir, playlist) = create_test_playlist();

    let mut search = playlist.search(Logic::And);
    search.condition("title", "(", Operator::Regex);
    assert!(matches!(search.find(), Err(Error::InvalidQuery(_))));
}

#[test]
fn test_search_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let playlist = Playlist::open(temp_dir.path().join("missing.dpls"));

    let mut search = playlist.search(Logic::And);
    search.condition("title", "anything", Operator::Like);
    assert!(search.find().unwrap().is_empty());
}
