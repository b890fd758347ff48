use dplaylist::{Error, Placement, Playlist, PlaylistItem};
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

fn title_at(playlist: &Playlist, position: usize) -> Option<String> {
    playlist
        .get_item(position)
        .and_then(|item| item.title().map(str::to_string))
}

#[test]
fn test_move_existing_item() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let mut fifth = playlist.get_item(5).unwrap();
    fifth.set_title("Nightfall ( updated )").unwrap();
    playlist.set_item(&fifth, 0usize).unwrap();

    let first = playlist.get_item(0).unwrap();
    assert_eq!(first.title(), Some("Nightfall ( updated )"));
    assert_eq!(first.uuid(), fifth.uuid());

    // Les positions précédentes sont décalées d'un cran
    assert_eq!(title_at(&playlist, 1).as_deref(), Some("Lazy Day Blues"));
    assert_eq!(title_at(&playlist, 5).as_deref(), Some("The Bard's Song The Hobbit"));
    assert_eq!(playlist.line_count(), 11);
}

#[test]
fn test_move_item_forward() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let first = playlist.get_item(0).unwrap();
    playlist.set_item(&first, Placement::At(3)).unwrap();

    assert_eq!(title_at(&playlist, 3).as_deref(), Some("Lazy Day Blues"));
    // L'ancien occupant de la position 3 recule en 2
    assert_eq!(title_at(&playlist, 2).as_deref(), Some("If I could Fly"));
    assert_eq!(title_at(&playlist, 0).as_deref(), Some("Let's go sunning"));
}

#[test]
fn test_move_item_to_its_own_position() {
    let (_temp_dir, mut playlist) = create_test_playlist();
    let before = fs::read_to_string(playlist.file_name()).unwrap();

    let third = playlist.get_item(2).unwrap();
    playlist.set_item(&third, Placement::At(2)).unwrap();
    playlist.set_item(&third, Placement::Keep).unwrap();

    assert_eq!(fs::read_to_string(playlist.file_name()).unwrap(), before);
}

#[test]
fn test_set_new_item() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let mut new = PlaylistItem::new();
    new.set_title("Jungle Drums").unwrap();
    new.set("soundtrack", "Half Life").unwrap();
    new.generate_uuid();
    playlist.set_item(&new, 2usize).unwrap();

    let third = playlist.get_item(2).unwrap();
    assert_eq!(third.title(), new.title());
    assert_eq!(third.uuid(), new.uuid());
    assert_eq!(title_at(&playlist, 3).as_deref(), Some("Nigraj kandeloj dancas"));
}

#[test]
fn test_append_new_item() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let mut new = PlaylistItem::new();
    new.set_album("Tales from the Twilight World").unwrap();
    playlist.set_item(&new, Placement::End).unwrap();

    let (position, last) = playlist.get_last_item().unwrap();
    assert_eq!(position, 9);
    assert_eq!(last.uuid(), new.uuid());
    // La dernière ligne vide est réutilisée
    assert_eq!(playlist.count_lines(), (12, true));

    let mut other = PlaylistItem::new();
    other.set_title("Valhalla").unwrap();
    playlist.set_item(&other, Placement::Keep).unwrap();
    assert_eq!(playlist.position_of(&other), Some(10));
}

#[test]
fn test_move_to_end() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let first = playlist.get_item(0).unwrap();
    playlist.set_item(&first, Placement::from_index(-1)).unwrap();

    assert_eq!(playlist.position_of(&first), Some(8));
    assert_eq!(title_at(&playlist, 7).as_deref(), Some("Over the hills and far away"));
}

#[test]
fn test_invalid_item_is_rejected() {
    let (_temp_dir, mut playlist) = create_test_playlist();
    let before = fs::read_to_string(playlist.file_name()).unwrap();

    let mut item = PlaylistItem::new();
    item.set("artist", json!(["Nobody"])).unwrap();

    let err = playlist.set_item(&item, Placement::End).unwrap_err();
    assert!(matches!(err, Error::InvalidRecord(ref errors) if errors == &["Inform a title or an album"]));
    assert_eq!(fs::read_to_string(playlist.file_name()).unwrap(), before);
}

#[test]
fn test_position_too_far_past_the_end_is_rejected() {
    let (temp_dir, mut playlist) = create_test_playlist();
    let path = temp_dir.path().join("template.dpls");

    let mut item = PlaylistItem::new();
    item.set_title("Far away").unwrap();

    for position in [usize::MAX, usize::MAX - 1, 2000] {
        let err = playlist.set_item(&item, position).unwrap_err();
        assert!(matches!(err, Error::PositionOutOfRange(Placement::At(p)) if p == position));
    }

    // Déplacement refusé : l'item existant reste à sa place
    let nightfall = playlist.get_item(5).unwrap();
    assert!(playlist.set_item(&nightfall, 5000usize).is_err());
    assert_eq!(playlist.position_of(&nightfall), Some(5));

    assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
}

#[test]
fn test_position_past_the_end_pads_with_blank_lines() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let mut item = PlaylistItem::new();
    item.set_title("Later").unwrap();
    playlist.set_item(&item, 20usize).unwrap();

    assert_eq!(title_at(&playlist, 20).as_deref(), Some("Later"));
    assert!(playlist.get_item(15).is_none());
    assert_eq!(playlist.position_of(&item), Some(20));
}

#[test]
fn test_set_item_creates_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("new.dpls");
    let mut playlist = Playlist::open(&path);

    let mut item = PlaylistItem::new();
    item.set_title("First").unwrap();
    playlist.set_item(&item, Placement::Keep).unwrap();

    assert!(path.exists());
    assert_eq!(playlist.get_item(0).unwrap().uuid(), item.uuid());
    // La ligne 0 reste réservée à l'en-tête
    assert!(fs::read_to_string(&path).unwrap().starts_with('\n'));
}

#[test]
fn test_round_trip_through_file() {
    let (_temp_dir, mut playlist) = create_test_playlist();

    let mut item = PlaylistItem::new();
    item.set_title("Mirror Mirror").unwrap();
    item.set("artist", json!(["Blind Guardian", "Hansi Kürsch"])).unwrap();
    item.set("xxxRating", 5).unwrap();
    playlist.set_item(&item, Placement::At(4)).unwrap();

    assert_eq!(playlist.get_item(4).unwrap(), item);
}
