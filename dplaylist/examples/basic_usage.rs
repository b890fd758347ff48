//! Exemple d'utilisation de dplaylist
//!
//! Ouvre une playlist nommée depuis la configuration, écrit un en-tête et
//! quelques pistes, en déplace une puis lance une recherche.
//!
//! ```bash
//! DPLAYLIST_CONFIG__PLAYLISTS__DIRECTORY=/tmp/playlists \
//!     cargo run -p dplaylist --example basic_usage
//! ```

use anyhow::Result;
use dplaylist::{Direction, Header, Logic, Operator, Placement, PlaylistItem, PlaylistsConfig};
use serde_json::json;

fn track(title: &str, artist: &str, album: &str) -> Result<PlaylistItem> {
    let mut item = PlaylistItem::new();
    item.set_title(title)?;
    item.set("artist", artist)?;
    item.set_album(album)?;
    Ok(item)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = PlaylistsConfig::default().with_env_overrides()?;
    let mut playlist = config.open("demo")?;
    println!("📂 Playlist: {}", playlist.file_name().display());

    let mut header = Header::new();
    header.set_title("Power metal classics")?;
    header.set_description("Built by the basic_usage example")?;
    header.set("xxxCurator", "dplaylist")?;
    playlist.set_header(&header)?;

    let tracks = [
        track("Nightfall", "Blind Guardian", "Nightfall in Middle-Earth")?,
        track("Valhalla", "Blind Guardian", "Follow the Blind")?,
        track("I Want Out", "Helloween", "Keeper of the Seven Keys Part II")?,
    ];
    for item in &tracks {
        playlist.set_item(item, Placement::End)?;
    }

    // La dernière piste passe en tête
    playlist.set_item(&tracks[2], Placement::At(0))?;

    // Une piste invalide est refusée avant toute écriture
    let mut untitled = PlaylistItem::new();
    untitled.set("genre", json!(["Metal"]))?;
    if let Err(e) = playlist.set_item(&untitled, Placement::End) {
        println!("⚠️  Rejected: {e}");
    }

    println!("\n🎵 {}", playlist.header().title().unwrap_or("(untitled)"));
    for (position, item) in playlist.items() {
        if let Some(item) = item {
            println!("  {position}: {} - {}", item.title().unwrap_or("?"), item.artists().join(", "));
        }
    }

    let mut search = playlist.search(Logic::And);
    search
        .condition("artist", "Blind Guardian", Operator::Equals)
        .order_by("title", Direction::Desc);

    println!("\n🔍 Blind Guardian:");
    for (position, item) in search.find()? {
        println!("  {position}: {}", item.title().unwrap_or("?"));
    }

    Ok(())
}
