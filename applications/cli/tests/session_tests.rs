//! End-to-end tests for the interactive session over a real music folder

use async_trait::async_trait;
use gecs_cli::{HeadlessEngine, Session, SessionCommand, SessionFlow};
use gecs_core::{FetchOutcome, TrackFetcher};
use gecs_importer::{DirectoryScanner, HelperFetcher};
use gecs_playback::{Player, TransportState};
use gecs_storage::{albums, app_state, MemoryStore, StateStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn create_fake_audio(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"ID3 not really").expect("Failed to write file");
    path
}

/// Writes a new file into the music folder instead of downloading
struct CopyingFetcher {
    music: PathBuf,
}

#[async_trait]
impl TrackFetcher for CopyingFetcher {
    async fn download(&self, url: &str) -> FetchOutcome {
        let path = create_fake_audio(&self.music, "zz-fetched.mp3");
        FetchOutcome {
            success: true,
            file_path: Some(path),
            filename: Some("zz-fetched.mp3".to_string()),
            title: Some("Fetched".to_string()),
            url: Some(url.to_string()),
            ..FetchOutcome::default()
        }
    }
}

struct Fixture {
    _temp: TempDir,
    music: PathBuf,
    store: StateStore,
    session: Session,
}

async fn fixture_with(fetcher: Option<Arc<dyn TrackFetcher>>) -> Fixture {
    let temp = TempDir::new().unwrap();
    let music = temp.path().join("Music");
    fs::create_dir_all(&music).unwrap();
    for name in ["a.mp3", "b.mp3", "c.mp3"] {
        create_fake_audio(&music, name);
    }

    let store = StateStore::new(Arc::new(MemoryStore::new()));
    let fetcher = fetcher.unwrap_or_else(|| {
        Arc::new(CopyingFetcher {
            music: music.clone(),
        })
    });
    let session = Session::new(
        Player::new(HeadlessEngine::new(), store.clone()),
        store.clone(),
        Arc::new(DirectoryScanner::new(&music)),
        fetcher,
        &music,
    );

    Fixture {
        _temp: temp,
        music,
        store,
        session,
    }
}

async fn started() -> (Fixture, String) {
    let mut fx = fixture_with(None).await;
    let mut out = Vec::new();
    fx.session.start(&mut out).await.unwrap();
    (fx, String::from_utf8(out).unwrap())
}

async fn run(fx: &mut Fixture, command: SessionCommand) -> String {
    let mut out = Vec::new();
    let flow = fx.session.execute(command, &mut out).await.unwrap();
    assert_eq!(flow, SessionFlow::Continue);
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_start_loads_library_without_autoplay() {
    let (fx, out) = started().await;

    let player = fx.session.player();
    assert_eq!(player.library().len(), 3);
    assert_eq!(player.current_track().unwrap().title, "a");
    assert_eq!(player.transport_state(), TransportState::ReadyPaused);
    assert!(!player.is_playing());
    assert!(out.contains("playlist: 3 tracks (library)"));
    assert!(out.contains("volume: 70%"));
}

#[tokio::test]
async fn test_end_of_track_advances_and_keeps_playing() {
    let (mut fx, _) = started().await;

    run(&mut fx, SessionCommand::PlayPause).await;
    assert!(fx.session.player().is_playing());

    let out = run(&mut fx, SessionCommand::End).await;
    let player = fx.session.player();
    assert_eq!(player.current_index(), 1);
    assert_eq!(player.current_track().unwrap().title, "b");
    assert_eq!(player.transport_state(), TransportState::Playing);
    assert!(out.contains("track: #1"));
}

#[tokio::test]
async fn test_settings_are_persisted() {
    let (mut fx, _) = started().await;

    run(&mut fx, SessionCommand::Volume(35)).await;
    run(&mut fx, SessionCommand::Shuffle).await;
    run(&mut fx, SessionCommand::Repeat).await;

    let state = app_state::get(&fx.store).await;
    assert_eq!(state.volume, 35);
    assert!(state.shuffle);
    assert_eq!(state.repeat_mode, gecs_core::RepeatMode::All);
}

#[tokio::test]
async fn test_album_selection_and_clear() {
    let (mut fx, _) = started().await;
    let tracks = fx.session.player().library()[1..].to_vec();
    let album = albums::create(&fx.store, "Mix", tracks).await.unwrap();

    let out = run(&mut fx, SessionCommand::Album(album.id.clone())).await;
    assert!(out.contains("playlist: 2 tracks (album)"));
    assert_eq!(fx.session.player().current_track().unwrap().title, "b");

    run(&mut fx, SessionCommand::ClearAlbum).await;
    assert!(fx.session.player().selected_album().is_none());
    assert_eq!(fx.session.player().playlist().len(), 3);
}

#[tokio::test]
async fn test_unknown_album_is_reported_not_fatal() {
    let (mut fx, _) = started().await;

    let out = run(
        &mut fx,
        SessionCommand::Album(gecs_core::AlbumId::new("missing")),
    )
    .await;
    assert!(out.contains("error: Not found: album missing"));
    assert_eq!(fx.session.player().playlist().len(), 3);
}

#[tokio::test]
async fn test_fetch_rescans_and_resumes_current_track() {
    let (mut fx, _) = started().await;
    run(&mut fx, SessionCommand::PlayPause).await;
    run(&mut fx, SessionCommand::Tick(12.0)).await;

    let out = run(
        &mut fx,
        SessionCommand::Fetch("https://soundcloud.com/artist/song".to_string()),
    )
    .await;

    let player = fx.session.player();
    assert!(out.contains("downloaded: Fetched"));
    assert_eq!(player.library().len(), 4);
    assert_eq!(player.current_track().unwrap().title, "a");
    assert!(player.is_playing());
    assert_eq!(player.current_time(), 12.0);
}

#[tokio::test]
async fn test_fetch_without_helper_reports_error() {
    let temp = TempDir::new().unwrap();
    let fetcher: Arc<dyn TrackFetcher> = Arc::new(HelperFetcher::discover(
        Some(temp.path().join("no-helper")),
        temp.path(),
    ));
    let mut fx = fixture_with(Some(fetcher)).await;
    fx.session.start(&mut Vec::new()).await.unwrap();

    let out = run(
        &mut fx,
        SessionCommand::Fetch("https://soundcloud.com/artist/song".to_string()),
    )
    .await;
    assert!(out.contains("error:"));
    assert_eq!(fx.session.player().library().len(), 3);
}

#[tokio::test]
async fn test_delete_removes_file_and_rescans() {
    let (mut fx, _) = started().await;
    let victim = fx.session.player().library()[2].clone();

    run(&mut fx, SessionCommand::Delete(victim.id.clone())).await;

    assert!(!fx.music.join("c.mp3").exists());
    assert_eq!(fx.session.player().library().len(), 2);
}

#[tokio::test]
async fn test_run_stops_at_quit() {
    let (mut fx, _) = started().await;
    let input: &[u8] = b"next\nbogus\nquit\nnext\n";
    let mut out = Vec::new();

    fx.session.run(input, None, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert_eq!(fx.session.player().current_index(), 1);
    assert!(out.contains("error: Invalid command: bogus"));
}
