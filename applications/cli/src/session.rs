//! Interactive playback session
//!
//! Reads one command per line, drives the [`Player`] with a
//! [`HeadlessEngine`], and prints every player event as it is drained.
//! Library change notifications from the watcher trigger a rescan between
//! commands.

use crate::engine::HeadlessEngine;
use crate::error::{CliError, Result};
use gecs_core::{AlbumId, LibraryScanner, TrackFetcher, TrackId};
use gecs_importer::{remove_track_file, LibraryChanged};
use gecs_playback::{Player, PlayerEvent};
use gecs_storage::{albums, StateStore};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const HELP: &str = "\
commands:
  list              show the active playlist
  status            show the current track and transport
  play              toggle play/pause
  stop              stop and rewind
  next | prev       move through the playlist
  select <n>        jump to playlist entry n
  seek <seconds>    move the playback position
  tick <seconds>    let the clock run
  end               finish the current track
  vol <0-100>       set the volume
  shuffle           toggle shuffle
  repeat            cycle the repeat mode
  albums            list saved albums
  album <id>        play a saved album
  clear             back to the full library
  rescan            rescan the music folder
  fetch <url>       download a track
  delete <id>       delete a track file
  quit";

/// One line of session input
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    List,
    Status,
    PlayPause,
    Stop,
    Next,
    Previous,
    Select(usize),
    Seek(f64),
    Tick(f64),
    End,
    Volume(u8),
    Shuffle,
    Repeat,
    Albums,
    Album(AlbumId),
    ClearAlbum,
    Rescan,
    Fetch(String),
    Delete(TrackId),
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(CliError::InvalidCommand("empty line".to_string()));
        };
        let arg = parts.next();

        let command = match (verb.to_ascii_lowercase().as_str(), arg) {
            ("list" | "ls", None) => Self::List,
            ("status", None) => Self::Status,
            ("play" | "pause", None) => Self::PlayPause,
            ("stop", None) => Self::Stop,
            ("next" | "n", None) => Self::Next,
            ("prev" | "previous" | "p", None) => Self::Previous,
            ("select", Some(n)) => Self::Select(parse_arg(verb, n)?),
            ("seek", Some(s)) => Self::Seek(parse_seconds(verb, s)?),
            ("tick", Some(s)) => Self::Tick(parse_seconds(verb, s)?),
            ("end", None) => Self::End,
            ("vol" | "volume", Some(v)) => Self::Volume(parse_arg(verb, v)?),
            ("shuffle", None) => Self::Shuffle,
            ("repeat", None) => Self::Repeat,
            ("albums", None) => Self::Albums,
            ("album", Some(id)) => Self::Album(AlbumId::new(id)),
            ("clear", None) => Self::ClearAlbum,
            ("rescan", None) => Self::Rescan,
            ("fetch", Some(url)) => Self::Fetch(url.to_string()),
            ("delete", Some(id)) => Self::Delete(TrackId::new(id)),
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            _ => return Err(CliError::InvalidCommand(line.trim().to_string())),
        };

        if parts.next().is_some() {
            return Err(CliError::InvalidCommand(line.trim().to_string()));
        }
        Ok(command)
    }
}

fn parse_arg<T: FromStr>(verb: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::InvalidCommand(format!("{verb}: bad argument {value:?}")))
}

fn parse_seconds(verb: &str, value: &str) -> Result<f64> {
    let seconds: f64 = parse_arg(verb, value)?;
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err(CliError::InvalidCommand(format!(
            "{verb}: seconds must be a non-negative number"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlow {
    Continue,
    Quit,
}

pub struct Session {
    player: Player<HeadlessEngine>,
    store: StateStore,
    scanner: Arc<dyn LibraryScanner>,
    fetcher: Arc<dyn TrackFetcher>,
    music_root: PathBuf,
}

impl Session {
    pub fn new(
        player: Player<HeadlessEngine>,
        store: StateStore,
        scanner: Arc<dyn LibraryScanner>,
        fetcher: Arc<dyn TrackFetcher>,
        music_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            player,
            store,
            scanner,
            fetcher,
            music_root: music_root.into(),
        }
    }

    pub fn player(&self) -> &Player<HeadlessEngine> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player<HeadlessEngine> {
        &mut self.player
    }

    /// Restore saved settings and load the library
    pub async fn start<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.player.restore().await;
        self.player.rescan(self.scanner.as_ref()).await;
        self.pump();
        self.flush_events(out)?;
        info!(tracks = self.player.library().len(), "Session started");
        Ok(())
    }

    /// Run until `quit`, end of input, or a fatal write error
    pub async fn run<R, W>(
        &mut self,
        input: R,
        mut changes: Option<mpsc::Receiver<LibraryChanged>>,
        out: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.dispatch_line(&line, out).await? == SessionFlow::Quit {
                        break;
                    }
                }
                Some(change) = next_change(&mut changes) => {
                    debug!(paths = change.paths.len(), "Library changed");
                    self.execute(SessionCommand::Rescan, out).await?;
                }
            }
        }
        Ok(())
    }

    /// Parse and execute one input line
    ///
    /// Bad input and failed commands are reported on `out`; only write
    /// errors end the session.
    pub async fn dispatch_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<SessionFlow> {
        if line.trim().is_empty() {
            return Ok(SessionFlow::Continue);
        }
        match line.parse::<SessionCommand>() {
            Ok(command) => self.execute(command, out).await,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                Ok(SessionFlow::Continue)
            }
        }
    }

    pub async fn execute<W: Write>(
        &mut self,
        command: SessionCommand,
        out: &mut W,
    ) -> Result<SessionFlow> {
        match self.apply(command, out).await {
            Ok(SessionFlow::Quit) => return Ok(SessionFlow::Quit),
            Ok(SessionFlow::Continue) => {}
            Err(CliError::Io(e)) => return Err(CliError::Io(e)),
            Err(e) => writeln!(out, "error: {e}")?,
        }
        self.pump();
        self.flush_events(out)?;
        Ok(SessionFlow::Continue)
    }

    async fn apply<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<SessionFlow> {
        match command {
            SessionCommand::List => self.write_playlist(out)?,
            SessionCommand::Status => writeln!(out, "{}", self.status_line())?,
            SessionCommand::PlayPause => {
                self.player.play_pause();
            }
            SessionCommand::Stop => self.player.stop(),
            SessionCommand::Next => {
                self.player.next();
            }
            SessionCommand::Previous => {
                self.player.previous();
            }
            SessionCommand::Select(index) => {
                if !self.player.select(index) {
                    writeln!(out, "no entry {index} in a playlist of {}", self.player.playlist().len())?;
                }
            }
            SessionCommand::Seek(seconds) => self.player.seek(seconds),
            SessionCommand::Tick(seconds) => self.engine_mut().tick(seconds),
            SessionCommand::End => self.engine_mut().finish(),
            SessionCommand::Volume(level) => {
                self.player.set_volume(level).await;
            }
            SessionCommand::Shuffle => {
                self.player.toggle_shuffle().await;
            }
            SessionCommand::Repeat => {
                self.player.cycle_repeat().await;
            }
            SessionCommand::Albums => {
                for album in albums::get_all(&self.store).await {
                    writeln!(out, "{}  {} ({} tracks)", album.id, album.name, album.tracks.len())?;
                }
            }
            SessionCommand::Album(id) => {
                let album = albums::get(&self.store, &id)
                    .await
                    .ok_or_else(|| CliError::NotFound(format!("album {id}")))?;
                self.player.select_album(album);
            }
            SessionCommand::ClearAlbum => {
                if !self.player.clear_album() {
                    writeln!(out, "no album selected")?;
                }
            }
            SessionCommand::Rescan => {
                self.player.rescan(self.scanner.as_ref()).await;
            }
            SessionCommand::Fetch(url) => {
                let outcome = self
                    .player
                    .download(self.fetcher.as_ref(), self.scanner.as_ref(), &url)
                    .await;
                if outcome.success {
                    let name = outcome.title.or(outcome.filename).unwrap_or(url);
                    writeln!(out, "downloaded: {name}")?;
                }
            }
            SessionCommand::Delete(id) => self.delete_track(&id).await?,
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(SessionFlow::Quit),
        }
        Ok(SessionFlow::Continue)
    }

    async fn delete_track(&mut self, id: &TrackId) -> Result<()> {
        let track = self
            .player
            .library()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| CliError::NotFound(format!("track {id}")))?;

        if self.player.current_track().is_some_and(|t| &t.id == id) {
            self.player.stop();
        }
        remove_track_file(&self.music_root, &track)?;
        info!(track = %id, "Deleted track file");
        self.player.rescan(self.scanner.as_ref()).await;
        Ok(())
    }

    /// Feed queued engine notifications to the player until none are left
    pub fn pump(&mut self) {
        loop {
            let events = self.engine_mut().take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.player.handle_media_event(event);
            }
        }
    }

    fn engine_mut(&mut self) -> &mut HeadlessEngine {
        self.player.transport_mut().engine_mut()
    }

    fn flush_events<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for event in self.player.drain_events() {
            if let PlayerEvent::Error { message } = &event {
                warn!("{}", message);
            }
            writeln!(out, "{}", describe(&event))?;
        }
        Ok(())
    }

    fn write_playlist<W: Write>(&self, out: &mut W) -> Result<()> {
        let playlist = self.player.playlist();
        if playlist.is_empty() {
            writeln!(out, "playlist is empty")?;
            return Ok(());
        }
        let current = self.player.current_track().map(|t| &t.id);
        for (index, track) in playlist.iter().enumerate() {
            let marker = if Some(&track.id) == current { '>' } else { ' ' };
            writeln!(
                out,
                "{marker} {index:>3}  {}  {} - {}  [{}]",
                track.id, track.artist, track.title, track.album
            )?;
        }
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let track = self
            .player
            .current_track()
            .map_or_else(|| "no track".to_string(), |t| format!("{} - {}", t.artist, t.title));
        format!(
            "{track} | {:?} | {:.1}s ({:.0}%) | vol {} | shuffle {} | repeat {}",
            self.player.transport_state(),
            self.player.current_time(),
            self.player.progress(),
            self.player.volume(),
            on_off(self.player.is_shuffle_enabled()),
            self.player.repeat_mode(),
        )
    }
}

async fn next_change(
    changes: &mut Option<mpsc::Receiver<LibraryChanged>>,
) -> Option<LibraryChanged> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// One-line rendering of a player event
pub fn describe(event: &PlayerEvent) -> String {
    match event {
        PlayerEvent::TrackChanged {
            track_id: Some(id),
            index,
        } => format!("track: #{index} {id}"),
        PlayerEvent::TrackChanged { track_id: None, .. } => "track: none".to_string(),
        PlayerEvent::StateChanged { state, is_playing } => {
            format!("state: {state:?} (playing: {is_playing})")
        }
        PlayerEvent::VolumeChanged { level } => format!("volume: {level}%"),
        PlayerEvent::ShuffleChanged { enabled } => format!("shuffle: {}", on_off(*enabled)),
        PlayerEvent::RepeatChanged { mode } => format!("repeat: {mode}"),
        PlayerEvent::PlaylistChanged { len, album_mode } => format!(
            "playlist: {len} tracks ({})",
            if *album_mode { "album" } else { "library" }
        ),
        PlayerEvent::Error { message } => format!("error: {message}"),
    }
}
