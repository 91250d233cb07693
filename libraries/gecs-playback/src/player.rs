//! Player - core orchestration
//!
//! Ties playlist selection, navigation, shuffle/repeat sequencing and the
//! transport together, and persists user-facing settings on every change.

use crate::{
    events::PlayerEvent,
    media::{MediaEngine, MediaEvent},
    navigation::Navigator,
    playlist::PlaylistSelection,
    shuffle::ShuffleSequencer,
    transport::{Transport, TransportAction},
    types::{ResumePoint, ScanTicket, TransportState},
};
use gecs_core::{
    Album, AppState, FetchOutcome, LibraryScanner, RepeatMode, Track, TrackFetcher, TrackId,
};
use gecs_storage::{app_state, StateStore};
use tracing::{debug, error, info, warn};

/// Playback orchestrator
///
/// All mutation happens through `&mut self`, one event at a time. Results of
/// asynchronous work (rescans, downloads) are re-validated before they are
/// applied: a rescan older than the newest applied one is dropped, and a
/// saved playback position is only restored onto the same track.
pub struct Player<E: MediaEngine> {
    transport: Transport<E>,
    navigator: Navigator,
    selection: PlaylistSelection,
    shuffle: ShuffleSequencer,
    repeat: RepeatMode,
    store: StateStore,

    /// Last issued rescan generation
    issued_scan: u64,

    /// Newest rescan generation whose results were applied
    applied_scan: u64,

    pending_events: Vec<PlayerEvent>,
}

impl<E: MediaEngine> Player<E> {
    /// Create a player with an empty library and default settings
    ///
    /// Call [`restore`](Self::restore) once at startup to apply persisted
    /// settings.
    pub fn new(engine: E, store: StateStore) -> Self {
        Self::with_shuffle(engine, store, ShuffleSequencer::new())
    }

    /// Create a player with a specific shuffle sequencer (e.g. seeded)
    pub fn with_shuffle(engine: E, store: StateStore, shuffle: ShuffleSequencer) -> Self {
        Self {
            transport: Transport::new(engine),
            navigator: Navigator::new(),
            selection: PlaylistSelection::default(),
            shuffle,
            repeat: RepeatMode::default(),
            store,
            issued_scan: 0,
            applied_scan: 0,
            pending_events: Vec::new(),
        }
    }

    /// Apply the persisted volume, shuffle flag and repeat mode
    ///
    /// Missing or unreadable state falls back to the defaults.
    pub async fn restore(&mut self) -> AppState {
        let state = app_state::get(&self.store).await;
        info!(
            volume = state.volume,
            shuffle = state.shuffle,
            repeat = %state.repeat_mode,
            "Restored app state"
        );

        let level = self.transport.set_volume(state.volume);
        self.shuffle.restore(state.shuffle);
        self.repeat = state.repeat_mode;

        self.pending_events.push(PlayerEvent::VolumeChanged { level });
        self.pending_events.push(PlayerEvent::ShuffleChanged {
            enabled: state.shuffle,
        });
        self.pending_events.push(PlayerEvent::RepeatChanged {
            mode: state.repeat_mode,
        });
        state
    }

    // ===== Settings =====

    /// Flip shuffle and persist the flag
    pub async fn toggle_shuffle(&mut self) -> bool {
        let enabled = self.shuffle.toggle(self.selection.active().len());
        debug!(enabled, "Shuffle toggled");
        self.pending_events
            .push(PlayerEvent::ShuffleChanged { enabled });
        self.persist(|s| s.shuffle = enabled).await;
        enabled
    }

    /// Rotate the repeat mode and persist it
    pub async fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.repeat.cycle();
        self.repeat = mode;
        debug!(mode = %mode, "Repeat mode cycled");
        self.pending_events.push(PlayerEvent::RepeatChanged { mode });
        self.persist(|s| s.repeat_mode = mode).await;
        mode
    }

    /// Set the volume percentage (clamped to 100) and persist it
    pub async fn set_volume(&mut self, level: u8) -> u8 {
        let level = self.transport.set_volume(level);
        self.pending_events.push(PlayerEvent::VolumeChanged { level });
        self.persist(|s| s.volume = level).await;
        level
    }

    async fn persist<F>(&mut self, change: F)
    where
        F: FnOnce(&mut AppState),
    {
        if let Err(e) = app_state::update(&self.store, change).await {
            error!("Failed to save app state: {}", e);
            self.pending_events.push(PlayerEvent::Error {
                message: format!("Failed to save settings: {e}"),
            });
        }
    }

    // ===== Navigation =====

    /// Advance to the next track (shuffle-aware, wraps)
    pub fn next(&mut self) -> bool {
        let changed = self
            .navigator
            .next(self.selection.active(), &mut self.shuffle);
        if changed {
            self.on_track_changed();
        }
        changed
    }

    /// Step back one track (always sequential, wraps)
    pub fn previous(&mut self) -> bool {
        let changed = self.navigator.previous(self.selection.active());
        if changed {
            self.on_track_changed();
        }
        changed
    }

    /// Jump to a playlist index; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        let changed = self.navigator.select(self.selection.active(), index);
        if changed {
            self.on_track_changed();
        }
        changed
    }

    // ===== Playlist =====

    /// Make an album the active playlist, starting at its first track
    ///
    /// An album without tracks behaves like [`clear_album`](Self::clear_album).
    pub fn select_album(&mut self, album: Album) {
        info!(album_id = %album.id, name = %album.name, "Selecting album");
        self.selection.select_album(album);
        self.reset_position();
    }

    /// Return to the full library, starting at its first track
    pub fn clear_album(&mut self) -> bool {
        let cleared = self.selection.clear_album();
        if cleared {
            self.reset_position();
        }
        cleared
    }

    /// Reserve a generation for a rescan about to start
    pub fn begin_rescan(&mut self) -> ScanTicket {
        self.issued_scan += 1;
        ScanTicket(self.issued_scan)
    }

    /// Apply rescan results
    ///
    /// Results older than the newest applied rescan are dropped and `false`
    /// is returned.
    pub fn apply_scan(&mut self, ticket: ScanTicket, tracks: Vec<Track>) -> bool {
        self.apply_scan_keeping(ticket, tracks, None)
    }

    /// Apply rescan results, moving to `keep` if it is in the new library
    fn apply_scan_keeping(
        &mut self,
        ticket: ScanTicket,
        tracks: Vec<Track>,
        keep: Option<&TrackId>,
    ) -> bool {
        if ticket.0 < self.applied_scan {
            debug!(
                ticket = ticket.0,
                applied = self.applied_scan,
                "Dropping stale scan results"
            );
            return false;
        }
        self.applied_scan = ticket.0;

        info!(tracks = tracks.len(), "Library updated");
        if !self.selection.set_library(tracks) {
            return true;
        }

        let before = self.position();
        if let Some(index) = keep.and_then(|id| self.selection.position_of(id)) {
            self.navigator.jump_to(self.selection.active(), index);
        }
        self.navigator.sync_to_playlist(self.selection.active());

        self.emit_playlist_changed();
        if self.position() != before || self.needs_reload() {
            self.on_track_changed();
        }
        true
    }

    /// Rescan the library through `scanner` and apply the results
    ///
    /// A failed scan is logged and yields an empty library.
    pub async fn rescan(&mut self, scanner: &dyn LibraryScanner) -> bool {
        let ticket = self.begin_rescan();
        let tracks = self.scan_or_empty(scanner).await;
        self.apply_scan(ticket, tracks)
    }

    async fn scan_or_empty(&mut self, scanner: &dyn LibraryScanner) -> Vec<Track> {
        match scanner.scan().await {
            Ok(tracks) => tracks,
            Err(e) => {
                error!("Library scan failed: {}", e);
                self.pending_events.push(PlayerEvent::Error {
                    message: format!("Library scan failed: {e}"),
                });
                Vec::new()
            }
        }
    }

    // ===== Downloads =====

    /// Snapshot the current track, position and playing flag
    pub fn resume_point(&self) -> ResumePoint {
        ResumePoint {
            track_id: self.navigator.current_track().map(|t| t.id.clone()),
            position: self.transport.current_time(),
            was_playing: self.transport.is_playing(),
        }
    }

    /// Apply a post-download rescan and pick playback back up
    ///
    /// If playback was running, the same track is re-located in the new
    /// playlist; when it is still current afterwards, the saved position is
    /// restored and playback resumed.
    pub fn finish_download(
        &mut self,
        point: &ResumePoint,
        ticket: ScanTicket,
        tracks: Vec<Track>,
    ) -> bool {
        let keep = point.track_id.as_ref().filter(|_| point.was_playing);
        if !self.apply_scan_keeping(ticket, tracks, keep) {
            return false;
        }

        let Some(id) = keep else {
            return true;
        };

        let still_current = self
            .navigator
            .current_track()
            .is_some_and(|t| &t.id == id);
        if still_current {
            let before = self.snapshot();
            if let Err(e) = self.transport.seek(point.position) {
                warn!("Could not restore position: {}", e);
            }
            if let Err(e) = self.transport.resume() {
                warn!("Could not resume after download: {}", e);
            }
            self.emit_state_if_changed(before);
        }
        true
    }

    /// Download `url` through `fetcher`, then rescan and resume
    pub async fn download(
        &mut self,
        fetcher: &dyn TrackFetcher,
        scanner: &dyn LibraryScanner,
        url: &str,
    ) -> FetchOutcome {
        info!(url, "Starting download");
        let outcome = fetcher.download(url).await;
        if !outcome.success {
            let message = outcome
                .error
                .clone()
                .unwrap_or_else(|| "Download failed".to_string());
            warn!("Download failed: {}", message);
            self.pending_events.push(PlayerEvent::Error { message });
            return outcome;
        }

        info!(filename = ?outcome.filename, "Download complete");
        let point = self.resume_point();
        let ticket = self.begin_rescan();
        let tracks = self.scan_or_empty(scanner).await;
        self.finish_download(&point, ticket, tracks);
        outcome
    }

    // ===== Transport =====

    /// Feed a media engine notification
    ///
    /// End-of-track either replays (repeat one) or advances like `next`.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        let before = self.snapshot();
        let action = self.transport.handle_media_event(event, self.repeat);
        self.emit_state_if_changed(before);

        if action == Some(TransportAction::Advance) {
            self.next();
        }
    }

    /// Toggle play/pause, returning the new playing flag
    pub fn play_pause(&mut self) -> bool {
        let before = self.snapshot();
        if let Err(e) = self.transport.play_pause() {
            warn!("Play/pause failed: {}", e);
        }
        self.emit_state_if_changed(before);
        self.transport.is_playing()
    }

    /// Move the playback position
    pub fn seek(&mut self, seconds: f64) {
        if let Err(e) = self.transport.seek(seconds) {
            debug!("Seek ignored: {}", e);
        }
    }

    /// Begin a scrub-drag; returns whether playback was running
    pub fn drag_start(&mut self) -> bool {
        let before = self.snapshot();
        let was_playing = self.transport.drag_start();
        self.emit_state_if_changed(before);
        was_playing
    }

    /// End a scrub-drag, resuming playback
    pub fn drag_end(&mut self) {
        self.resume();
    }

    pub fn stop(&mut self) {
        let before = self.snapshot();
        self.transport.stop();
        self.emit_state_if_changed(before);
    }

    pub fn pause(&mut self) {
        let before = self.snapshot();
        self.transport.pause();
        self.emit_state_if_changed(before);
    }

    pub fn resume(&mut self) {
        let before = self.snapshot();
        if let Err(e) = self.transport.resume() {
            warn!("Resume failed: {}", e);
        }
        self.emit_state_if_changed(before);
    }

    // ===== Accessors =====

    pub fn current_track(&self) -> Option<&Track> {
        self.navigator.current_track()
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    /// Tracks currently driving navigation
    pub fn playlist(&self) -> &[Track] {
        self.selection.active()
    }

    pub fn library(&self) -> &[Track] {
        self.selection.library()
    }

    pub fn selected_album(&self) -> Option<&Album> {
        self.selection.album()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn current_time(&self) -> f64 {
        self.transport.current_time()
    }

    /// Playback position as a percentage of the track duration
    pub fn progress(&self) -> f64 {
        self.transport.progress()
    }

    pub fn volume(&self) -> u8 {
        self.transport.volume().level()
    }

    pub fn is_shuffle_enabled(&self) -> bool {
        self.shuffle.is_enabled()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn transport(&self) -> &Transport<E> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport<E> {
        &mut self.transport
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn reset_position(&mut self) {
        self.navigator.reset(self.selection.active());
        self.emit_playlist_changed();
        self.on_track_changed();
    }

    fn position(&self) -> (usize, Option<TrackId>) {
        (
            self.navigator.current_index(),
            self.navigator.current_track().map(|t| t.id.clone()),
        )
    }

    fn needs_reload(&self) -> bool {
        let wanted = self.navigator.current_track().map(|t| t.file_path.as_path());
        wanted != self.transport.source_path()
    }

    /// Record the new current track and reload the transport if its source
    /// differs from the attached one
    fn on_track_changed(&mut self) {
        let track = self.navigator.current_track().cloned();
        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: track.as_ref().map(|t| t.id.clone()),
            index: self.navigator.current_index(),
        });

        if !self.needs_reload() {
            return;
        }

        let before = self.snapshot();
        if let Err(e) = self.transport.load(track.as_ref()) {
            error!("Failed to load track: {}", e);
            self.pending_events.push(PlayerEvent::Error {
                message: format!("Failed to load track: {e}"),
            });
        }
        self.emit_state_if_changed(before);
    }

    fn emit_playlist_changed(&mut self) {
        self.pending_events.push(PlayerEvent::PlaylistChanged {
            len: self.selection.active().len(),
            album_mode: self.selection.is_album_mode(),
        });
    }

    fn snapshot(&self) -> (TransportState, bool) {
        (self.transport.state(), self.transport.is_playing())
    }

    fn emit_state_if_changed(&mut self, before: (TransportState, bool)) {
        let (state, is_playing) = self.snapshot();
        if (state, is_playing) != before {
            self.pending_events
                .push(PlayerEvent::StateChanged { state, is_playing });
        }
    }
}
