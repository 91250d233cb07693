//! Headless media engine
//!
//! Stands in for a real audio output: it accepts sources, keeps a clock, and
//! queues the notifications a platform player would send. Nothing is decoded.

use gecs_playback::{MediaEngine, MediaEvent};
use std::collections::VecDeque;
use url::Url;

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    source: Option<Url>,
    playing: bool,
    position: f64,
    amplitude: f32,
    pending: VecDeque<MediaEvent>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Advance the clock while playing and report the new position
    pub fn tick(&mut self, seconds: f64) {
        if self.playing && seconds > 0.0 {
            self.position += seconds;
            self.pending.push_back(MediaEvent::TimeUpdate(self.position));
        }
    }

    /// Simulate the source running out
    pub fn finish(&mut self) {
        if self.source.is_some() {
            self.playing = false;
            self.pending.push_back(MediaEvent::Ended);
        }
    }

    /// Queued notifications, oldest first
    pub fn take_events(&mut self) -> Vec<MediaEvent> {
        self.pending.drain(..).collect()
    }
}

impl MediaEngine for HeadlessEngine {
    fn set_source(&mut self, url: &Url) {
        self.source = Some(url.clone());
    }

    fn load(&mut self) {
        self.playing = false;
        self.position = 0.0;
        if self.source.is_some() {
            self.pending.push_back(MediaEvent::CanPlay);
        }
    }

    fn play(&mut self) -> gecs_playback::Result<()> {
        if self.source.is_none() {
            return Err(gecs_playback::PlaybackError::NoTrackLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
        self.pending.push_back(MediaEvent::TimeUpdate(self.position));
    }

    fn set_volume(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> HeadlessEngine {
        let mut engine = HeadlessEngine::new();
        engine.set_source(&Url::parse("file:///music/a.mp3").unwrap());
        engine.load();
        engine
    }

    #[test]
    fn test_load_queues_can_play() {
        let mut engine = loaded();
        assert_eq!(engine.take_events(), vec![MediaEvent::CanPlay]);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_play_without_source_is_refused() {
        let mut engine = HeadlessEngine::new();
        assert!(engine.play().is_err());
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_tick_only_moves_while_playing() {
        let mut engine = loaded();
        engine.take_events();

        engine.tick(5.0);
        assert_eq!(engine.current_time(), 0.0);

        engine.play().unwrap();
        engine.tick(5.0);
        assert_eq!(engine.current_time(), 5.0);
        assert_eq!(engine.take_events(), vec![MediaEvent::TimeUpdate(5.0)]);
    }

    #[test]
    fn test_finish_stops_and_reports_end() {
        let mut engine = loaded();
        engine.play().unwrap();
        engine.take_events();

        engine.finish();
        assert!(!engine.is_playing());
        assert_eq!(engine.take_events(), vec![MediaEvent::Ended]);
    }
}
