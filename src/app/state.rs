use crate::audio::SpectrumSnapshot;
use crate::data::config::Config;
use crate::data::playlist::Playlist;
use crate::utils::timefmt::mmss;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Failed(String),
}

pub struct AppState {
    pub config: Config,
    pub playlist: Playlist,
    pub status: PlaybackStatus,
    /// Last snapshot taken from the slot; redrawn until a newer one arrives.
    pub spectrum: SpectrumSnapshot,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config: Config, playlist: Playlist) -> Self {
        Self {
            config,
            playlist,
            status: PlaybackStatus::Idle,
            spectrum: SpectrumSnapshot::zeroed(0),
            should_quit: false,
        }
    }

    /// Header shown above the spectrum.
    pub fn label(&self) -> String {
        match (&self.status, self.playlist.current_item()) {
            (PlaybackStatus::Playing, Some(item)) => {
                format!("> Now playing: {}  {}", item.title, mmss(self.spectrum.position))
            }
            (PlaybackStatus::Failed(e), Some(item)) => format!("! {}: {e}", item.title),
            (PlaybackStatus::Failed(e), None) => format!("! {e}"),
            _ => "Idle  (n: play next, q: quit)".to_string(),
        }
    }
}
