use crate::app::player::{DeviceRunner, Player, SessionEvent};
use crate::app::state::{AppState, PlaybackStatus};
use crate::audio::SpectrumSnapshot;
use crate::playback::SessionEnd;
use crate::render::spectrum_renderer::{Renderer, TerminalRenderer};
use crate::utils::input::{map_key, Action};
use anyhow::Result;
use crossterm::event::{self, Event};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Render loop: the only place that draws. Analysis runs on the player's
/// worker thread and hands snapshots over through the slot.
pub fn run(app: &mut AppState) -> Result<()> {
    let runner = Arc::new(DeviceRunner::new(app.config.analysis.clone()));
    let mut player = Player::new(runner);

    let mut renderer = TerminalRenderer::new(app.config.analysis.max_column_width)?;
    renderer.enter()?;

    play_next(app, &mut player);
    let res = drive(app, &mut player, &mut renderer);

    player.stop();
    renderer.exit()?;
    res
}

fn drive(app: &mut AppState, player: &mut Player, renderer: &mut impl Renderer) -> Result<()> {
    let slot = player.slot();
    let frame_dt = fps_to_dt(app.config.ui_fps);

    while !app.should_quit {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(k) = event::read()? {
                handle_action(app, player, map_key(k));
            }
        }

        pump_session_events(app, player);

        if let Some(snapshot) = slot.take() {
            app.spectrum = snapshot;
        }
        renderer.render(&app.spectrum, &app.label())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dt {
            std::thread::sleep(frame_dt - elapsed);
        }
    }
    Ok(())
}

fn fps_to_dt(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / fps.clamp(1, 240) as u64)
}

fn handle_action(app: &mut AppState, player: &mut Player, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::Next => play_next(app, player),
        Action::Stop => {
            player.stop();
            app.status = PlaybackStatus::Idle;
            app.spectrum = SpectrumSnapshot::zeroed(app.spectrum.values.len());
        }
        Action::Restart => {
            if let Some(path) = app.playlist.current_path().cloned() {
                player.swap(&path);
            }
        }
        Action::None => {}
    }
}

fn pump_session_events(app: &mut AppState, player: &mut Player) {
    for ev in player.drain_events() {
        handle_session_event(app, player, ev);
    }
}

fn handle_session_event(app: &mut AppState, player: &mut Player, ev: SessionEvent) {
    match ev {
        SessionEvent::Started { .. } => app.status = PlaybackStatus::Playing,
        SessionEvent::Ended { end: SessionEnd::EndOfStream, .. } => {
            app.status = PlaybackStatus::Idle;
            play_next(app, player);
        }
        SessionEvent::Ended { end: SessionEnd::Stopped, .. } => {}
        SessionEvent::Failed { error, .. } => {
            app.status = PlaybackStatus::Failed(error);
        }
    }
}

fn play_next(app: &mut AppState, player: &mut Player) {
    let Some(idx) = app.playlist.next_index_sequence() else {
        log::info!("end of playlist");
        return;
    };
    app.playlist.current = Some(idx);
    if let Some(path) = app.playlist.current_path().cloned() {
        player.swap(&path);
    }
}
