//! Terminal audio player with a live peak-meter spectrum.
//!
//! Decoded PCM frames run through a fixed pipeline (normalize, window, FFT,
//! magnitudes, banding, peak falloff) on the playback thread; the render loop
//! picks up the latest result from a single-slot cell.

pub mod app;
pub mod audio;
pub mod data;
pub mod playback;
pub mod render;
pub mod ui;
pub mod utils;
