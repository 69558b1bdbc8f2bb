//! Audio system using Web Audio API
//!
//! Procedurally generated sound - no external files needed! The background
//! rain is filtered noise in a looping buffer; the catch sound is a short
//! falling sine "bloop".
//!
//! Only `AudioManager` and the node plumbing are web-only; the rain schedule
//! and noise generator are plain Rust.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

#[cfg(target_arch = "wasm32")]
use crate::settings::Settings;

/// Length of the looping rain buffer (seconds)
const RAIN_LOOP_SECS: f32 = 4.0;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Raindrop landed in the bucket
    Catch,
    /// Raindrop hit the ground
    Splash,
}

/// What to do with the rain loop to match the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainAction {
    Start,
    Stop,
}

/// Whether the background rain should be audible
///
/// The loop is requested on the first user gesture, torn down while the page
/// is hidden and rebuilt when it becomes visible again.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RainSchedule {
    requested: bool,
    hidden: bool,
}

impl RainSchedule {
    /// User gesture asked for the rain (repeat calls are harmless)
    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn should_play(&self) -> bool {
        self.requested && !self.hidden
    }

    /// Action needed given whether a loop is currently playing
    pub fn action(&self, playing: bool) -> Option<RainAction> {
        match (self.should_play(), playing) {
            (true, false) => Some(RainAction::Start),
            (false, true) => Some(RainAction::Stop),
            _ => None,
        }
    }
}

/// The playing rain loop and its gain node
#[cfg(target_arch = "wasm32")]
struct RainLoop {
    source: AudioBufferSourceNode,
    gain: GainNode,
}

/// Audio manager for the game
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    rain: Option<RainLoop>,
    schedule: RainSchedule,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            rain: None,
            schedule: RainSchedule::default(),
            music_volume: settings.effective_music_volume(),
            sfx_volume: settings.effective_sfx_volume(),
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Suspend audio context (screen hidden)
    pub fn suspend(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    /// Re-read volumes from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_volume = settings.effective_music_volume();
        self.sfx_volume = settings.effective_sfx_volume();
        self.update_rain_gain();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.update_rain_gain();
    }

    fn music_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    fn update_rain_gain(&self) {
        if let Some(rain) = &self.rain {
            rain.gain.gain().set_value(self.music_gain());
        }
    }

    /// Ask for the looping background rain (no-op if already playing)
    pub fn start_rain_loop(&mut self) {
        self.schedule.request();
        self.sync_rain();
    }

    /// Page hidden: release the rain loop until it is shown again
    pub fn hide(&mut self) {
        self.schedule.set_hidden(true);
        self.sync_rain();
    }

    /// Page visible: rebuild the rain loop if it was playing before
    pub fn show(&mut self) {
        self.schedule.set_hidden(false);
        self.sync_rain();
    }

    fn sync_rain(&mut self) {
        match self.schedule.action(self.rain.is_some()) {
            Some(RainAction::Start) => self.build_rain(),
            Some(RainAction::Stop) => self.stop_rain_loop(),
            None => {}
        }
    }

    fn build_rain(&mut self) {
        let Some(ctx) = &self.ctx else { return };

        match build_rain_loop(ctx, self.music_gain()) {
            Some(rain) => {
                self.rain = Some(rain);
                log::info!("Rain loop started");
            }
            None => log::warn!("Could not start rain loop"),
        }
    }

    /// Stop and release the background rain
    pub fn stop_rain_loop(&mut self) {
        if let Some(rain) = self.rain.take() {
            let _ = rain.source.stop();
            let _ = rain.source.disconnect();
            log::info!("Rain loop stopped");
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_gain();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Catch => play_catch(ctx, vol),
            SoundEffect::Splash => play_splash(ctx, vol),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for AudioManager {
    fn drop(&mut self) {
        self.stop_rain_loop();
        if let Some(ctx) = &self.ctx {
            let _ = ctx.close();
        }
    }
}

/// Create an oscillator with gain envelope
#[cfg(target_arch = "wasm32")]
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Catch - water drop "bloop", pitch falling fast
#[cfg(target_arch = "wasm32")]
fn play_catch(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 1200.0, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.5, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
        .ok();
    osc.frequency().set_value_at_time(1200.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(350.0, t + 0.08)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.15).ok();
}

/// Splash - soft low thud
#[cfg(target_arch = "wasm32")]
fn play_splash(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 180.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.15, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.1)
        .ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(90.0, t + 0.1)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.12).ok();
}

/// Fill a buffer with brown-ish noise, low-pass it, and loop it
#[cfg(target_arch = "wasm32")]
fn build_rain_loop(ctx: &AudioContext, volume: f32) -> Option<RainLoop> {
    let sample_rate = ctx.sample_rate();
    let length = (sample_rate * RAIN_LOOP_SECS) as u32;
    let buffer: AudioBuffer = ctx.create_buffer(1, length, sample_rate).ok()?;

    let mut samples = rain_noise(length as usize, 0x5EED);
    buffer.copy_to_channel(&mut samples, 0).ok()?;

    let source = ctx.create_buffer_source().ok()?;
    source.set_buffer(Some(&buffer));
    source.set_loop(true);

    let filter = ctx.create_biquad_filter().ok()?;
    filter.set_type(BiquadFilterType::Lowpass);
    filter.frequency().set_value(1800.0);

    let gain = ctx.create_gain().ok()?;
    gain.gain().set_value(volume);

    source.connect_with_audio_node(&filter).ok()?;
    filter.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    source.start().ok()?;

    Some(RainLoop { source, gain })
}

/// Leaky-integrated white noise with occasional droplet ticks
pub fn rain_noise(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut last = 0.0f32;
    let mut samples = Vec::with_capacity(len);
    for _ in 0..len {
        let white: f32 = rng.random_range(-1.0..1.0);
        last = (last + 0.02 * white) / 1.02;
        let mut sample = last * 3.5;
        if rng.random_ratio(1, 4000) {
            sample += rng.random_range(-0.3..0.3);
        }
        samples.push(sample.clamp(-1.0, 1.0));
    }

    // Crossfade the ends so the loop point does not click
    let fade = (len / 100).min(len / 2);
    for i in 0..fade {
        let t = i as f32 / fade as f32;
        let j = len - fade + i;
        samples[j] = samples[j] * (1.0 - t) + samples[i] * t;
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_waits_for_request() {
        let schedule = RainSchedule::default();
        assert!(!schedule.should_play());
        assert_eq!(schedule.action(false), None);
    }

    #[test]
    fn test_hide_stops_and_show_restarts() {
        let mut schedule = RainSchedule::default();
        schedule.request();
        assert_eq!(schedule.action(false), Some(RainAction::Start));
        assert_eq!(schedule.action(true), None);

        schedule.set_hidden(true);
        assert_eq!(schedule.action(true), Some(RainAction::Stop));
        assert_eq!(schedule.action(false), None);

        schedule.set_hidden(false);
        assert_eq!(schedule.action(false), Some(RainAction::Start));
    }

    #[test]
    fn test_request_while_hidden_waits_for_show() {
        let mut schedule = RainSchedule::default();
        schedule.set_hidden(true);
        schedule.request();
        assert_eq!(schedule.action(false), None);
        schedule.set_hidden(false);
        assert_eq!(schedule.action(false), Some(RainAction::Start));
    }

    #[test]
    fn test_rain_noise_in_range() {
        let samples = rain_noise(48_000, 7);
        assert_eq!(samples.len(), 48_000);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(samples.iter().any(|s| *s != 0.0));
        assert_eq!(samples, rain_noise(48_000, 7));
    }
}
