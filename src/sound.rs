//! Tone synthesis and sound cues.
//!
//! A [`Tone`] is a single oscillator note with a short linear attack and an
//! exponential decay, rendered as mono `f32` samples by [`ToneSamples`].
//! Game code never talks to an audio device: it asks for a [`SoundCue`], and
//! the [`ToneScheduler`] expands the cue into timed tones and hands each one
//! to an [`AudioSink`] when it falls due.  Sinks are fire-and-forget and
//! swallow their own failures, so a missing audio device only means silence.

use std::f32::consts::TAU;
use std::time::Duration;

use tracing::trace;

use crate::weapons::WeaponKey;

pub const SAMPLE_RATE: u32 = 44_100;

/// Gain reached at the end of the attack ramp.
pub const PEAK_GAIN: f32 = 0.1;
/// Gain the decay ramp reaches at the end of the tone.
pub const FLOOR_GAIN: f32 = 0.001;
pub const ATTACK_SECS: f32 = 0.01;

// ── Waveforms & tones ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Oscillator value at `phase` (in cycles, wrapped to `[0, 1)`).
    pub fn sample(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Length in seconds.
    pub duration: f32,
    pub waveform: Waveform,
}

impl Tone {
    pub const fn new(frequency: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
        }
    }

    /// Gain at `t` seconds into the tone.  Zero outside `[0, duration)`.
    pub fn envelope(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration {
            return 0.0;
        }
        let attack = ATTACK_SECS.min(self.duration);
        if t < attack {
            return PEAK_GAIN * t / attack;
        }
        let decay_len = self.duration - attack;
        if decay_len <= 0.0 {
            return PEAK_GAIN;
        }
        let progress = (t - attack) / decay_len;
        PEAK_GAIN * (FLOOR_GAIN / PEAK_GAIN).powf(progress)
    }

    pub fn sample_count(&self) -> usize {
        (self.duration.max(0.0) * SAMPLE_RATE as f32).round() as usize
    }

    pub fn samples(&self) -> ToneSamples {
        ToneSamples {
            tone: *self,
            index: 0,
            total: self.sample_count(),
        }
    }
}

/// Finite mono sample stream for one tone.
#[derive(Clone, Debug)]
pub struct ToneSamples {
    tone: Tone,
    index: usize,
    total: usize,
}

impl ToneSamples {
    pub fn remaining(&self) -> usize {
        self.total - self.index
    }
}

impl Iterator for ToneSamples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / SAMPLE_RATE as f32;
        let phase = t * self.tone.frequency;
        self.index += 1;
        Some(self.tone.waveform.sample(phase) * self.tone.envelope(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ToneSamples {}

// ── Cues ─────────────────────────────────────────────────────────────────────

/// A tone and how long after the cue was triggered it should start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledTone {
    pub offset: Duration,
    pub tone: Tone,
}

const fn at(ms: u64, frequency: f32, duration: f32, waveform: Waveform) -> ScheduledTone {
    ScheduledTone {
        offset: Duration::from_millis(ms),
        tone: Tone::new(frequency, duration, waveform),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundCue {
    /// Do-Mi-Sol arpeggio.
    CatcherStart,
    /// Sol-Mi-Do, descending.
    CatcherOver,
    /// Fruit caught.
    Good,
    /// Bomb caught.
    Bad,
    ShooterStart,
    ShooterOver,
    PlayerHit,
    EnemyDeath,
    Pickup,
    Shot(WeaponKey),
}

impl SoundCue {
    pub fn notes(self) -> Vec<ScheduledTone> {
        use Waveform::*;
        match self {
            SoundCue::CatcherStart => vec![
                at(0, 523.25, 0.1, Sine),
                at(100, 659.25, 0.1, Sine),
                at(200, 783.99, 0.3, Sine),
            ],
            SoundCue::CatcherOver => vec![
                at(0, 783.99, 0.1, Triangle),
                at(100, 659.25, 0.1, Triangle),
                at(200, 523.25, 0.5, Triangle),
            ],
            SoundCue::Good => vec![at(0, 880.0, 0.1, Sine), at(100, 1760.0, 0.1, Sine)],
            SoundCue::Bad => vec![at(0, 150.0, 0.4, Sawtooth)],
            SoundCue::ShooterStart => vec![at(0, 600.0, 0.5, Sine)],
            SoundCue::ShooterOver => vec![at(0, 100.0, 1.0, Sawtooth)],
            SoundCue::PlayerHit => vec![at(0, 100.0, 0.3, Sawtooth)],
            SoundCue::EnemyDeath => vec![at(0, 200.0, 0.1, Sawtooth)],
            SoundCue::Pickup => vec![at(0, 600.0, 0.1, Sine)],
            SoundCue::Shot(key) => vec![ScheduledTone {
                offset: Duration::ZERO,
                tone: key.shot_tone(),
            }],
        }
    }
}

// ── Sinks ────────────────────────────────────────────────────────────────────

/// Something that can start playing a tone right now.
///
/// Implementations must return immediately and must not report errors.
pub trait AudioSink {
    fn play_tone(&mut self, tone: Tone);
}

/// Discards every tone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play_tone(&mut self, _tone: Tone) {}
}

// ── Scheduler ────────────────────────────────────────────────────────────────

/// Expands cues into tones and releases them to the sink on time.
///
/// The scheduler has its own clock, advanced by the host with
/// [`ToneScheduler::advance`]; it knows nothing about simulation ticks.
pub struct ToneScheduler {
    sink: Box<dyn AudioSink>,
    clock: Duration,
    /// Tones waiting for their start time, unordered.
    pending: Vec<(Duration, Tone)>,
}

impl ToneScheduler {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            clock: Duration::ZERO,
            pending: Vec::new(),
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentSink))
    }

    /// Play a single tone immediately.
    pub fn play_tone(&mut self, frequency: f32, duration: f32, waveform: Waveform) {
        self.sink.play_tone(Tone::new(frequency, duration, waveform));
    }

    /// Queue every note of `cue`; notes with zero offset start right away.
    pub fn play(&mut self, cue: SoundCue) {
        trace!(?cue, "sound cue");
        for note in cue.notes() {
            self.pending.push((self.clock + note.offset, note.tone));
        }
        self.flush();
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock += dt;
        self.flush();
    }

    /// Drop every tone that has not started yet.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn flush(&mut self) {
        let now = self.clock;
        let mut due: Vec<(Duration, Tone)> = Vec::new();
        self.pending.retain(|&(at, tone)| {
            if at <= now {
                due.push((at, tone));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(at, _)| at);
        for (_, tone) in due {
            self.sink.play_tone(tone);
        }
    }
}
