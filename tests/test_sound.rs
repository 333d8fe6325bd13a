use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pose_arcade::sound::*;
use pose_arcade::weapons::WeaponKey;

/// Sink that remembers every tone it was asked to play.
#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Tone>>>);

impl AudioSink for Recorder {
    fn play_tone(&mut self, tone: Tone) {
        self.0.borrow_mut().push(tone);
    }
}

impl Recorder {
    fn frequencies(&self) -> Vec<f32> {
        self.0.borrow().iter().map(|t| t.frequency).collect()
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

// ── waveforms ─────────────────────────────────────────────────────────────────

#[test]
fn waveform_shapes() {
    assert!(close(Waveform::Sine.sample(0.25), 1.0));
    assert!(close(Waveform::Sine.sample(0.0), 0.0));
    assert_eq!(Waveform::Square.sample(0.25), 1.0);
    assert_eq!(Waveform::Square.sample(0.75), -1.0);
    assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
    assert!(close(Waveform::Sawtooth.sample(0.75), 0.5));
    assert_eq!(Waveform::Triangle.sample(0.5), 1.0);
    assert_eq!(Waveform::Triangle.sample(0.0), -1.0);
}

#[test]
fn waveform_phase_wraps() {
    assert!(close(Waveform::Sawtooth.sample(1.75), Waveform::Sawtooth.sample(0.75)));
}

// ── envelope ──────────────────────────────────────────────────────────────────

#[test]
fn envelope_attack_is_linear() {
    let tone = Tone::new(440.0, 0.5, Waveform::Sine);
    assert_eq!(tone.envelope(0.0), 0.0);
    assert!(close(tone.envelope(ATTACK_SECS / 2.0), PEAK_GAIN / 2.0));
    assert!(close(tone.envelope(ATTACK_SECS), PEAK_GAIN));
}

#[test]
fn envelope_decays_toward_floor() {
    let tone = Tone::new(440.0, 0.5, Waveform::Sine);
    let mut last = tone.envelope(ATTACK_SECS);
    let mut t = ATTACK_SECS;
    while t < 0.49 {
        t += 0.01;
        let g = tone.envelope(t);
        assert!(g < last);
        last = g;
    }
    let end = tone.envelope(0.4999);
    assert!(end > FLOOR_GAIN * 0.9 && end < FLOOR_GAIN * 1.1, "{}", end);
}

#[test]
fn envelope_is_silent_outside_the_tone() {
    let tone = Tone::new(440.0, 0.2, Waveform::Square);
    assert_eq!(tone.envelope(-0.1), 0.0);
    assert_eq!(tone.envelope(0.2), 0.0);
    assert_eq!(tone.envelope(3.0), 0.0);
}

// ── samples ───────────────────────────────────────────────────────────────────

#[test]
fn samples_cover_the_duration() {
    let tone = Tone::new(440.0, 0.1, Waveform::Sawtooth);
    assert_eq!(tone.sample_count(), 4410);
    let samples = tone.samples();
    assert_eq!(samples.len(), 4410);
    let all: Vec<f32> = samples.collect();
    assert_eq!(all.len(), 4410);
    assert_eq!(all[0], 0.0);
    assert!(all.iter().all(|s| s.abs() <= PEAK_GAIN + 1e-6));
}

#[test]
fn samples_remaining_counts_down() {
    let mut samples = Tone::new(100.0, 0.01, Waveform::Sine).samples();
    let total = samples.remaining();
    samples.next();
    samples.next();
    assert_eq!(samples.remaining(), total - 2);
}

// ── cues ──────────────────────────────────────────────────────────────────────

#[test]
fn catcher_start_is_a_rising_arpeggio() {
    let notes = SoundCue::CatcherStart.notes();
    let offsets: Vec<u64> = notes.iter().map(|n| n.offset.as_millis() as u64).collect();
    assert_eq!(offsets, vec![0, 100, 200]);
    assert!(notes.windows(2).all(|w| w[0].tone.frequency < w[1].tone.frequency));
}

#[test]
fn catcher_over_descends() {
    let notes = SoundCue::CatcherOver.notes();
    assert_eq!(notes.len(), 3);
    assert!(notes.windows(2).all(|w| w[0].tone.frequency > w[1].tone.frequency));
}

#[test]
fn shooter_cues() {
    assert_eq!(
        SoundCue::ShooterStart.notes()[0].tone,
        Tone::new(600.0, 0.5, Waveform::Sine)
    );
    assert_eq!(
        SoundCue::ShooterOver.notes()[0].tone,
        Tone::new(100.0, 1.0, Waveform::Sawtooth)
    );
    assert_eq!(
        SoundCue::PlayerHit.notes()[0].tone,
        Tone::new(100.0, 0.3, Waveform::Sawtooth)
    );
}

#[test]
fn shot_cue_uses_the_weapon_tone() {
    for key in WeaponKey::ALL {
        let notes = SoundCue::Shot(key).notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].offset, Duration::ZERO);
        assert_eq!(notes[0].tone, key.shot_tone());
    }
}

// ── scheduler ─────────────────────────────────────────────────────────────────

#[test]
fn scheduler_releases_notes_on_time() {
    let rec = Recorder::default();
    let mut sched = ToneScheduler::new(Box::new(rec.clone()));
    sched.play(SoundCue::CatcherStart);
    assert_eq!(rec.frequencies(), vec![523.25]);
    assert_eq!(sched.pending(), 2);

    sched.advance(Duration::from_millis(99));
    assert_eq!(rec.frequencies().len(), 1);
    sched.advance(Duration::from_millis(1));
    assert_eq!(rec.frequencies(), vec![523.25, 659.25]);
    sched.advance(Duration::from_millis(500));
    assert_eq!(rec.frequencies(), vec![523.25, 659.25, 783.99]);
    assert_eq!(sched.pending(), 0);
}

#[test]
fn late_advance_plays_notes_in_order() {
    let rec = Recorder::default();
    let mut sched = ToneScheduler::new(Box::new(rec.clone()));
    sched.play(SoundCue::CatcherOver);
    sched.advance(Duration::from_secs(1));
    assert_eq!(rec.frequencies(), vec![783.99, 659.25, 523.25]);
}

#[test]
fn clear_drops_pending_notes() {
    let rec = Recorder::default();
    let mut sched = ToneScheduler::new(Box::new(rec.clone()));
    sched.play(SoundCue::Good);
    sched.clear();
    assert_eq!(sched.pending(), 0);
    sched.advance(Duration::from_secs(1));
    assert_eq!(rec.frequencies(), vec![880.0]);
}

#[test]
fn play_tone_is_immediate() {
    let rec = Recorder::default();
    let mut sched = ToneScheduler::new(Box::new(rec.clone()));
    sched.play_tone(440.0, 0.2, Waveform::Triangle);
    assert_eq!(rec.0.borrow()[0], Tone::new(440.0, 0.2, Waveform::Triangle));
}

#[test]
fn silent_scheduler_still_tracks_pending() {
    let mut sched = ToneScheduler::silent();
    sched.play(SoundCue::CatcherStart);
    assert_eq!(sched.pending(), 2);
    sched.advance(Duration::from_millis(250));
    assert_eq!(sched.pending(), 0);
}
