//! Input adapters — turn raw key events and pose-classifier output into the
//! small intent types the games consume.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind};

// ── Shooter controls ─────────────────────────────────────────────────────────

/// Snapshot of which shooter controls are held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Default number of frames a key stays "held" after its last press/repeat.
pub const DEFAULT_HOLD_WINDOW: u64 = 4;

/// Tracks held keys across frames.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire after `hold_window` frames of silence,
///   which is shorter than the OS repeat interval, so a key stays live while
///   it keeps generating repeats.
#[derive(Clone, Debug)]
pub struct KeyTracker {
    /// Each held key → the frame it was last seen.
    last_seen: HashMap<KeyCode, u64>,
    hold_window: u64,
}

impl KeyTracker {
    pub fn new(hold_window: u64) -> Self {
        Self {
            last_seen: HashMap::new(),
            hold_window,
        }
    }

    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(normalize(code), frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&normalize(code));
            }
        }
    }

    /// True if `code` was seen within the last `hold_window` frames.
    pub fn is_held(&self, code: KeyCode, frame: u64) -> bool {
        self.last_seen
            .get(&normalize(code))
            .map(|&last| frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    pub fn controls(&self, frame: u64) -> Controls {
        Controls {
            left: self.is_held(KeyCode::Left, frame) || self.is_held(KeyCode::Char('a'), frame),
            right: self.is_held(KeyCode::Right, frame) || self.is_held(KeyCode::Char('d'), frame),
            fire: self.is_held(KeyCode::Char(' '), frame),
        }
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_WINDOW)
    }
}

/// `A` and `a` are the same key for movement purposes.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

// ── Pose input ───────────────────────────────────────────────────────────────

/// Lane intent for the fruit catcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoseLabel {
    Left,
    Right,
    #[default]
    Center,
}

impl PoseLabel {
    /// Map a classifier class name.  Anything unrecognised, including the
    /// up/down poses, counts as center.
    pub fn from_label(label: &str) -> PoseLabel {
        match label.trim() {
            "왼쪽" => PoseLabel::Left,
            "오른쪽" => PoseLabel::Right,
            l if l.eq_ignore_ascii_case("left") => PoseLabel::Left,
            l if l.eq_ignore_ascii_case("right") => PoseLabel::Right,
            _ => PoseLabel::Center,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoseLabel::Left => "left",
            PoseLabel::Right => "right",
            PoseLabel::Center => "center",
        }
    }
}

/// One class score from a pose classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub class_name: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// Anything that can classify the player's current pose.
pub trait PoseClassifier {
    fn predict(&mut self) -> Vec<Prediction>;
}

/// Picks a single class from a classifier frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionStabilizer {
    pub threshold: f32,
}

impl Default for PredictionStabilizer {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl PredictionStabilizer {
    /// The most probable class at or above the threshold, if any.
    pub fn stabilize<'a>(&self, predictions: &'a [Prediction]) -> Option<&'a Prediction> {
        predictions
            .iter()
            .filter(|p| p.probability >= self.threshold)
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
    }

    /// Lane intent for a classifier frame; no confident class means center.
    pub fn pose(&self, predictions: &[Prediction]) -> PoseLabel {
        self.stabilize(predictions)
            .map(|p| PoseLabel::from_label(&p.class_name))
            .unwrap_or_default()
    }
}

/// Stand-in classifier driven by the keyboard: the arrow keys "lean".
#[derive(Clone, Debug, Default)]
pub struct KeyboardPose {
    pub tracker: KeyTracker,
    pub frame: u64,
}

impl PoseClassifier for KeyboardPose {
    fn predict(&mut self) -> Vec<Prediction> {
        let controls = self.tracker.controls(self.frame);
        let (left, right) = match (controls.left, controls.right) {
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            _ => (0.0, 0.0),
        };
        let center = 1.0 - left - right;
        vec![
            Prediction::new("왼쪽", left),
            Prediction::new("오른쪽", right),
            Prediction::new("정면", center),
        ]
    }
}
