use crossterm::event::{KeyCode, KeyEventKind};

use pose_arcade::input::*;

// ── KeyTracker ────────────────────────────────────────────────────────────────

#[test]
fn pressed_key_stays_held_for_the_window() {
    let mut keys = KeyTracker::new(4);
    keys.record(KeyCode::Left, KeyEventKind::Press, 1);
    assert!(keys.is_held(KeyCode::Left, 1));
    assert!(keys.is_held(KeyCode::Left, 5));
    assert!(!keys.is_held(KeyCode::Left, 6));
}

#[test]
fn repeat_refreshes_the_window() {
    let mut keys = KeyTracker::new(4);
    keys.record(KeyCode::Right, KeyEventKind::Press, 1);
    keys.record(KeyCode::Right, KeyEventKind::Repeat, 4);
    assert!(keys.is_held(KeyCode::Right, 8));
}

#[test]
fn release_drops_the_key_immediately() {
    let mut keys = KeyTracker::new(4);
    keys.record(KeyCode::Char(' '), KeyEventKind::Press, 1);
    keys.record(KeyCode::Char(' '), KeyEventKind::Release, 2);
    assert!(!keys.is_held(KeyCode::Char(' '), 2));
}

#[test]
fn letter_case_does_not_matter() {
    let mut keys = KeyTracker::default();
    keys.record(KeyCode::Char('A'), KeyEventKind::Press, 1);
    assert!(keys.is_held(KeyCode::Char('a'), 1));
    assert_eq!(keys.controls(1), Controls { left: true, right: false, fire: false });
}

#[test]
fn controls_combine_movement_and_fire() {
    let mut keys = KeyTracker::default();
    keys.record(KeyCode::Right, KeyEventKind::Press, 1);
    keys.record(KeyCode::Char(' '), KeyEventKind::Press, 1);
    assert_eq!(keys.controls(2), Controls { left: false, right: true, fire: true });
    keys.clear();
    assert_eq!(keys.controls(2), Controls::default());
}

// ── Pose labels ───────────────────────────────────────────────────────────────

#[test]
fn pose_labels_map_to_lanes() {
    assert_eq!(PoseLabel::from_label("왼쪽"), PoseLabel::Left);
    assert_eq!(PoseLabel::from_label("오른쪽"), PoseLabel::Right);
    assert_eq!(PoseLabel::from_label("Left"), PoseLabel::Left);
    assert_eq!(PoseLabel::from_label(" RIGHT "), PoseLabel::Right);
}

#[test]
fn unknown_labels_are_center() {
    for label in ["정면", "위", "아래", "", "jump"] {
        assert_eq!(PoseLabel::from_label(label), PoseLabel::Center, "{:?}", label);
    }
}

// ── Stabilizer ────────────────────────────────────────────────────────────────

#[test]
fn stabilizer_picks_most_confident_class() {
    let preds = vec![
        Prediction::new("왼쪽", 0.55),
        Prediction::new("오른쪽", 0.8),
        Prediction::new("정면", 0.1),
    ];
    let s = PredictionStabilizer::default();
    assert_eq!(s.stabilize(&preds).map(|p| p.class_name.as_str()), Some("오른쪽"));
    assert_eq!(s.pose(&preds), PoseLabel::Right);
}

#[test]
fn threshold_is_inclusive() {
    let preds = vec![Prediction::new("왼쪽", 0.5)];
    assert_eq!(PredictionStabilizer::default().pose(&preds), PoseLabel::Left);
}

#[test]
fn low_confidence_means_center() {
    let preds = vec![Prediction::new("왼쪽", 0.3), Prediction::new("오른쪽", 0.3)];
    let s = PredictionStabilizer::default();
    assert!(s.stabilize(&preds).is_none());
    assert_eq!(s.pose(&preds), PoseLabel::Center);
    assert_eq!(s.pose(&[]), PoseLabel::Center);
}

// ── Keyboard stand-in ─────────────────────────────────────────────────────────

#[test]
fn keyboard_pose_leans_with_arrows() {
    let mut pose = KeyboardPose {
        tracker: KeyTracker::default(),
        frame: 1,
    };
    pose.tracker.record(KeyCode::Left, KeyEventKind::Press, 1);
    let preds = pose.predict();
    assert_eq!(PredictionStabilizer::default().pose(&preds), PoseLabel::Left);

    pose.tracker.clear();
    let preds = pose.predict();
    assert_eq!(PredictionStabilizer::default().pose(&preds), PoseLabel::Center);
}
