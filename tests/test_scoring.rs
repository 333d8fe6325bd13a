use pose_arcade::scoring::*;

#[test]
fn level_for_boundaries() {
    assert_eq!(level_for(0, SHOOTER_LEVEL_DIVISOR), 1);
    assert_eq!(level_for(499, SHOOTER_LEVEL_DIVISOR), 1);
    assert_eq!(level_for(500, SHOOTER_LEVEL_DIVISOR), 2);
    assert_eq!(level_for(999, SHOOTER_LEVEL_DIVISOR), 2);
    assert_eq!(level_for(199, CATCHER_LEVEL_DIVISOR), 1);
    assert_eq!(level_for(200, CATCHER_LEVEL_DIVISOR), 2);
}

#[test]
fn scoreboard_starts_at_level_one() {
    let b = ScoreBoard::new(CATCHER_LEVEL_DIVISOR);
    assert_eq!((b.score, b.level), (0, 1));
}

#[test]
fn scoreboard_add_returns_new_pair() {
    let mut b = ScoreBoard::new(CATCHER_LEVEL_DIVISOR);
    assert_eq!(b.add(150), (150, 1));
    assert_eq!(b.add(50), (200, 2));
}

#[test]
fn negative_points_floor_at_zero() {
    let mut b = ScoreBoard::new(CATCHER_LEVEL_DIVISOR);
    assert_eq!(b.add(-100), (0, 1));
    b.add(250);
    assert_eq!(b.add(-100), (150, 1));
}
