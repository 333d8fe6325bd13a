//! Score and level bookkeeping shared by both games.

/// Points per level in the fruit catcher.
pub const CATCHER_LEVEL_DIVISOR: u32 = 200;
/// Points per level in the shooter.
pub const SHOOTER_LEVEL_DIVISOR: u32 = 500;

pub fn level_for(score: u32, divisor: u32) -> u32 {
    score / divisor + 1
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreBoard {
    pub score: u32,
    pub level: u32,
    pub divisor: u32,
}

impl ScoreBoard {
    pub fn new(divisor: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            divisor,
        }
    }

    /// Apply `points` (negative allowed, score floors at 0) and return the
    /// new `(score, level)`.
    pub fn add(&mut self, points: i32) -> (u32, u32) {
        self.score = if points < 0 {
            self.score.saturating_sub(points.unsigned_abs())
        } else {
            self.score.saturating_add(points as u32)
        };
        self.level = level_for(self.score, self.divisor);
        (self.score, self.level)
    }
}
