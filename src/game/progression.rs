//! Experience, level and hit point rules

/// Skill points awarded per level gained
pub const SKILL_POINTS_PER_LEVEL: i64 = 5;

/// Base hit points before constitution and level
pub const BASE_HP: i64 = 10;

/// Level reached with a given cumulative experience.
///
/// `floor((-1 + sqrt(1 + 2*xp/25)) / 2) + 1`, evaluated in integers: level
/// `n + 1` is reached at `50 * n * (n + 1)` experience (0, 100, 300, 600, ...).
pub fn level_for_experience(experience: i64) -> i64 {
    let experience = experience.max(0);
    // floor(sqrt(q)) == floor(sqrt(floor(q))) for q >= 0
    let radicand = (25 + 2 * experience) / 25;
    let root = isqrt(radicand);
    (root - 1) / 2 + 1
}

/// Experience needed to reach `level`
pub fn experience_for_level(level: i64) -> i64 {
    let n = (level - 1).max(0);
    50 * n * (n + 1)
}

/// Maximum hit points of a character
pub fn character_max_hp(constitution: i64, level: i64) -> i64 {
    BASE_HP + constitution + level
}

/// Maximum hit points of a monster
pub fn monster_max_hp(constitution: i64) -> i64 {
    BASE_HP + constitution
}

/// Skill points granted for a number of levels gained
pub fn skill_points_granted(levels_gained: i64) -> i64 {
    SKILL_POINTS_PER_LEVEL * levels_gained.max(0)
}

fn isqrt(n: i64) -> i64 {
    let mut root = (n as f64).sqrt() as i64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}
