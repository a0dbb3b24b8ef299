//! Core type definitions used throughout the codebase

/// Simulation tick counter
pub type Tick = u64;

/// Integer percentage (0-100) used by hp thresholds
pub type Percent = u32;

/// True when `hp` is strictly below `pct` percent of `max_hp`
pub fn hp_below_percent(hp: i32, max_hp: i32, pct: Percent) -> bool {
    (hp as i64) * 100 < (pct as i64) * (max_hp as i64)
}

/// True when `hp` is strictly above `pct` percent of `max_hp`
pub fn hp_above_percent(hp: i32, max_hp: i32, pct: Percent) -> bool {
    (hp as i64) * 100 > (pct as i64) * (max_hp as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hp_below_percent() {
        assert!(hp_below_percent(49, 100, 50));
        assert!(!hp_below_percent(50, 100, 50));
        assert!(hp_below_percent(-5, 100, 1));
    }

    #[test]
    fn test_hp_above_percent() {
        assert!(hp_above_percent(51, 100, 50));
        assert!(!hp_above_percent(50, 100, 50));
        // Odd max hp: 3 of 5 is 60%
        assert!(hp_above_percent(3, 5, 59));
        assert!(!hp_above_percent(3, 5, 60));
    }
}
