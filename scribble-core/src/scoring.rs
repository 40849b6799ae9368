pub struct ScoringEngine;

impl ScoringEngine {
    /// Award for a guess made the instant the drawing phase started.
    pub const MAX_GUESS_POINTS: u32 = 500;
    /// Floor for any correct guess, however late.
    pub const MIN_GUESS_POINTS: u32 = 100;
    /// Flat award to the drawer for each distinct correct guesser.
    pub const DRAWER_POINTS: u32 = 50;

    /// Points for a correct guess with `remaining_seconds` left out of a
    /// phase lasting `phase_seconds`:
    /// `max(100, ceil(remaining / phase * 500))`.
    pub fn guess_points(remaining_seconds: u32, phase_seconds: u32) -> u32 {
        if phase_seconds == 0 {
            return Self::MIN_GUESS_POINTS;
        }

        // Integer form of the ceiling keeps exact values like 250 exact
        let scaled = (u64::from(remaining_seconds) * u64::from(Self::MAX_GUESS_POINTS))
            .div_ceil(u64::from(phase_seconds));
        let scaled = u32::try_from(scaled).unwrap_or(u32::MAX);

        scaled.max(Self::MIN_GUESS_POINTS)
    }

    pub fn drawer_points() -> u32 {
        Self::DRAWER_POINTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_time_scores_maximum() {
        assert_eq!(ScoringEngine::guess_points(60, 60), 500);
    }

    #[test]
    fn test_no_time_left_clamps_to_floor() {
        assert_eq!(ScoringEngine::guess_points(0, 60), 100);
    }

    #[test]
    fn test_half_time_scores_half() {
        assert_eq!(ScoringEngine::guess_points(30, 60), 250);
    }

    #[test]
    fn test_partial_points_round_up() {
        // 59/60 * 500 = 491.67
        assert_eq!(ScoringEngine::guess_points(59, 60), 492);
        // 13/60 * 500 = 108.33
        assert_eq!(ScoringEngine::guess_points(13, 60), 109);
    }

    #[test]
    fn test_floor_boundary() {
        // 12/60 * 500 is exactly the floor
        assert_eq!(ScoringEngine::guess_points(12, 60), 100);
        assert_eq!(ScoringEngine::guess_points(1, 60), 100);
    }

    #[test]
    fn test_zero_length_phase() {
        assert_eq!(ScoringEngine::guess_points(10, 0), 100);
    }

    #[test]
    fn test_scores_are_monotonic_in_remaining_time() {
        let mut previous = 0;
        for remaining in 0..=60 {
            let points = ScoringEngine::guess_points(remaining, 60);
            assert!(points >= previous);
            assert!((100..=500).contains(&points));
            previous = points;
        }
    }

    #[test]
    fn test_drawer_award() {
        assert_eq!(ScoringEngine::drawer_points(), 50);
    }
}
