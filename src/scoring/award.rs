// src/scoring/award.rs

use serde::Serialize;

use crate::scoring::tier::ScoringTier;

/// Points earned by a single submitted exam part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AwardBreakdown {
    pub base_points: i64,
    pub time_bonus: i64,
    pub accuracy_bonus: i64,
}

impl AwardBreakdown {
    pub fn total(&self) -> i64 {
        self.base_points + self.time_bonus + self.accuracy_bonus
    }
}

/// Bonus for finishing before the expected time: the saved share of the
/// expected time multiplied by the tier's time bonus percentage.
pub fn time_bonus(time_spent_secs: i64, expected_time_secs: i64, time_bonus_pct: i64) -> i64 {
    if expected_time_secs <= 0 || time_spent_secs >= expected_time_secs {
        return 0;
    }
    (expected_time_secs - time_spent_secs) * time_bonus_pct / expected_time_secs
}

/// Bonus for 80%+ accuracy, growing linearly from nothing at 80% to the full
/// tier percentage of the base points at 100%.
pub fn accuracy_bonus(correct: i64, total: i64, base_points: i64, accuracy_bonus_pct: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    // (correct / total - 0.8) / 0.2 == (5 * correct - 4 * total) / total
    let ratio_numerator = 5 * correct - 4 * total;
    if ratio_numerator < 0 {
        return 0;
    }
    base_points * accuracy_bonus_pct * ratio_numerator / (100 * total)
}

/// Breaks down the points of one part. Nothing is earned without a correct answer.
pub fn compute_award(
    correct: i64,
    total: i64,
    time_spent_secs: i64,
    expected_time_secs: i64,
    tier: &ScoringTier,
) -> AwardBreakdown {
    if correct <= 0 {
        return AwardBreakdown::default();
    }

    let base_points = correct * tier.base_points;
    AwardBreakdown {
        base_points,
        time_bonus: time_bonus(time_spent_secs, expected_time_secs, tier.time_bonus_pct),
        accuracy_bonus: accuracy_bonus(correct, total, base_points, tier.accuracy_bonus_pct),
    }
}

/// Message shown after finishing a part.
pub fn completion_message(points_earned: i64, is_first_attempt: bool) -> &'static str {
    if !is_first_attempt {
        return "Great job completing this part! Keep practicing to improve your skills.";
    }

    match points_earned {
        p if p >= 400 => "Excellent work! You've earned a fantastic score on this part!",
        p if p >= 300 => "Well done! Great effort on completing this part!",
        p if p >= 200 => "Good job! You're making steady progress!",
        p if p >= 100 => "Nice try! Keep practicing and you'll improve!",
        _ => "Part completed! Every practice session helps you grow!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tier::TIERS;

    #[test]
    fn test_time_bonus() {
        // Half the time saved at 30% -> 15
        assert_eq!(time_bonus(300, 600, 30), 15);
        assert_eq!(time_bonus(600, 600, 30), 0);
        assert_eq!(time_bonus(700, 600, 30), 0);
        assert_eq!(time_bonus(10, 0, 30), 0);
        // 1/3 saved at 28% -> 9.33 -> 9
        assert_eq!(time_bonus(400, 600, 28), 9);
    }

    #[test]
    fn test_accuracy_bonus_scales_from_eighty_percent() {
        assert_eq!(accuracy_bonus(7, 10, 105, 150), 0);
        assert_eq!(accuracy_bonus(8, 10, 120, 150), 0);
        // 90% -> half of 150% of 135
        assert_eq!(accuracy_bonus(9, 10, 135, 150), 101);
        assert_eq!(accuracy_bonus(10, 10, 150, 150), 225);
        assert_eq!(accuracy_bonus(1, 0, 15, 150), 0);
    }

    #[test]
    fn test_compute_award_beginner() {
        let award = compute_award(10, 10, 300, 600, &TIERS[0]);
        assert_eq!(
            award,
            AwardBreakdown {
                base_points: 150,
                time_bonus: 15,
                accuracy_bonus: 225,
            }
        );
        assert_eq!(award.total(), 390);
    }

    #[test]
    fn test_compute_award_without_correct_answers() {
        let award = compute_award(0, 10, 10, 600, &TIERS[0]);
        assert_eq!(award, AwardBreakdown::default());
        assert_eq!(award.total(), 0);
    }

    #[test]
    fn test_completion_message_tiers() {
        assert!(completion_message(450, true).starts_with("Excellent"));
        assert!(completion_message(300, true).starts_with("Well done"));
        assert!(completion_message(250, true).starts_with("Good job"));
        assert!(completion_message(100, true).starts_with("Nice try"));
        assert!(completion_message(0, true).starts_with("Part completed"));
        assert!(completion_message(999, false).starts_with("Great job"));
    }
}
