// src/scoring/tier.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proficiency band derived from an estimated TOEIC score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToeicLevel {
    Beginner,
    Elementary,
    Intermediate,
    #[serde(rename = "Upper-Intermediate")]
    UpperIntermediate,
    Advanced,
    Proficient,
}

/// Points and bonus rates applied to attempts of a learner in a given band.
///
/// Rates are whole percentages of the base points so that every computation
/// stays in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringTier {
    pub level: ToeicLevel,
    pub min_score: i32,
    pub max_score: i32,
    pub base_points: i64,
    pub time_bonus_pct: i64,
    pub accuracy_bonus_pct: i64,
}

/// Tier table, lowest band first.
pub const TIERS: [ScoringTier; 6] = [
    ScoringTier {
        level: ToeicLevel::Beginner,
        min_score: 10,
        max_score: 250,
        base_points: 15,
        time_bonus_pct: 30,
        accuracy_bonus_pct: 150,
    },
    ScoringTier {
        level: ToeicLevel::Elementary,
        min_score: 255,
        max_score: 400,
        base_points: 12,
        time_bonus_pct: 28,
        accuracy_bonus_pct: 120,
    },
    ScoringTier {
        level: ToeicLevel::Intermediate,
        min_score: 405,
        max_score: 600,
        base_points: 8,
        time_bonus_pct: 25,
        accuracy_bonus_pct: 90,
    },
    ScoringTier {
        level: ToeicLevel::UpperIntermediate,
        min_score: 605,
        max_score: 780,
        base_points: 5,
        time_bonus_pct: 20,
        accuracy_bonus_pct: 60,
    },
    ScoringTier {
        level: ToeicLevel::Advanced,
        min_score: 785,
        max_score: 900,
        base_points: 3,
        time_bonus_pct: 15,
        accuracy_bonus_pct: 40,
    },
    ScoringTier {
        level: ToeicLevel::Proficient,
        min_score: 905,
        max_score: 990,
        base_points: 2,
        time_bonus_pct: 10,
        accuracy_bonus_pct: 20,
    },
];

impl ToeicLevel {
    /// Maps an estimate to its band. Anything below 255 (including 0) is Beginner.
    pub fn from_score(toeic_score: i32) -> Self {
        match toeic_score {
            s if s >= 905 => ToeicLevel::Proficient,
            s if s >= 785 => ToeicLevel::Advanced,
            s if s >= 605 => ToeicLevel::UpperIntermediate,
            s if s >= 405 => ToeicLevel::Intermediate,
            s if s >= 255 => ToeicLevel::Elementary,
            _ => ToeicLevel::Beginner,
        }
    }

    pub fn tier(self) -> &'static ScoringTier {
        match self {
            ToeicLevel::Beginner => &TIERS[0],
            ToeicLevel::Elementary => &TIERS[1],
            ToeicLevel::Intermediate => &TIERS[2],
            ToeicLevel::UpperIntermediate => &TIERS[3],
            ToeicLevel::Advanced => &TIERS[4],
            ToeicLevel::Proficient => &TIERS[5],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToeicLevel::Beginner => "Beginner",
            ToeicLevel::Elementary => "Elementary",
            ToeicLevel::Intermediate => "Intermediate",
            ToeicLevel::UpperIntermediate => "Upper-Intermediate",
            ToeicLevel::Advanced => "Advanced",
            ToeicLevel::Proficient => "Proficient",
        }
    }

    /// What a learner in this band can do.
    pub fn description(self) -> &'static str {
        match self {
            ToeicLevel::Beginner => "Meets only basic requirements",
            ToeicLevel::Elementary => "Limited proficiency",
            ToeicLevel::Intermediate => "Simple communication in familiar situations",
            ToeicLevel::UpperIntermediate => "Everyday communication, limited at work",
            ToeicLevel::Advanced => "Meets most workplace requirements",
            ToeicLevel::Proficient => "Fluent and natural in any situation",
        }
    }

    /// Encouragement sent along with a fresh estimate.
    pub fn message(self, toeic_score: i32) -> String {
        match self {
            ToeicLevel::Beginner => format!(
                "You are at {} points: basic requirements only. Keep practicing!",
                toeic_score
            ),
            ToeicLevel::Elementary => format!(
                "You reached {} points: limited proficiency. Push on to 405+!",
                toeic_score
            ),
            ToeicLevel::Intermediate => format!(
                "You reached {} points: simple communication in familiar situations. Aim for 605+!",
                toeic_score
            ),
            ToeicLevel::UpperIntermediate => format!(
                "You reached {} points: everyday communication. Move on to 785+!",
                toeic_score
            ),
            ToeicLevel::Advanced => format!(
                "Excellent! {} points: you meet most workplace requirements. Go for 905+!",
                toeic_score
            ),
            ToeicLevel::Proficient => format!(
                "Outstanding! {} points: fluent and natural in any situation!",
                toeic_score
            ),
        }
    }
}

impl fmt::Display for ToeicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring configuration for an estimated TOEIC score.
pub fn tier_for_score(toeic_score: i32) -> &'static ScoringTier {
    ToeicLevel::from_score(toeic_score).tier()
}
