// src/scoring/toeic.rs

//! TOEIC estimate from practice attempts.
//!
//! Practice parts are scored on a 61-question scale. The average number of
//! correct answers per skill is rescaled to the 100-question official format
//! and looked up in the listening or reading conversion table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    config::{RECENT_EXAM_WINDOW, SCALE_QUESTION_COUNT},
    models::attempt::{ExamAttempt, Skill},
};

/// Listening conversion: correct answers out of 100 -> 5..=495 points.
pub const LISTENING_TABLE: [i32; 101] = [
    5, 15, 20, 25, 30, 35, 40, 45, 50, 55,
    60, 65, 70, 75, 80, 85, 90, 95, 100, 105,
    110, 115, 120, 125, 130, 135, 140, 145, 150, 155,
    160, 165, 170, 175, 180, 185, 190, 195, 200, 205,
    210, 215, 220, 225, 230, 235, 240, 245, 250, 255,
    260, 265, 270, 275, 280, 285, 290, 295, 300, 305,
    310, 315, 320, 325, 330, 335, 340, 345, 350, 355,
    360, 365, 370, 375, 380, 385, 395, 400, 405, 410,
    415, 420, 425, 430, 435, 440, 445, 450, 455, 460,
    465, 470, 475, 480, 485, 490, 495, 495, 495, 495,
    495,
];

/// Reading conversion: correct answers out of 100 -> 5..=495 points.
pub const READING_TABLE: [i32; 101] = [
    5, 5, 5, 10, 15, 20, 25, 30, 35, 40,
    45, 50, 55, 60, 65, 70, 75, 80, 85, 90,
    95, 100, 105, 110, 115, 120, 125, 130, 135, 140,
    145, 150, 155, 160, 165, 170, 175, 180, 185, 190,
    195, 200, 205, 210, 215, 220, 225, 230, 235, 240,
    245, 250, 255, 260, 265, 270, 275, 280, 285, 290,
    295, 300, 305, 310, 315, 320, 325, 330, 335, 340,
    345, 350, 355, 360, 365, 370, 375, 380, 385, 390,
    395, 400, 405, 410, 415, 420, 425, 430, 435, 440,
    445, 450, 455, 460, 465, 470, 475, 480, 485, 490,
    495,
];

fn table(skill: Skill) -> &'static [i32; 101] {
    match skill {
        Skill::Listening => &LISTENING_TABLE,
        Skill::Reading => &READING_TABLE,
    }
}

/// Rescales `avg_correct` out of `total_questions` to the 100-question format
/// (rounding half away from zero) and looks the result up for `skill`.
pub fn scale_and_lookup(avg_correct: f64, total_questions: i32, skill: Skill) -> i32 {
    let table = table(skill);
    if avg_correct <= 0.0 || total_questions <= 0 {
        return table[0];
    }

    let scaled = avg_correct / f64::from(total_questions) * 100.0;
    // f64::round rounds half away from zero
    let index = (scaled.round() as i64).clamp(0, 100) as usize;
    table[index]
}

/// Correct answers of one exam for one skill, summed over its parts.
#[derive(Debug, Clone)]
struct ExamSkillGroup {
    skill: Skill,
    total_correct: f64,
    first_attempt: Option<DateTime<Utc>>,
}

/// Estimates a learner's TOEIC score (0..=990) from their attempts.
///
/// Only completed attempts on listening or reading parts count. A retake of
/// the same (exam, part) is ignored: the earliest attempt wins. Parts are then
/// summed per (exam, skill) and only the ten most recent of those groups are
/// averaged. Returns 0 when nothing qualifies.
pub fn estimate_toeic(attempts: &[ExamAttempt]) -> i32 {
    let mut eligible: Vec<(&ExamAttempt, Skill)> = attempts
        .iter()
        .filter(|a| a.is_completed() && a.exam_part_id.is_some())
        .filter_map(|a| a.skill().map(|skill| (a, skill)))
        .collect();

    if eligible.is_empty() {
        return 0;
    }

    // Stable: ties keep input order
    eligible.sort_by_key(|(a, _)| a.end_time);

    let mut seen_parts: Vec<(i64, Option<i64>)> = Vec::new();
    let mut group_index: HashMap<(i64, Skill), usize> = HashMap::new();
    let mut groups: Vec<ExamSkillGroup> = Vec::new();

    for (attempt, skill) in eligible {
        let part_key = (attempt.exam_id, attempt.exam_part_id);
        if seen_parts.contains(&part_key) {
            continue;
        }
        seen_parts.push(part_key);

        let correct = f64::from(attempt.score.unwrap_or(0));
        match group_index.get(&(attempt.exam_id, skill)) {
            Some(&idx) => {
                let group = &mut groups[idx];
                group.total_correct += correct;
                // Option::min would rank a missing end time first
                group.first_attempt = match (group.first_attempt, attempt.end_time) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
            None => {
                group_index.insert((attempt.exam_id, skill), groups.len());
                groups.push(ExamSkillGroup {
                    skill,
                    total_correct: correct,
                    first_attempt: attempt.end_time,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.first_attempt.cmp(&a.first_attempt));
    groups.truncate(RECENT_EXAM_WINDOW);

    let average = |skill: Skill| -> f64 {
        let totals: Vec<f64> = groups
            .iter()
            .filter(|g| g.skill == skill)
            .map(|g| g.total_correct)
            .collect();
        if totals.is_empty() {
            0.0
        } else {
            totals.iter().sum::<f64>() / totals.len() as f64
        }
    };

    let listening = scale_and_lookup(average(Skill::Listening), SCALE_QUESTION_COUNT, Skill::Listening);
    let reading = scale_and_lookup(average(Skill::Reading), SCALE_QUESTION_COUNT, Skill::Reading);

    listening + reading
}
