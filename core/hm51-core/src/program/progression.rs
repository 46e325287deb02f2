//! Progression math for the 26-week program.
//!
//! Working weights follow linear progression: every `frequency` weeks the
//! baseline gains one `increment`, and scheduled deload weeks cut the result
//! to 60%. All weights round to the nearest 0.5 kg, the smallest plate jump
//! the program assumes.

/// Total length of the program in weeks.
pub const PROGRAM_WEEKS: u32 = 26;

/// Scheduled recovery weeks.
pub const DELOAD_WEEKS: [u32; 5] = [6, 12, 18, 24, 26];

/// Deload working weight multiplier (-40%).
const DELOAD_FACTOR: f64 = 0.6;

/// Linear progression rule for one exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progression {
    /// Progress every this many weeks.
    pub frequency: u32,
    /// Weight added per progression step, kg.
    pub increment: f64,
}

/// One of the four 6-week training phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub block: u32,
    pub name: &'static str,
    pub technique: &'static str,
    pub description: &'static str,
}

const BLOCKS: [BlockInfo; 4] = [
    BlockInfo {
        block: 1,
        name: "Bloc 1 - Force Fondamentale",
        technique: "Tempo 3-1-2",
        description: "3s descente, 1s pause, 2s montée",
    },
    BlockInfo {
        block: 2,
        name: "Bloc 2 - Hypertrophie",
        technique: "Rest-Pause",
        description: "Série principale + 2 mini-sets après 15s de repos",
    },
    BlockInfo {
        block: 3,
        name: "Bloc 3 - Intensité",
        technique: "Drop-sets + Myo-reps",
        description: "Série max puis -20% immédiat + mini-sets",
    },
    BlockInfo {
        block: 4,
        name: "Bloc 4 - Pic",
        technique: "Clusters + Partials",
        description: "Reps groupées + demi-amplitude en fin de série",
    },
];

pub fn is_deload_week(week: u32) -> bool {
    DELOAD_WEEKS.contains(&week)
}

/// The training block a week belongs to. Weeks past 18 all fall in the final
/// peak block, which runs 8 weeks instead of 6.
pub fn block_for_week(week: u32) -> &'static BlockInfo {
    match week {
        1..=6 => &BLOCKS[0],
        7..=12 => &BLOCKS[1],
        13..=18 => &BLOCKS[2],
        _ => &BLOCKS[3],
    }
}

/// Rounds to the nearest 0.5 kg.
pub fn round_to_half(weight: f64) -> f64 {
    (weight * 2.0).round() / 2.0
}

/// Working weight for a given week: baseline plus
/// `floor((week - 1) / frequency)` increments, deload cut applied on
/// scheduled weeks, rounded to 0.5 kg.
///
/// Exercises without a progression rule (bodyweight and mobility work) keep
/// their baseline, deload included: 60% of nothing is nothing.
pub fn working_weight(base: f64, progression: Option<Progression>, week: u32, deload: bool) -> f64 {
    let mut weight = base;
    if let Some(rule) = progression {
        if rule.frequency > 0 {
            weight += f64::from(week.saturating_sub(1) / rule.frequency) * rule.increment;
        }
    }
    if deload {
        weight = round_to_half(weight * DELOAD_FACTOR);
    }
    round_to_half(weight)
}
