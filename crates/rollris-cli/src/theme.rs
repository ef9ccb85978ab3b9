//! Toilet-paper themed text.
//!
//! Every roll of score is one roll of paper. The sidebar converts the score
//! into a supply at one roll per week; the game-over screen uses the more
//! generous one roll per five days.

use rand::seq::IndexedRandom as _;
use rollris_engine::PauseReason;

pub const TITLE: &str = "COVID ROLLS";

/// The all-time record, as reported during the 2020 shortage.
pub const RECORD_TEXT: &str = "600 rolls or 8 years supply";

const WEEKS_PER_MONTH: f64 = 4.33;

pub const FUN_FACTS: &[&str] = &[
    "The biggest toilet paper purchase during COVID was 600 rolls by one family in Australia!",
    "Toilet paper was invented in 1857 by Joseph Gayetty in New York.",
    "It takes approximately 0.17 kg of cellulose to create 1 toilet paper roll.",
    "During COVID, toilet paper sales increased by 845% in some areas!",
    "The average person uses about 57 sheets of toilet paper per day.",
    "Toilet paper wasn't widely used until the 1900s - before that, people used leaves, corn cobs, or newspapers!",
    "Charmin's 'Mr. Whipple' commercials ran for 21 years, making it one of the longest-running ad campaigns.",
    "The world's largest toilet paper roll was 8 feet tall and weighed over 1,000 pounds!",
    "During the Great Toilet Paper Shortage of 2020, some people resorted to using bidets, washcloths, or even leaves.",
    "Ancient Romans used a sponge on a stick that was shared by everyone in the public restroom!",
];

pub const FOCUS_LOST_TEXT: &str = "Game paused - you switched away! Press Space to resume.";

/// How long `score` rolls last at one roll per week.
///
/// # Example
///
/// ```text
/// supply_text(0)   == "0 days supply"
/// supply_text(3)   == "3 weeks supply"
/// supply_text(10)  == "2 months 1 weeks supply"
/// supply_text(110) == "2 years 1 months 1 weeks supply"
/// ```
pub fn supply_text(score: usize) -> String {
    if score == 0 {
        return "0 days supply".to_owned();
    }

    let years = score / 52;
    let weeks = score % 52;
    let (months, remaining_weeks) = split_weeks(weeks);

    let mut parts = vec![];
    if years > 0 {
        parts.push(format!("{years} years"));
    }
    if years > 0 || months > 0 {
        if months > 0 {
            parts.push(format!("{months} months"));
        }
        if remaining_weeks > 0 {
            parts.push(format!("{remaining_weeks} weeks"));
        }
    } else {
        parts.push(format!("{weeks} weeks"));
    }
    format!("{} supply", parts.join(" "))
}

/// Splits `weeks` (< 52) into whole months and leftover whole weeks.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn split_weeks(weeks: usize) -> (usize, usize) {
    let weeks = weeks as f64;
    let months = (weeks / WEEKS_PER_MONTH).floor() as usize;
    let remaining = (weeks % WEEKS_PER_MONTH).floor() as usize;
    (months, remaining)
}

/// Supply at one roll per five days, in a single unit.
fn game_over_supply(score: usize) -> String {
    let days = score * 5;
    if days >= 365 {
        format!("{} years", days / 365)
    } else if days >= 7 {
        format!("{} weeks", days / 7)
    } else {
        format!("{days} days")
    }
}

/// Closing message for a finished game.
pub fn game_over_message(score: usize) -> String {
    let supply = game_over_supply(score);
    match score {
        0..10 => format!(
            "How will you survive?! You only collected {score} rolls or {supply} supply of toilet paper."
        ),
        10..50 => format!(
            "It's not too bad! You collected {score} rolls or {supply} supply of toilet paper."
        ),
        50..100 => {
            format!("You loo star! You collected {score} rolls or {supply} supply of toilet paper.")
        }
        _ => format!(
            "Amazing! You have your children and grandchildren covered with {score} rolls or {supply} supply of toilet paper!"
        ),
    }
}

/// Text for the pause popup.
///
/// A manual pause gets a random fun fact.
pub fn pause_message(reason: PauseReason) -> &'static str {
    match reason {
        PauseReason::Manual => FUN_FACTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default(),
        PauseReason::FocusLost => FOCUS_LOST_TEXT,
    }
}
