//! WHS-style handicap pipeline. Pure functions: a missing input always yields
//! `None` (caller shows a placeholder), never zero and never an error.

use crate::model::course::{CourseConfig, TeeSetting};
use crate::model::types::PlayerRef;

/// `CH = round(HI x slope/113 + (CR - par))`, rounded half-away-from-zero on
/// the intermediate real value.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn course_handicap(handicap_index: Option<f64>, tee: Option<&TeeSetting>) -> Option<i32> {
    let hi = handicap_index?;
    let tee = tee?;
    let raw = hi * (f64::from(tee.slope_rating) / 113.0)
        + (tee.course_rating - f64::from(tee.par));
    Some(raw.round() as i32)
}

/// `PH = round(CH x allowance/100)`. A zero or unset allowance means "not
/// configured" and propagates `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn playing_handicap(course_handicap: Option<i32>, allowance_percent: Option<i32>) -> Option<i32> {
    let ch = course_handicap?;
    let allowance = allowance_percent?;
    if allowance == 0 {
        return None;
    }
    let raw = f64::from(ch) * f64::from(allowance) / 100.0;
    Some(raw.round() as i32)
}

/// Course handicap for a player against the event's course, resolving the tee
/// by sex. Returns the value plus any resolution assumptions made.
#[must_use]
pub fn player_course_handicap(
    player: &PlayerRef,
    course: &CourseConfig,
) -> (Option<i32>, Vec<String>) {
    if player.is_guest && !guest_display_eligible(player) {
        return (None, Vec::new());
    }
    let (tee, assumptions) = course.resolve_tee(player.sex);
    (course_handicap(player.handicap_index, tee), assumptions)
}

/// Full pipeline for one player: tee resolution, course handicap, allowance.
#[must_use]
pub fn event_playing_handicap(player: &PlayerRef, course: &CourseConfig) -> Option<i32> {
    let (ch, _) = player_course_handicap(player, course);
    playing_handicap(ch, course.allowance_percent)
}

/// Guests need both a handicap index and a recorded sex before any handicap
/// is displayed for them; they still take a spot in a group either way.
#[must_use]
pub fn guest_display_eligible(player: &PlayerRef) -> bool {
    player.handicap_index.is_some() && player.sex.is_some()
}
