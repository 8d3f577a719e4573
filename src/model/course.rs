use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::types::Sex;

/// One rated set of tees: par, course rating, slope rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeeSetting {
    pub par: i32,
    pub course_rating: f64,
    pub slope_rating: i32,
    pub tee_color: String,
}

/// The event's course setup: at most one tee per sex plus the handicap
/// allowance. Either tee may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseConfig {
    pub male_tee: Option<TeeSetting>,
    pub female_tee: Option<TeeSetting>,
    pub allowance_percent: Option<i32>,
}

impl CourseConfig {
    /// Pick the tee for a player's sex. Falls back to the male tee when the
    /// female tee is not configured or the sex is unrecorded; each fallback
    /// is reported as an assumption for the caller to surface, never an
    /// error.
    #[must_use]
    pub fn resolve_tee(&self, sex: Option<Sex>) -> (Option<&TeeSetting>, Vec<String>) {
        let mut assumptions = Vec::new();
        let tee = match sex {
            Some(Sex::Male) => self.male_tee.as_ref(),
            Some(Sex::Female) => {
                if self.female_tee.is_some() {
                    self.female_tee.as_ref()
                } else {
                    assumptions
                        .push("no female tee configured, falling back to male tee".to_string());
                    self.male_tee.as_ref()
                }
            }
            None => {
                assumptions.push("sex not recorded, assuming male tee".to_string());
                self.male_tee.as_ref()
            }
        };
        (tee, assumptions)
    }
}

/// Everything the engine needs to know about an event besides its roster.
#[derive(Debug, Clone, PartialEq)]
pub struct EventConfig {
    pub event_name: String,
    pub start_time: NaiveDateTime,
    pub interval_minutes: i64,
    pub course: CourseConfig,
}
