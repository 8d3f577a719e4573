use rusty_teesheet::handicap::{
    course_handicap, event_playing_handicap, guest_display_eligible, playing_handicap,
};
use rusty_teesheet::model::{CourseConfig, PlayerRef, Sex, TeeSetting};

fn white_tee() -> TeeSetting {
    TeeSetting {
        par: 71,
        course_rating: 73.2,
        slope_rating: 130,
        tee_color: "white".to_string(),
    }
}

fn red_tee() -> TeeSetting {
    TeeSetting {
        par: 72,
        course_rating: 74.1,
        slope_rating: 128,
        tee_color: "red".to_string(),
    }
}

fn course_with_both_tees() -> CourseConfig {
    CourseConfig {
        male_tee: Some(white_tee()),
        female_tee: Some(red_tee()),
        allowance_percent: Some(95),
    }
}

#[test]
fn test1_worked_example() {
    // round(18.4 x 130/113 + (73.2 - 71)) = round(23.39) = 23
    let ch = course_handicap(Some(18.4), Some(&white_tee()));
    assert_eq!(ch, Some(23));
    // round(23 x 95/100) = round(21.85) = 22
    assert_eq!(playing_handicap(ch, Some(95)), Some(22));
}

#[test]
fn test1_null_propagation() {
    assert_eq!(course_handicap(None, Some(&white_tee())), None);
    assert_eq!(course_handicap(Some(18.4), None), None);
    assert_eq!(playing_handicap(None, Some(95)), None);
    assert_eq!(playing_handicap(Some(23), None), None);
    // zero allowance means "not configured", not a 0% reduction
    assert_eq!(playing_handicap(Some(23), Some(0)), None);
}

#[test]
fn test1_idempotent_for_fixed_inputs() {
    let first = course_handicap(Some(18.4), Some(&white_tee()));
    for _ in 0..10 {
        assert_eq!(course_handicap(Some(18.4), Some(&white_tee())), first);
        assert_eq!(playing_handicap(first, Some(95)), Some(22));
    }
}

#[test]
fn test1_rounds_half_away_from_zero() {
    // 10 x 113/113 + (70.5 - 72) = 8.5, rounds up to 9
    let tee = TeeSetting {
        par: 72,
        course_rating: 70.5,
        slope_rating: 113,
        tee_color: "blue".to_string(),
    };
    assert_eq!(course_handicap(Some(10.0), Some(&tee)), Some(9));
    // -5 x 113/113 + (70.5 - 72) = -6.5, rounds away to -7
    assert_eq!(course_handicap(Some(-5.0), Some(&tee)), Some(-7));
}

#[test]
fn test1_female_tee_used_when_configured() {
    let course = course_with_both_tees();
    let (tee, assumptions) = course.resolve_tee(Some(Sex::Female));
    assert_eq!(tee.map(|t| t.tee_color.as_str()), Some("red"));
    assert!(assumptions.is_empty());
}

#[test]
fn test1_female_falls_back_to_male_tee_silently() {
    let course = CourseConfig {
        male_tee: Some(white_tee()),
        female_tee: None,
        allowance_percent: Some(95),
    };
    let (tee, assumptions) = course.resolve_tee(Some(Sex::Female));
    assert_eq!(tee.map(|t| t.tee_color.as_str()), Some("white"));
    assert_eq!(assumptions.len(), 1);
    assert!(assumptions[0].contains("falling back to male tee"));
}

#[test]
fn test1_unknown_sex_takes_male_tee_with_assumption() {
    let course = course_with_both_tees();
    let (tee, assumptions) = course.resolve_tee(None);
    assert_eq!(tee.map(|t| t.tee_color.as_str()), Some("white"));
    assert_eq!(assumptions.len(), 1);
}

#[test]
fn test1_guest_without_sex_gets_no_display_handicap() {
    let guest = PlayerRef {
        id: "g7".to_string(),
        name: "Walk-in".to_string(),
        is_guest: true,
        handicap_index: Some(12.0),
        sex: None,
    };
    assert!(!guest_display_eligible(&guest));
    assert_eq!(event_playing_handicap(&guest, &course_with_both_tees()), None);

    // the same attributes on a member still compute (male-tee assumption)
    let member = PlayerRef {
        is_guest: false,
        ..guest.clone()
    };
    assert!(event_playing_handicap(&member, &course_with_both_tees()).is_some());
}

#[test]
fn test1_full_pipeline_for_member() {
    let player = PlayerRef {
        id: "m1".to_string(),
        name: "Arthur Price".to_string(),
        is_guest: false,
        handicap_index: Some(18.4),
        sex: Some(Sex::Male),
    };
    assert_eq!(
        event_playing_handicap(&player, &course_with_both_tees()),
        Some(22)
    );
}
