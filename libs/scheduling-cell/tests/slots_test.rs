use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use scheduling_cell::error::SchedulingError;
use scheduling_cell::models::{BookedInterval, ScheduleWindow};
use scheduling_cell::services::slots::compute_free_slots;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

// 2025-03-03 is a Monday
fn monday() -> NaiveDate {
    date(2025, 3, 3)
}

fn monday_window(daily_start: NaiveTime, daily_end: NaiveTime) -> ScheduleWindow {
    ScheduleWindow {
        id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        valid_from: date(2025, 1, 1),
        valid_to: date(2025, 12, 31),
        active_weekdays: vec![1],
        daily_start,
        daily_end,
        break_start: None,
        break_end: None,
        slot_minutes: 30,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn booking(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> BookedInterval {
    BookedInterval {
        date: day,
        start,
        end,
    }
}

fn start_times(slots: &[scheduling_cell::models::FreeSlot]) -> Vec<NaiveTime> {
    slots.iter().map(|slot| slot.start_time).collect()
}

#[test]
fn emits_full_grid_without_break_or_bookings() {
    let window = monday_window(time(9, 0), time(11, 0));

    let slots =
        compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(
        start_times(&slots),
        vec![time(9, 0), time(9, 30), time(10, 0), time(10, 30)]
    );
    assert_eq!(slots[0].end_time, time(9, 30));
    assert_eq!(slots[3].end_time, time(11, 0));
    assert!(slots.iter().all(|slot| slot.duration_minutes == 30));
    assert!(slots.iter().all(|slot| slot.date == monday()));
}

#[test]
fn slot_count_matches_window_length() {
    let window = monday_window(time(9, 0), time(17, 0));

    let slots =
        compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30)).unwrap();

    // floor((17:00 - 09:00) / 30min)
    assert_eq!(slots.len(), 16);
}

#[test]
fn break_suppresses_contained_slot() {
    let mut window = monday_window(time(9, 0), time(11, 0));
    window.break_start = Some(time(10, 0));
    window.break_end = Some(time(10, 30));

    let slots =
        compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(
        start_times(&slots),
        vec![time(9, 0), time(9, 30), time(10, 30)]
    );
}

#[test]
fn slot_straddling_break_is_suppressed() {
    // The break is not aligned to the slot grid; the candidate that merely
    // touches it must be dropped and generation resumes at the break's end.
    let mut window = monday_window(time(9, 0), time(12, 0));
    window.break_start = Some(time(10, 10));
    window.break_end = Some(time(10, 40));

    let slots =
        compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(
        start_times(&slots),
        vec![time(9, 0), time(9, 30), time(10, 40), time(11, 10)]
    );
}

#[test]
fn booking_suppresses_matching_slot() {
    let window = monday_window(time(9, 0), time(11, 0));
    let bookings = vec![booking(monday(), time(9, 30), time(10, 0))];

    let slots =
        compute_free_slots(&window, &bookings, monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(
        start_times(&slots),
        vec![time(9, 0), time(10, 0), time(10, 30)]
    );
}

#[test]
fn partially_overlapping_booking_suppresses_both_slots() {
    let window = monday_window(time(9, 0), time(11, 0));
    let bookings = vec![booking(monday(), time(9, 45), time(10, 15))];

    let slots =
        compute_free_slots(&window, &bookings, monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(start_times(&slots), vec![time(9, 0), time(10, 30)]);
}

#[test]
fn booking_on_another_day_is_ignored() {
    let window = monday_window(time(9, 0), time(11, 0));
    let tuesday = date(2025, 3, 4);
    let bookings = vec![booking(tuesday, time(9, 0), time(11, 0))];

    let slots =
        compute_free_slots(&window, &bookings, monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(slots.len(), 4);
}

#[test]
fn inactive_weekday_yields_no_slots() {
    let window = monday_window(time(9, 0), time(11, 0));
    let tuesday = date(2025, 3, 4);

    let slots =
        compute_free_slots(&window, &[], tuesday, tuesday, Duration::minutes(30)).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn days_outside_validity_yield_no_slots() {
    let window = monday_window(time(9, 0), time(11, 0));
    // A Monday, but past valid_to
    let out_of_range = date(2026, 1, 5);

    let slots =
        compute_free_slots(&window, &[], out_of_range, out_of_range, Duration::minutes(30))
            .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn trailing_partial_slot_is_dropped() {
    let window = monday_window(time(9, 0), time(10, 45));

    let slots =
        compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30)).unwrap();

    assert_eq!(start_times(&slots), vec![time(9, 0), time(9, 30), time(10, 0)]);
    assert_eq!(slots.last().unwrap().end_time, time(10, 30));
}

#[test]
fn duration_longer_than_window_yields_no_slots() {
    let window = monday_window(time(9, 0), time(11, 0));

    let slots =
        compute_free_slots(&window, &[], monday(), monday(), Duration::hours(3)).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn multi_day_range_is_ordered_and_idempotent() {
    let mut window = monday_window(time(9, 0), time(11, 0));
    window.active_weekdays = vec![1, 3]; // Monday and Wednesday

    let week_start = monday();
    let week_end = date(2025, 3, 9); // the following Sunday

    let first =
        compute_free_slots(&window, &[], week_start, week_end, Duration::minutes(30)).unwrap();
    let second =
        compute_free_slots(&window, &[], week_start, week_end, Duration::minutes(30)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
    assert!(first[..4].iter().all(|slot| slot.date == monday()));
    assert!(first[4..].iter().all(|slot| slot.date == date(2025, 3, 5)));

    let ordered = first.windows(2).all(|pair| {
        (pair[0].date, pair[0].start_time) < (pair[1].date, pair[1].start_time)
    });
    assert!(ordered);
}

#[test]
fn inverted_range_is_rejected() {
    let window = monday_window(time(9, 0), time(11, 0));

    let result = compute_free_slots(
        &window,
        &[],
        date(2025, 3, 10),
        monday(),
        Duration::minutes(30),
    );

    assert_matches!(result, Err(SchedulingError::InvalidRange(_)));
}

#[test]
fn nonpositive_duration_is_rejected() {
    let window = monday_window(time(9, 0), time(11, 0));

    let zero = compute_free_slots(&window, &[], monday(), monday(), Duration::zero());
    assert_matches!(zero, Err(SchedulingError::InvalidRange(_)));

    let negative = compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(-30));
    assert_matches!(negative, Err(SchedulingError::InvalidRange(_)));
}

#[test]
fn inverted_daily_bounds_are_rejected() {
    let window = monday_window(time(11, 0), time(9, 0));

    let result = compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30));

    assert_matches!(result, Err(SchedulingError::InvalidWindow(_)));
}

#[test]
fn break_outside_daily_window_is_rejected() {
    let mut window = monday_window(time(9, 0), time(11, 0));
    window.break_start = Some(time(8, 0));
    window.break_end = Some(time(9, 30));

    let result = compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30));

    assert_matches!(result, Err(SchedulingError::InvalidWindow(_)));
}

#[test]
fn half_defined_break_is_rejected() {
    let mut window = monday_window(time(9, 0), time(11, 0));
    window.break_start = Some(time(10, 0));

    let result = compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30));

    assert_matches!(result, Err(SchedulingError::InvalidWindow(_)));
}

#[test]
fn weekday_index_out_of_range_is_rejected() {
    let mut window = monday_window(time(9, 0), time(11, 0));
    window.active_weekdays = vec![1, 7];

    let result = compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30));

    assert_matches!(result, Err(SchedulingError::InvalidWindow(_)));
}

#[test]
fn inverted_validity_range_is_rejected() {
    let mut window = monday_window(time(9, 0), time(11, 0));
    window.valid_from = date(2025, 12, 31);
    window.valid_to = date(2025, 1, 1);

    let result = compute_free_slots(&window, &[], monday(), monday(), Duration::minutes(30));

    assert_matches!(result, Err(SchedulingError::InvalidWindow(_)));
}

#[test]
fn fully_booked_day_yields_empty_result() {
    let window = monday_window(time(9, 0), time(11, 0));
    let bookings = vec![booking(monday(), time(9, 0), time(11, 0))];

    let slots =
        compute_free_slots(&window, &bookings, monday(), monday(), Duration::minutes(30)).unwrap();

    assert!(slots.is_empty());
}
