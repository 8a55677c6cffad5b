use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use crate::error::SchedulingError;
use crate::models::{BookedInterval, FreeSlot, ScheduleWindow};

/// Map a calendar date to the schedule weekday index (0 = Sunday, 6 = Saturday).
pub fn day_of_week(date: NaiveDate) -> i32 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Validate the bounds of a schedule definition. Shared between the slot
/// calculator and the boundary validation in the schedule CRUD service.
pub fn validate_schedule_bounds(
    valid_from: NaiveDate,
    valid_to: NaiveDate,
    active_weekdays: &[i32],
    daily_start: NaiveTime,
    daily_end: NaiveTime,
    break_start: Option<NaiveTime>,
    break_end: Option<NaiveTime>,
) -> Result<(), SchedulingError> {
    if valid_from > valid_to {
        return Err(SchedulingError::InvalidWindow(
            "valid_from must not be after valid_to".to_string(),
        ));
    }

    if daily_start >= daily_end {
        return Err(SchedulingError::InvalidWindow(
            "daily start must be before daily end".to_string(),
        ));
    }

    for day in active_weekdays {
        if !(0..=6).contains(day) {
            return Err(SchedulingError::InvalidWindow(format!(
                "weekday index {} out of range (0 = Sunday, 6 = Saturday)",
                day
            )));
        }
    }

    match (break_start, break_end) {
        (None, None) => {}
        (Some(start), Some(end)) => {
            if !(daily_start <= start && start < end && end <= daily_end) {
                return Err(SchedulingError::InvalidWindow(
                    "break must lie within the daily working window".to_string(),
                ));
            }
        }
        _ => {
            return Err(SchedulingError::InvalidWindow(
                "break_start and break_end must be set together".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_window(window: &ScheduleWindow) -> Result<(), SchedulingError> {
    validate_schedule_bounds(
        window.valid_from,
        window.valid_to,
        &window.active_weekdays,
        window.daily_start,
        window.daily_end,
        window.break_start,
        window.break_end,
    )
}

/// Compute the bookable fixed-length slots for one schedule window over a
/// queried date range.
///
/// Pure function of its inputs: the recurring weekly pattern, the optional
/// daily break, and the supplied booked intervals. Days outside the window's
/// validity range or not in `active_weekdays` contribute no slots. A candidate
/// slot overlapping the break in any way is suppressed and generation resumes
/// at the break's end; a candidate overlapping a booking in any way is skipped.
/// No partial trailing slot is emitted. Output is ordered by date, then start
/// time.
pub fn compute_free_slots(
    window: &ScheduleWindow,
    bookings: &[BookedInterval],
    range_start: NaiveDate,
    range_end: NaiveDate,
    slot_duration: Duration,
) -> Result<Vec<FreeSlot>, SchedulingError> {
    validate_window(window)?;

    if range_start > range_end {
        return Err(SchedulingError::InvalidRange(format!(
            "range start {} is after range end {}",
            range_start, range_end
        )));
    }

    if slot_duration <= Duration::zero() {
        return Err(SchedulingError::InvalidRange(
            "slot duration must be positive".to_string(),
        ));
    }

    let duration_minutes = slot_duration.num_minutes();
    let mut slots = Vec::new();

    // Days outside [valid_from, valid_to] yield no slots, not an error.
    let first_day = range_start.max(window.valid_from);
    let last_day = range_end.min(window.valid_to);

    let mut day = first_day;
    while day <= last_day {
        if window.active_weekdays.contains(&day_of_week(day)) {
            let day_bookings: Vec<&BookedInterval> =
                bookings.iter().filter(|booking| booking.date == day).collect();

            // Work in date-times so slot arithmetic cannot wrap past midnight.
            let day_end = day.and_time(window.daily_end);
            let break_window = match (window.break_start, window.break_end) {
                (Some(start), Some(end)) => Some((day.and_time(start), day.and_time(end))),
                _ => None,
            };

            let mut cursor = day.and_time(window.daily_start);
            while cursor + slot_duration <= day_end {
                let slot_end = cursor + slot_duration;

                if let Some((break_start, break_end)) = break_window {
                    if cursor < break_end && slot_end > break_start {
                        cursor = break_end;
                        continue;
                    }
                }

                let booked = day_bookings.iter().any(|booking| {
                    let booking_start = day.and_time(booking.start);
                    let booking_end = day.and_time(booking.end);
                    cursor < booking_end && slot_end > booking_start
                });

                if !booked {
                    slots.push(FreeSlot {
                        date: day,
                        start_time: cursor.time(),
                        end_time: slot_end.time(),
                        duration_minutes,
                    });
                }

                cursor = slot_end;
            }
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(slots)
}
