//! Pure slot computation
//!
//! Turns recurring weekly availability rules, blackout windows, and occupied
//! time ranges into the ordered set of offerable start instants for one
//! calendar date. No I/O; the service layer fetches the inputs and delegates
//! here.
//!
//! All comparisons happen on UTC instants. Wall-clock times from rules are
//! resolved in the organization's timezone: a candidate falling into a DST gap
//! is dropped, an ambiguous one resolves to the earlier instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::{AvailabilityRule, BlackoutDate};

fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The local [00:00, 24:00) window of `date` in `tz`, as UTC instants.
/// None only when local midnight falls into a DST gap.
pub fn day_window(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_to_utc(date.and_time(NaiveTime::MIN), tz)?;
    let end = local_to_utc(date.succ_opt()?.and_time(NaiveTime::MIN), tz)?;
    Some((start, end))
}

/// Half-open range intersection: [a_start, a_end) and [b_start, b_end).
pub fn ranges_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Candidate starts for one rule on one date: step from `start_time` by
/// `slot_step_minutes`, keeping every candidate whose end fits within
/// `end_time` (an end exactly equal to it is included).
pub fn candidate_starts(
    rule: &AvailabilityRule,
    date: NaiveDate,
    duration: Duration,
    tz: Tz,
) -> Vec<DateTime<Utc>> {
    if rule.slot_step_minutes <= 0 || duration <= Duration::zero() {
        return Vec::new();
    }
    let step = Duration::minutes(rule.slot_step_minutes as i64);
    let window_end = date.and_time(rule.end_time);
    let mut current = date.and_time(rule.start_time);

    let mut starts = Vec::new();
    while current + duration <= window_end {
        if let Some(start) = local_to_utc(current, tz) {
            starts.push(start);
        }
        current += step;
    }
    starts
}

/// Offerable start instants for `date`, ascending.
///
/// Rules for other weekdays are ignored. Each matching rule is expanded
/// independently and the results concatenated without deduplication, so
/// overlapping rules may yield the same candidate more than once.
pub fn compute_free_slots(
    date: NaiveDate,
    tz: Tz,
    now: DateTime<Utc>,
    duration_minutes: i32,
    rules: &[AvailabilityRule],
    blackouts: &[BlackoutDate],
    occupied: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<DateTime<Utc>> {
    let duration = Duration::minutes(duration_minutes as i64);
    let weekday = date.weekday().num_days_from_monday() as i16;

    let mut slots: Vec<DateTime<Utc>> = rules
        .iter()
        .filter(|rule| rule.weekday == weekday)
        .flat_map(|rule| candidate_starts(rule, date, duration, tz))
        .collect();

    if let Some((day_start, day_end)) = day_window(date, tz) {
        for blackout in blackouts {
            if blackout.end_at <= day_start || blackout.start_at >= day_end {
                continue;
            }
            // Only the part of the blackout intersecting this day excludes slots.
            let cut_start = blackout.start_at.max(day_start);
            let cut_end = blackout.end_at.min(day_end);
            slots.retain(|start| !ranges_overlap(*start, *start + duration, cut_start, cut_end));
        }
    }

    slots.retain(|start| {
        let end = *start + duration;
        *start >= now
            && !occupied
                .iter()
                .any(|(taken_start, taken_end)| ranges_overlap(*start, end, *taken_start, *taken_end))
    });

    // Stable sort keeps duplicate candidates from overlapping rules adjacent.
    slots.sort();
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use uuid::Uuid;

    // 2024-03-04 was a Monday; Asia/Tashkent is UTC+5 year-round.
    const TZ: Tz = chrono_tz::Asia::Tashkent;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn rule(weekday: i16, start: (u32, u32), end: (u32, u32), step: i32) -> AvailabilityRule {
        AvailabilityRule {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            weekday,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            slot_step_minutes: step,
        }
    }

    fn blackout(start: DateTime<Utc>, end: DateTime<Utc>) -> BlackoutDate {
        BlackoutDate {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            start_at: start,
            end_at: end,
            reason: None,
        }
    }

    /// Local Tashkent wall time on the test Monday, as a UTC instant.
    fn local(h: u32, m: u32) -> DateTime<Utc> {
        TZ.with_ymd_and_hms(2024, 3, 4, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn early_now() -> DateTime<Utc> {
        local(6, 0)
    }

    #[test]
    fn test_expands_rule_with_inclusive_end_fit() {
        // Monday 09:00-12:00, step 30, duration 60 -> last candidate 11:00
        // (11:00 + 60 == 12:00 is included, 11:30 + 60 > 12:00 is not).
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (12, 0), 30)],
            &[],
            &[],
        );
        assert_eq!(
            slots,
            vec![local(9, 0), local(9, 30), local(10, 0), local(10, 30), local(11, 0)]
        );
    }

    #[test]
    fn test_occupied_range_removes_overlapping_candidates() {
        // A 10:00-11:00 booking knocks out 09:30, 10:00 and 10:30.
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (12, 0), 30)],
            &[],
            &[(local(10, 0), local(11, 0))],
        );
        assert_eq!(slots, vec![local(9, 0), local(11, 0)]);
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        // Half-open ranges: a booking ending 09:30 leaves the 09:30 slot free.
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            30,
            &[rule(0, (9, 0), (10, 0), 30)],
            &[],
            &[(local(9, 0), local(9, 30))],
        );
        assert_eq!(slots, vec![local(9, 30)]);
    }

    #[test]
    fn test_rule_for_other_weekday_is_ignored() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(2, (9, 0), (12, 0), 30)],
            &[],
            &[],
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_window_shorter_than_duration_yields_nothing() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            90,
            &[rule(0, (9, 0), (10, 0), 30)],
            &[],
            &[],
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_exact_fit_yields_single_candidate() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (10, 0), 30)],
            &[],
            &[],
        );
        assert_eq!(slots, vec![local(9, 0)]);
    }

    #[test]
    fn test_blackout_excludes_partially_covered_slots() {
        // Blackout 09:45-10:15 intersects the 09:30 and 10:00 slots; 09:00
        // ends at the blackout start and 10:30 begins after it, both stay.
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            30,
            &[rule(0, (9, 0), (11, 0), 30)],
            &[blackout(local(9, 45), local(10, 15))],
            &[],
        );
        assert_eq!(slots, vec![local(9, 0), local(10, 30)]);
    }

    #[test]
    fn test_blackout_outside_day_is_ignored() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (11, 0), 60)],
            &[blackout(
                TZ.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap().with_timezone(&Utc),
                TZ.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap().with_timezone(&Utc),
            )],
            &[],
        );
        assert_eq!(slots, vec![local(9, 0), local(10, 0)]);
    }

    #[test]
    fn test_blackout_spanning_midnight_is_clipped_to_the_day() {
        // Blackout from Sunday evening until Monday 09:30 local: only the
        // Monday part excludes, so 09:00 goes but 09:30 stays.
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            30,
            &[rule(0, (9, 0), (10, 0), 30)],
            &[blackout(
                TZ.with_ymd_and_hms(2024, 3, 3, 20, 0, 0).unwrap().with_timezone(&Utc),
                local(9, 30),
            )],
            &[],
        );
        assert_eq!(slots, vec![local(9, 30)]);
    }

    #[test]
    fn test_past_candidates_are_discarded_but_now_itself_kept() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            local(10, 0),
            60,
            &[rule(0, (9, 0), (12, 0), 30)],
            &[],
            &[],
        );
        assert_eq!(slots, vec![local(10, 0), local(10, 30), local(11, 0)]);
    }

    #[test]
    fn test_split_windows_merge_sorted() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (14, 0), (16, 0), 60), rule(0, (9, 0), (11, 0), 60)],
            &[],
            &[],
        );
        assert_eq!(
            slots,
            vec![local(9, 0), local(10, 0), local(14, 0), local(15, 0)]
        );
    }

    #[test]
    fn test_overlapping_rules_keep_duplicate_candidates() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (10, 0), 30), rule(0, (9, 0), (10, 0), 30)],
            &[],
            &[],
        );
        assert_eq!(slots, vec![local(9, 0), local(9, 0)]);
    }

    #[test]
    fn test_unchanged_inputs_yield_identical_sequences() {
        let rules = [rule(0, (9, 0), (12, 0), 30)];
        let occupied = [(local(10, 0), local(11, 0))];
        let first = compute_free_slots(monday(), TZ, early_now(), 60, &rules, &[], &occupied);
        let second = compute_free_slots(monday(), TZ, early_now(), 60, &rules, &[], &occupied);
        assert_eq!(first, second);
    }

    #[test]
    fn test_nonpositive_step_produces_nothing() {
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (12, 0), 0)],
            &[],
            &[],
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_candidates_in_dst_gap_are_dropped() {
        // Europe/Berlin sprang forward 2024-03-31 (a Sunday) at 02:00 local:
        // 02:00 and 02:30 never existed on the wall clock.
        let berlin: Tz = chrono_tz::Europe::Berlin;
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let slots = compute_free_slots(
            date,
            berlin,
            Utc.with_ymd_and_hms(2024, 3, 30, 0, 0, 0).unwrap(),
            30,
            &[rule(6, (2, 0), (4, 0), 30)],
            &[],
            &[],
        );
        let expected: Vec<DateTime<Utc>> = [(3, 0), (3, 30)]
            .iter()
            .map(|(h, m)| {
                berlin
                    .with_ymd_and_hms(2024, 3, 31, *h, *m, 0)
                    .unwrap()
                    .with_timezone(&Utc)
            })
            .collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn test_slots_are_utc_instants() {
        // 09:00 in Tashkent (UTC+5) is 04:00 UTC.
        let slots = compute_free_slots(
            monday(),
            TZ,
            early_now(),
            60,
            &[rule(0, (9, 0), (11, 0), 60)],
            &[],
            &[],
        );
        assert_eq!(
            slots[0],
            Utc.with_ymd_and_hms(2024, 3, 4, 4, 0, 0).unwrap()
        );
    }
}
