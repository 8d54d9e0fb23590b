//! # Hours-of-Service Log Generation
//!
//! Simulates a trip one calendar day at a time under the property-carrying HOS
//! rules and emits a [`DailyLog`] per day.
//!
//! ## Modeled Rules
//! - **11-hour driving limit** per working day
//! - **14-hour shift window**: on-duty time per day never exceeds 14 h
//! - **30-minute break** once a day's driving reaches 8 h
//! - **70-hour / 8-day cycle**: on-duty time is drawn from a shared budget
//! - **34-hour restart**: when the budget cannot cover a minimal shift, the day is
//!   spent off duty and the budget is reset to the full 70 h
//!
//! Each working day also carries a fixed 1 h of pre/post-trip inspection time.
//!
//! ## Day Computation
//! 1. Drive `min(11, remaining)` hours, plus a break if that reaches 8 h
//! 2. Trim driving so the shift fits in 14 h
//! 3. Trim driving again so the shift fits in the remaining cycle budget
//! 4. Apportion miles at the remaining trip's average speed
//!
//! The shift trim always runs before the cycle trim. Swapping them changes the
//! final driving hours near the boundaries.
//!
//! ## Termination
//! The simulation stops when both miles and driving hours are used up, or after
//! [`MAX_SIMULATED_DAYS`]. Hitting the cap is reported through
//! [`Completion::Incomplete`] instead of being indistinguishable from a long trip.

use crate::{round1, DailyLog, DutyNote};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const MAX_DAILY_DRIVING: f64 = 11.0;
pub const MAX_SHIFT: f64 = 14.0;
pub const MAX_CYCLE: f64 = 70.0;
/// Driving hours that trigger the 30-minute break
pub const BREAK_THRESHOLD: f64 = 8.0;
pub const BREAK_DURATION: f64 = 0.5;
/// Combined pre-trip and post-trip inspection per working day
pub const PRE_POST_TRIP: f64 = 1.0;
/// Safety bound on simulated days
pub const MAX_SIMULATED_DAYS: u32 = 30;

/// Whether the simulation consumed the whole trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    Complete,
    /// The day cap was reached first; the remaining work is unscheduled.
    Incomplete {
        remaining_miles: f64,
        remaining_driving_hours: f64,
    },
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }
}

/// Output of [`generate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HosPlan {
    pub daily_logs: Vec<DailyLog>,
    pub completion: Completion,
    /// Cycle budget left after the last simulated day
    pub cycle_hours_remaining: f64,
}

/// Progress of the day-by-day simulation.
///
/// Created by [`CycleState::new`], advanced by [`CycleState::step`]. All inputs
/// are clamped to be non-negative so no numeric input can panic or loop forever.
#[derive(Clone, Debug)]
pub struct CycleState {
    cycle_hours_remaining: f64,
    remaining_miles: f64,
    remaining_driving_hours: f64,
    total_driving_hours: f64,
    current_date: NaiveDate,
    day: u32,
}

impl CycleState {
    pub fn new(
        total_miles: f64,
        total_driving_hours: f64,
        cycle_used_hours: f64,
        start_date: NaiveDate,
    ) -> Self {
        let total_driving_hours = total_driving_hours.max(0.0);
        Self {
            cycle_hours_remaining: (MAX_CYCLE - cycle_used_hours.max(0.0)).max(0.0),
            remaining_miles: total_miles.max(0.0),
            remaining_driving_hours: total_driving_hours,
            total_driving_hours,
            current_date: start_date,
            day: 1,
        }
    }

    pub fn cycle_hours_remaining(&self) -> f64 {
        self.cycle_hours_remaining
    }

    pub fn remaining_miles(&self) -> f64 {
        self.remaining_miles
    }

    pub fn remaining_driving_hours(&self) -> f64 {
        self.remaining_driving_hours
    }

    /// Day index the next [`step`](Self::step) will emit.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// True once there is no distance or driving time left.
    pub fn trip_finished(&self) -> bool {
        self.remaining_miles <= 0.0 && self.remaining_driving_hours <= 0.0
    }

    /// Simulate one day. Returns `None` when the trip is finished or the day cap
    /// has been reached.
    ///
    /// The calendar date advances by one day per call. At `NaiveDate::MAX` it
    /// stays put and a warning is logged; day numbers keep counting.
    pub fn step(&mut self) -> Option<DailyLog> {
        if self.trip_finished() || self.day > MAX_SIMULATED_DAYS {
            return None;
        }

        let min_needed = MAX_DAILY_DRIVING.min(self.remaining_driving_hours) + PRE_POST_TRIP;
        let log = if self.cycle_hours_remaining < min_needed.min(MAX_SHIFT) {
            self.rest_day()
        } else {
            self.working_day()
        };

        debug!(
            "day {}: drive {}h, on-duty {}h, {} mi, cycle left {:.1}h",
            log.day, log.drive_hours, log.on_duty_hours, log.miles, self.cycle_hours_remaining
        );

        self.day += 1;
        match self.current_date.succ_opt() {
            Some(next) => self.current_date = next,
            None => warn!("log dates stop advancing at {}", self.current_date),
        }
        Some(log)
    }

    fn rest_day(&mut self) -> DailyLog {
        self.cycle_hours_remaining = MAX_CYCLE;
        DailyLog {
            day: self.day,
            date: self.current_date,
            drive_hours: 0.0,
            on_duty_hours: 0.0,
            off_duty_hours: 24.0,
            miles: 0,
            notes: vec![DutyNote::Restart],
            is_rest_day: true,
        }
    }

    fn working_day(&mut self) -> DailyLog {
        let driving_today = MAX_DAILY_DRIVING.min(self.remaining_driving_hours);
        let break_time = break_for(driving_today);
        let mut on_duty_today = PRE_POST_TRIP + driving_today + break_time;

        if on_duty_today > MAX_SHIFT {
            on_duty_today = trimmed_on_duty(driving_today, on_duty_today - MAX_SHIFT);
        }
        if on_duty_today > self.cycle_hours_remaining {
            on_duty_today =
                trimmed_on_duty(driving_today, on_duty_today - self.cycle_hours_remaining);
        }

        let final_driving =
            driving_today.min((on_duty_today - PRE_POST_TRIP - break_time).max(0.0));

        let average_mph = self.remaining_miles / self.remaining_driving_hours.max(1.0);
        let day_miles = (average_mph * final_driving).round().max(0.0);

        let mut notes = Vec::new();
        if self.day == 1 && self.remaining_driving_hours == self.total_driving_hours {
            notes.push(DutyNote::Pickup);
        }
        if self.remaining_miles - day_miles <= 0.0 {
            notes.push(DutyNote::Delivery);
        }
        if break_time > 0.0 {
            notes.push(DutyNote::Break);
        }

        let off_duty_today = (24.0 - on_duty_today).max(0.0);

        let log = DailyLog {
            day: self.day,
            date: self.current_date,
            drive_hours: round1(final_driving),
            on_duty_hours: round1(on_duty_today),
            off_duty_hours: round1(off_duty_today),
            miles: day_miles as u32,
            notes,
            is_rest_day: false,
        };

        self.remaining_miles = (self.remaining_miles - day_miles).max(0.0);
        self.remaining_driving_hours = (self.remaining_driving_hours - final_driving).max(0.0);
        self.cycle_hours_remaining = (self.cycle_hours_remaining - on_duty_today).max(0.0);

        log
    }

    fn completion(&self) -> Completion {
        if self.trip_finished() {
            Completion::Complete
        } else {
            Completion::Incomplete {
                remaining_miles: self.remaining_miles,
                remaining_driving_hours: self.remaining_driving_hours,
            }
        }
    }
}

fn break_for(driving: f64) -> f64 {
    if driving >= BREAK_THRESHOLD {
        BREAK_DURATION
    } else {
        0.0
    }
}

/// On-duty hours after cutting `excess` from the day's driving, with the break
/// re-evaluated for the shorter drive.
fn trimmed_on_duty(driving: f64, excess: f64) -> f64 {
    let adjusted = (driving - excess).max(0.0);
    PRE_POST_TRIP + adjusted + break_for(adjusted)
}

/// Generate the daily HOS logs for a trip.
///
/// `cycle_used_hours` is the on-duty time already used in the current 70-hour
/// cycle. The first log is dated `start_date`; later logs follow one calendar day
/// apart.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use trip_planner_lib::hos;
///
/// let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let plan = hos::generate(500.0, 9.0, 0.0, start);
///
/// assert!(plan.completion.is_complete());
/// assert_eq!(plan.daily_logs.len(), 1);
/// assert_eq!(plan.daily_logs[0].on_duty_hours, 10.5);
/// ```
pub fn generate(
    total_miles: f64,
    total_driving_hours: f64,
    cycle_used_hours: f64,
    start_date: NaiveDate,
) -> HosPlan {
    let mut state =
        CycleState::new(total_miles, total_driving_hours, cycle_used_hours, start_date);
    let mut daily_logs = Vec::new();
    while let Some(log) = state.step() {
        daily_logs.push(log);
    }

    let completion = state.completion();
    if let Completion::Incomplete {
        remaining_miles,
        remaining_driving_hours,
    } = completion
    {
        warn!(
            "HOS simulation stopped after {} days with {:.0} mi / {:.1} h unscheduled",
            MAX_SIMULATED_DAYS, remaining_miles, remaining_driving_hours
        );
    }

    HosPlan {
        daily_logs,
        completion,
        cycle_hours_remaining: state.cycle_hours_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    #[test]
    fn single_day_trip_fits_all_limits() {
        let plan = generate(500.0, 9.0, 0.0, start());

        assert_eq!(plan.daily_logs.len(), 1);
        let day = &plan.daily_logs[0];
        assert_eq!(day.drive_hours, 9.0);
        assert_eq!(day.on_duty_hours, 10.5);
        assert_eq!(day.off_duty_hours, 13.5);
        assert_eq!(day.miles, 500);
        assert_eq!(
            day.notes,
            vec![DutyNote::Pickup, DutyNote::Delivery, DutyNote::Break]
        );
        assert_eq!(plan.cycle_hours_remaining, 59.5);
    }

    #[test]
    fn short_drive_takes_no_break() {
        let plan = generate(200.0, 4.0, 0.0, start());
        let day = &plan.daily_logs[0];

        assert_eq!(day.on_duty_hours, 5.0);
        assert!(!day.has_note(DutyNote::Break));
    }

    #[test]
    fn multi_day_trip_splits_at_daily_driving_cap() {
        let plan = generate(2000.0, 36.0, 0.0, start());
        let drive: Vec<f64> = plan.daily_logs.iter().map(|d| d.drive_hours).collect();
        let miles: Vec<u32> = plan.daily_logs.iter().map(|d| d.miles).collect();

        assert_eq!(drive, vec![11.0, 11.0, 11.0, 3.0]);
        assert_eq!(miles, vec![611, 611, 611, 167]);
        assert!(plan.completion.is_complete());
        assert!(plan.daily_logs[3].has_note(DutyNote::Delivery));
        assert!(!plan.daily_logs[0].has_note(DutyNote::Delivery));
    }

    #[test]
    fn exhausted_cycle_forces_restart_first() {
        let plan = generate(300.0, 5.0, 69.0, start());

        assert_eq!(plan.daily_logs.len(), 2);
        let rest = &plan.daily_logs[0];
        assert!(rest.is_rest_day);
        assert_eq!(rest.off_duty_hours, 24.0);
        assert_eq!(rest.notes, vec![DutyNote::Restart]);

        let work = &plan.daily_logs[1];
        assert!(!work.is_rest_day);
        assert_eq!(work.drive_hours, 5.0);
        assert_eq!(work.on_duty_hours, 6.0);
        assert_eq!(plan.cycle_hours_remaining, 64.0);
    }

    #[test]
    fn pickup_note_only_before_any_driving() {
        // the restart day consumes no driving, but the working day is day 2
        let plan = generate(300.0, 5.0, 70.0, start());
        assert!(plan.daily_logs.iter().all(|d| !d.has_note(DutyNote::Pickup)));

        let plan = generate(2000.0, 36.0, 0.0, start());
        assert!(plan.daily_logs[0].has_note(DutyNote::Pickup));
        assert!(!plan.daily_logs[1].has_note(DutyNote::Pickup));
    }

    #[test]
    fn restart_resets_cycle_to_full() {
        let mut state = CycleState::new(300.0, 5.0, 68.0, start());
        let log = state.step().unwrap();

        assert!(log.is_rest_day);
        assert_eq!(state.cycle_hours_remaining(), MAX_CYCLE);
        assert_eq!(state.remaining_driving_hours(), 5.0);
        assert_eq!(state.day(), 2);
    }

    #[test]
    fn cycle_trim_cuts_driving_to_fit_budget() {
        // 10.2h of cycle left: 9h drive + 1h + 0.5h break would be 10.5h
        let mut state = CycleState::new(540.0, 9.0, 59.8, start());
        let day = state.step().unwrap();

        assert!(!day.is_rest_day);
        assert_eq!(day.drive_hours, 8.7);
        assert_eq!(day.on_duty_hours, 10.2);
        assert_eq!(day.miles, 522);
        assert!(state.cycle_hours_remaining() < 1e-9);
        assert!((state.remaining_driving_hours() - 0.3).abs() < 1e-9);

        // the leftover 0.3h cannot fit in an empty cycle
        let next = state.step().unwrap();
        assert!(next.is_rest_day);
    }

    #[test]
    fn zero_trip_yields_no_logs() {
        let plan = generate(0.0, 0.0, 0.0, start());

        assert!(plan.daily_logs.is_empty());
        assert_eq!(plan.completion, Completion::Complete);
        assert_eq!(plan.cycle_hours_remaining, MAX_CYCLE);
    }

    #[test]
    fn negative_and_nan_inputs_are_clamped() {
        let plan = generate(-100.0, -5.0, -10.0, start());
        assert!(plan.daily_logs.is_empty());
        assert_eq!(plan.cycle_hours_remaining, MAX_CYCLE);

        let plan = generate(f64::NAN, f64::NAN, f64::NAN, start());
        assert!(plan.daily_logs.is_empty());

        let state = CycleState::new(100.0, 2.0, 95.0, start());
        assert_eq!(state.cycle_hours_remaining(), 0.0);
    }

    #[test]
    fn miles_without_hours_hits_day_cap() {
        let plan = generate(100.0, 0.0, 0.0, start());

        assert_eq!(plan.daily_logs.len(), MAX_SIMULATED_DAYS as usize);
        assert_eq!(
            plan.completion,
            Completion::Incomplete {
                remaining_miles: 100.0,
                remaining_driving_hours: 0.0,
            }
        );
    }

    #[test]
    fn oversized_trip_reports_incomplete() {
        let plan = generate(50_000.0, 900.0, 0.0, start());

        assert_eq!(plan.daily_logs.len(), MAX_SIMULATED_DAYS as usize);
        match plan.completion {
            Completion::Incomplete {
                remaining_miles,
                remaining_driving_hours,
            } => {
                assert!(remaining_miles > 0.0);
                assert!(remaining_driving_hours > 0.0);
            }
            Completion::Complete => panic!("trip should not converge in 30 days"),
        }
    }

    #[test]
    fn dates_advance_one_day_per_log() {
        let plan = generate(3500.0, 64.0, 20.0, start());

        for (n, log) in plan.daily_logs.iter().enumerate() {
            assert_eq!(log.day, n as u32 + 1);
            assert_eq!(log.date, start() + chrono::Days::new(n as u64));
        }
    }

    #[test]
    fn completion_serializes_with_status_tag() {
        let json = serde_json::to_value(Completion::Complete).unwrap();
        assert_eq!(json["status"], "complete");

        let json = serde_json::to_value(Completion::Incomplete {
            remaining_miles: 10.0,
            remaining_driving_hours: 1.0,
        })
        .unwrap();
        assert_eq!(json["status"], "incomplete");
        assert_eq!(json["remaining_miles"], 10.0);
    }

    #[test]
    fn dates_saturate_at_calendar_end() {
        let mut state = CycleState::new(1100.0, 20.0, 0.0, NaiveDate::MAX);
        let first = state.step().unwrap();
        let second = state.step().unwrap();

        assert_eq!(first.date, NaiveDate::MAX);
        assert_eq!(second.date, NaiveDate::MAX);
        assert_eq!(second.day, 2);
    }
}
