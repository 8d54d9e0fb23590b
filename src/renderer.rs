//! # Trip Plan Text Rendering
//!
//! Renders a [`TripResponse`] for the terminal: a summary header, the fuel stop
//! list, and one line per log day followed by a 48-cell duty strip (one cell per
//! half hour).
//!
//! ```text
//! Day 1 (Mar 03, 2025): Drive 9.0h, On-duty 10.5h, Off-duty 13.5h, Miles 500 [Pickup, Delivery, 30-min break]
//!     DDDDDDDDDDDDDDDDDDOOO...........................
//! ```
//!
//! Strip legend: `D` driving, `O` on duty not driving, `.` off duty. The strip
//! shows totals only, not when during the day each status happened.

use crate::hos::Completion;
use crate::trip::TripResponse;
use crate::DailyLog;
use std::fmt::{self, Write};

const STRIP_CELLS: usize = 48;
const STRIP_INDENT: &str = "    ";

/// Render the whole plan as text.
pub fn render_text(trip: &TripResponse) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_trip(&mut out, trip);
    out
}

/// Print the rendered plan to stdout.
pub fn draw_ascii(trip: &TripResponse) {
    print!("{}", render_text(trip));
}

/// Write the whole plan to any text sink.
pub fn write_trip<W: Write>(out: &mut W, trip: &TripResponse) -> fmt::Result {
    writeln!(out, "Trip {}", trip.id)?;
    writeln!(out, "  Current:  {}", trip.current_location.display_name)?;
    writeln!(out, "  Pickup:   {}", trip.pickup_location.display_name)?;
    writeln!(out, "  Drop-off: {}", trip.dropoff_location.display_name)?;
    writeln!(
        out,
        "  {} mi, {:.1} h total, {} day(s), {:.1} cycle hours remaining",
        trip.total_miles, trip.total_hours, trip.total_days, trip.cycle_hours_remaining
    )?;

    if trip.estimated {
        writeln!(out, "⚠ ESTIMATED: route or locations are offline approximations")?;
    }
    if let Completion::Incomplete {
        remaining_miles,
        remaining_driving_hours,
    } = &trip.completion
    {
        writeln!(
            out,
            "⚠ INCOMPLETE: {:.0} mi / {:.1} h driving not scheduled",
            remaining_miles, remaining_driving_hours
        )?;
    }

    writeln!(out)?;
    if trip.fuel_stops.is_empty() {
        writeln!(out, "Fuel stops: none")?;
    } else {
        writeln!(out, "Fuel stops:")?;
        for stop in &trip.fuel_stops {
            writeln!(out, "  {} at {}", stop.label, stop.coordinate)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Daily logs:")?;
    for log in &trip.daily_logs {
        writeln!(out, "{}", format_log_line(log))?;
        writeln!(out, "{STRIP_INDENT}{}", duty_strip(log))?;
    }
    Ok(())
}

/// One row of the log table.
pub fn format_log_line(log: &DailyLog) -> String {
    let line = format!(
        "Day {} ({}): Drive {:.1}h, On-duty {:.1}h, Off-duty {:.1}h, Miles {}",
        log.day,
        log.date.format("%b %d, %Y"),
        log.drive_hours,
        log.on_duty_hours,
        log.off_duty_hours,
        log.miles
    );
    if log.notes.is_empty() {
        return line;
    }
    let notes: Vec<&str> = log.notes.iter().map(|n| n.as_str()).collect();
    format!("{line} [{}]", notes.join(", "))
}

/// Half-hour duty strip for one day.
pub fn duty_strip(log: &DailyLog) -> String {
    let cells = |hours: f64| ((hours * 2.0).round().max(0.0) as usize).min(STRIP_CELLS);

    let driving = cells(log.drive_hours);
    let on_duty = cells(log.non_driving_on_duty_hours()).min(STRIP_CELLS - driving);
    let off_duty = STRIP_CELLS - driving - on_duty;

    let mut strip = String::with_capacity(STRIP_CELLS);
    strip.extend(std::iter::repeat('D').take(driving));
    strip.extend(std::iter::repeat('O').take(on_duty));
    strip.extend(std::iter::repeat('.').take(off_duty));
    strip
}
