//! Output formatting for plans and nearest-stop results.
//!
//! Renderers write to any [`Write`] so they can be exercised without a
//! terminal; `main` hands them a locked stdout.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use tranzit_lib::{DirectRoutePlan, NearestStop, UNKNOWN_ROUTE_NAME};

use crate::terminal::{format_distance, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly summary with the full polyline.
    #[default]
    Text,
    /// One line per polyline point with `+`/`|`/`-` prefixes.
    Basic,
    /// Pretty-printed JSON, identical to the HTTP response body.
    Json,
}

fn line_label(plan: &DirectRoutePlan) -> String {
    let route = &plan.route;
    if route.short_name == UNKNOWN_ROUTE_NAME {
        match route.route_id.as_deref() {
            Some(route_id) => format!("route {}", route_id),
            None => "an unnamed route".to_string(),
        }
    } else if route.long_name == UNKNOWN_ROUTE_NAME {
        format!("line {}", route.short_name)
    } else {
        format!("line {} ({})", route.short_name, route.long_name)
    }
}

fn format_point(point: &[f64; 2]) -> String {
    format!("{:.6}, {:.6}", point[0], point[1])
}

/// Render a direct plan as a human-readable summary.
pub fn render_route_text<W: Write>(
    out: &mut W,
    plan: &DirectRoutePlan,
    from: &str,
    to: &str,
    palette: ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "Direct route from {wb}{from}{r} to {wb}{to}{r} on {wb}{line}{r}",
        wb = p.white_bold,
        r = p.reset,
        line = line_label(plan),
    )?;

    let trip_id = plan.trip.trip_id.as_deref().unwrap_or("<unknown>");
    match plan.trip.trip_headsign.as_deref() {
        Some(headsign) => writeln!(out, "Trip {} towards {}", trip_id, headsign)?,
        None => writeln!(out, "Trip {}", trip_id)?,
    }

    let len = plan.polyline.len();
    for (i, point) in plan.polyline.iter().enumerate() {
        if i == 0 {
            writeln!(out, "{}BOARD {} {}", p.tag_board, p.reset, format_point(point))?;
        } else if i + 1 == len {
            writeln!(out, "{}ALIGHT{} {}", p.tag_alight, p.reset, format_point(point))?;
        } else {
            writeln!(out, "{}  |    {}{}", p.gray, format_point(point), p.reset)?;
        }
    }

    writeln!(out, "\n{}{}{} shape points", p.green, len, p.reset)
}

/// Render a direct plan in basic path format.
pub fn render_route_basic<W: Write>(out: &mut W, plan: &DirectRoutePlan) -> io::Result<()> {
    let len = plan.polyline.len();
    for (i, point) in plan.polyline.iter().enumerate() {
        let prefix = if i == 0 {
            '+'
        } else if i + 1 == len {
            '-'
        } else {
            '|'
        };
        writeln!(out, "{} {}", prefix, format_point(point))?;
    }
    writeln!(out, "via {}", line_label(plan))
}

/// Render the nearest stop as a short summary.
pub fn render_nearest_text<W: Write>(
    out: &mut W,
    nearest: &NearestStop,
    palette: ColorPalette,
) -> io::Result<()> {
    let p = palette;
    let stop = &nearest.stop;
    let name = stop.stop_name.as_deref().unwrap_or("<unnamed>");
    writeln!(
        out,
        "Nearest stop: {}{}{} ({})",
        p.white_bold, name, p.reset, stop.stop_id
    )?;
    writeln!(
        out,
        "Distance: {}{}{}",
        p.cyan,
        format_distance(nearest.distance_meters),
        p.reset
    )?;
    match stop.coordinates() {
        Some(point) => writeln!(out, "Location: {}", format_point(&point.as_pair())),
        None => Ok(()),
    }
}

/// Render the nearest stop on a single line.
pub fn render_nearest_basic<W: Write>(out: &mut W, nearest: &NearestStop) -> io::Result<()> {
    let stop = &nearest.stop;
    writeln!(
        out,
        "+ {} ({}) {}",
        stop.stop_name.as_deref().unwrap_or("<unnamed>"),
        stop.stop_id,
        format_distance(nearest.distance_meters)
    )
}

/// Render any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}
