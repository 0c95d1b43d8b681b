//! # dutyroster-render
//!
//! Rendering backends for dutyroster outcomes.
//!
//! This crate provides:
//! - Text calendar rendering for console output
//! - JSON rendering of the solution contract
//!
//! ## Example
//!
//! ```rust,ignore
//! use dutyroster_core::Renderer;
//! use dutyroster_render::{JsonRenderer, TextRenderer};
//!
//! let text = TextRenderer::new().render(&outcome)?;
//! println!("{text}");
//!
//! let json = JsonRenderer::pretty().render(&outcome)?;
//! std::fs::write("roster.json", json)?;
//! ```

use chrono::Datelike;
use dutyroster_core::{DayStatus, RenderError, Renderer, SolveOutcome};
use serde_json::json;
use std::fmt::Write as _;

/// Cell glyphs for the calendar grid
const BASE_CELL: char = 'B';
const HOME_CELL: char = '\u{b7}'; // middle dot

/// Plain text calendar renderer for console output.
///
/// One row per soldier, one column per day, with per-soldier totals on
/// the right and the per-day headcount as a footer. Failure outcomes
/// render the demand analysis instead of a grid.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Width of the soldier name column
    pub name_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { name_width: 16 }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the name column width
    pub fn name_width(mut self, width: usize) -> Self {
        self.name_width = width.max(4);
        self
    }

    fn render_grid(&self, outcome: &SolveOutcome, out: &mut String) {
        let Some(roster) = &outcome.roster else {
            return;
        };

        let dates: Vec<_> = roster.daily_soldiers_count.keys().copied().collect();
        if dates.is_empty() {
            return;
        }

        // Weekday ruler: one initial per day
        let mut ruler = String::new();
        for date in &dates {
            let initial = match date.weekday() {
                chrono::Weekday::Mon => 'M',
                chrono::Weekday::Tue => 'T',
                chrono::Weekday::Wed => 'W',
                chrono::Weekday::Thu => 'T',
                chrono::Weekday::Fri => 'F',
                chrono::Weekday::Sat => 'S',
                chrono::Weekday::Sun => 'S',
            };
            ruler.push(initial);
        }
        let _ = writeln!(out, "{:width$} {}  base home blocks", "", ruler, width = self.name_width);

        for (name, days) in &roster.schedules {
            let mut cells = String::with_capacity(days.len());
            for day in days {
                cells.push(match day.status {
                    DayStatus::Base => BASE_CELL,
                    DayStatus::Home => HOME_CELL,
                });
            }
            let totals = &roster.totals[name];
            let blocks = totals
                .blocks
                .iter()
                .map(|len| len.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(
                out,
                "{:width$} {}  {:<4} {:<4} {}",
                truncate(name, self.name_width),
                cells,
                totals.base_days,
                totals.home_days,
                blocks,
                width = self.name_width
            );
        }

        // Coverage footer, one digit per day ('+' past 9)
        let mut coverage = String::new();
        for count in roster.daily_soldiers_count.values() {
            if *count > 9 {
                coverage.push('+');
            } else {
                coverage.push(char::from_digit(*count, 10).unwrap_or('?'));
            }
        }
        let _ = writeln!(out, "{:width$} {}", "coverage", coverage, width = self.name_width);
    }

    fn render_demand(outcome: &SolveOutcome, out: &mut String) {
        let Some(demand) = &outcome.demand else {
            return;
        };
        let _ = writeln!(out, "demand analysis:");
        let _ = writeln!(out, "  soldiers:               {}", demand.n_soldiers);
        let _ = writeln!(out, "  days:                   {}", demand.n_days);
        let _ = writeln!(
            out,
            "  soldier-days available: {} of {}",
            demand.available_soldier_days, demand.total_soldier_days
        );
        let _ = writeln!(out, "  soldier-days required:  {}", demand.required_soldier_days);
        let _ = writeln!(
            out,
            "  base blocks needed:     {} ({} forced gap days)",
            demand.min_blocks, demand.implied_gap_days
        );
        if let Some(cause) = demand.suspected {
            let _ = writeln!(out, "  suspected cause:        {cause:?}");
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, outcome: &SolveOutcome) -> Result<String, RenderError> {
        let mut out = String::new();
        let _ = writeln!(out, "status: {}", outcome.status);
        if let Some(objective) = outcome.objective {
            let _ = writeln!(out, "objective: {objective}");
        }
        let _ = writeln!(out);

        if outcome.roster.is_some() {
            self.render_grid(outcome, &mut out);
        } else {
            let _ = writeln!(out, "no roster produced");
            Self::render_demand(outcome, &mut out);
        }
        Ok(out)
    }
}

/// JSON renderer emitting the solution contract:
/// `status`, `objective_value`, `schedules`, `totals`,
/// `daily_soldiers_count`, and `demand_analysis` on failure outcomes.
#[derive(Clone, Debug, Default)]
pub struct JsonRenderer {
    /// Pretty-print with indentation
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pretty-printing renderer
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, outcome: &SolveOutcome) -> Result<String, RenderError> {
        let err = |e: serde_json::Error| RenderError::Format(e.to_string());

        let (schedules, totals, daily) = match &outcome.roster {
            Some(roster) => (
                serde_json::to_value(&roster.schedules).map_err(err)?,
                serde_json::to_value(&roster.totals).map_err(err)?,
                serde_json::to_value(&roster.daily_soldiers_count).map_err(err)?,
            ),
            None => (json!(null), json!(null), json!(null)),
        };

        let value = json!({
            "status": outcome.status.name(),
            "objective_value": outcome.objective,
            "schedules": schedules,
            "totals": totals,
            "daily_soldiers_count": daily,
            "demand_analysis": serde_json::to_value(&outcome.demand).map_err(err)?,
        });

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value).map_err(err)?
        } else {
            serde_json::to_string(&value).map_err(err)?
        };
        Ok(rendered)
    }
}

/// Truncate a string to a maximum length with ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Short", 16), "Short");
        assert_eq!(truncate("A very long soldier name", 10), "A very ...");
    }

    #[test]
    fn renderer_configuration() {
        let renderer = TextRenderer::new().name_width(24);
        assert_eq!(renderer.name_width, 24);
        // Below the floor the width clamps rather than collapsing the grid
        let renderer = TextRenderer::new().name_width(1);
        assert_eq!(renderer.name_width, 4);
    }
}
