//! Renderer integration tests
//!
//! The text grid and the JSON contract are both driven from hand-built
//! outcomes so the expected shapes are fully pinned down, plus one
//! failure outcome built from the real demand analysis.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dutyroster_core::{
    DayAssignment, DayStatus, Renderer, Roster, RosterParameters, Soldier, SoldierTotals,
    SolveOutcome, SolveStatus,
};
use dutyroster_render::{JsonRenderer, TextRenderer};
use dutyroster_solver::analyze_demand;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn small_outcome() -> SolveOutcome {
    // 2026-01-01 (Thu) .. 2026-01-05 (Mon)
    let dates: Vec<NaiveDate> = (1..=5).map(|d| date(2026, 1, d)).collect();
    let rows: Vec<(&str, [bool; 5])> = vec![
        ("Adar", [true, true, true, false, false]),
        ("Ben", [false, false, true, true, false]),
    ];

    let mut schedules = BTreeMap::new();
    let mut totals = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, u32> = dates.iter().map(|&d| (d, 0)).collect();

    for (name, row) in &rows {
        let days: Vec<DayAssignment> = dates
            .iter()
            .zip(row)
            .map(|(&date, &on_base)| DayAssignment {
                date,
                status: if on_base { DayStatus::Base } else { DayStatus::Home },
            })
            .collect();
        let base_days = row.iter().filter(|&&b| b).count() as u32;
        for (&date, &on_base) in dates.iter().zip(row) {
            if on_base {
                *daily.get_mut(&date).unwrap() += 1;
            }
        }
        let blocks = if base_days > 0 { vec![base_days] } else { vec![] };
        schedules.insert((*name).to_string(), days);
        totals.insert(
            (*name).to_string(),
            SoldierTotals { base_days, home_days: 5 - base_days, blocks },
        );
    }

    SolveOutcome {
        status: SolveStatus::Optimal,
        objective: Some(420),
        roster: Some(Roster { schedules, totals, daily_soldiers_count: daily }),
        demand: None,
    }
}

// ============================================================================
// Text renderer
// ============================================================================

#[test]
fn text_grid_has_one_row_per_soldier_and_a_coverage_footer() {
    let outcome = small_outcome();
    let text = TextRenderer::new().render(&outcome).unwrap();

    assert!(text.contains("status: OPTIMAL"), "missing status line:\n{text}");
    assert!(text.contains("objective: 420"));
    assert!(text.contains("Adar"));
    assert!(text.contains("Ben"));
    // Adar: three base days then two home days
    assert!(text.contains("BBB\u{b7}\u{b7}"), "missing Adar's cells:\n{text}");
    // Coverage per day: 1 1 2 1 0
    assert!(text.contains("11210"), "missing coverage footer:\n{text}");
}

#[test]
fn text_ruler_marks_weekdays() {
    let outcome = small_outcome();
    let text = TextRenderer::new().render(&outcome).unwrap();
    // Thu Fri Sat Sun Mon
    assert!(text.contains("TFSSM"), "missing weekday ruler:\n{text}");
}

#[test]
fn text_render_of_a_failure_outcome_shows_the_demand_analysis() {
    let params = RosterParameters::new(date(2026, 1, 1), date(2026, 1, 7))
        .targets(3, 4)
        .consecutive_limits(5, 5)
        .min_base_block(2)
        .min_required_per_day(10);
    let soldiers: Vec<Soldier> = (0..3).map(|i| Soldier::new(format!("s-{i}"))).collect();
    let demand = analyze_demand(&params, &soldiers).unwrap();

    let outcome = SolveOutcome {
        status: SolveStatus::Unknown,
        objective: None,
        roster: None,
        demand: Some(demand),
    };
    let text = TextRenderer::new().render(&outcome).unwrap();

    assert!(text.contains("status: UNKNOWN"));
    assert!(text.contains("no roster produced"));
    assert!(text.contains("soldier-days available: 21 of 21"));
    assert!(text.contains("soldier-days required:  70"));
}

// ============================================================================
// JSON renderer
// ============================================================================

#[test]
fn json_render_matches_the_solution_contract() {
    let outcome = small_outcome();
    let json = JsonRenderer::new().render(&outcome).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["status"], "OPTIMAL");
    assert_eq!(value["objective_value"], 420);
    assert_eq!(value["schedules"]["Adar"][0]["date"], "2026-01-01");
    assert_eq!(value["schedules"]["Adar"][0]["status"], "Base");
    assert_eq!(value["schedules"]["Adar"][4]["status"], "Home");
    assert_eq!(value["totals"]["Ben"]["base_days"], 2);
    assert_eq!(value["totals"]["Ben"]["blocks"][0], 2);
    assert_eq!(value["daily_soldiers_count"]["2026-01-03"], 2);
    assert!(value["demand_analysis"].is_null());
}

#[test]
fn json_render_of_a_failure_outcome_has_null_schedules() {
    let outcome = SolveOutcome {
        status: SolveStatus::Infeasible,
        objective: None,
        roster: None,
        demand: None,
    };
    let json = JsonRenderer::pretty().render(&outcome).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["status"], "INFEASIBLE");
    assert!(value["objective_value"].is_null());
    assert!(value["schedules"].is_null());
    assert!(value["daily_soldiers_count"].is_null());
}
