//! Solution invariant test suite
//!
//! These properties must hold on every returned roster, whatever the
//! inputs:
//!
//! 1. Unavailable days come back as Home
//! 2. Daily headcounts equal the column sums of the schedules
//! 3. Per-soldier base + home days cover the horizon exactly
//! 4. The reported objective prices the returned assignment
//!
//! Plus the solver laws: determinism, priority dominance, and
//! monotonicity in the consecutive-base limit.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use dutyroster_core::{
    DayAssignment, DayStatus, Roster, RosterParameters, Soldier, SoldierTotals, SolveOutcome,
    SolveStatus,
};
use dutyroster_solver::{score_roster, RosterSolver};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn squad(count: usize) -> Vec<Soldier> {
    (0..count)
        .map(|i| Soldier::new(format!("s-{i:03}")).name(format!("Soldier_{}", i + 1)))
        .collect()
}

fn mixed_params() -> RosterParameters {
    RosterParameters::new(date(2026, 1, 1), date(2026, 1, 12))
        .targets(6, 6)
        .consecutive_limits(4, 5)
        .min_base_block(2)
        .min_required_per_day(3)
}

fn mixed_squad() -> Vec<Soldier> {
    let mut soldiers = squad(7);
    soldiers[1] = soldiers[1].clone().unavailable_between(date(2026, 1, 3), date(2026, 1, 5));
    soldiers[4] = soldiers[4].clone().exceptional_output();
    soldiers[6] = soldiers[6].clone().weekend_only();
    soldiers
}

fn solve_mixed() -> SolveOutcome {
    RosterSolver::with_time_limit(Duration::from_secs(30))
        .solve(&mixed_params(), &mixed_squad())
        .unwrap()
}

// ============================================================================
// INVARIANT 1: Unavailability is hard
// ============================================================================

#[test]
fn unavailable_days_are_always_home() {
    let outcome = solve_mixed();
    assert!(outcome.is_solved(), "status: {}", outcome.status);
    let roster = outcome.roster.as_ref().unwrap();

    let schedule = roster.schedule_for("Soldier_2").unwrap();
    for day in schedule {
        if day.date >= date(2026, 1, 3) && day.date <= date(2026, 1, 5) {
            assert_eq!(day.status, DayStatus::Home, "hard unavailability on {}", day.date);
        }
    }
}

// ============================================================================
// INVARIANT 2: Headcounts are column sums
// ============================================================================

#[test]
fn daily_counts_equal_schedule_column_sums() {
    let outcome = solve_mixed();
    let roster = outcome.roster.as_ref().unwrap();

    let mut recount: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for days in roster.schedules.values() {
        for day in days {
            if day.status == DayStatus::Base {
                *recount.entry(day.date).or_insert(0) += 1;
            }
        }
    }
    for (date, &count) in &roster.daily_soldiers_count {
        assert_eq!(recount.get(date).copied().unwrap_or(0), count, "headcount on {date}");
    }
}

// ============================================================================
// INVARIANT 3: Totals cover the horizon
// ============================================================================

#[test]
fn totals_cover_the_horizon_exactly() {
    let outcome = solve_mixed();
    let roster = outcome.roster.as_ref().unwrap();
    let n_days = mixed_params().n_days() as u32;

    for (name, totals) in &roster.totals {
        assert_eq!(
            totals.base_days + totals.home_days,
            n_days,
            "{name} totals must cover every day"
        );
        assert_eq!(
            totals.blocks.iter().sum::<u32>(),
            totals.base_days,
            "{name} block lengths must sum to base days"
        );
        assert_eq!(roster.schedules[name].len(), n_days as usize);
    }
}

// ============================================================================
// INVARIANT 4: The objective prices the returned assignment
// ============================================================================

#[test]
fn objective_prices_the_returned_assignment() {
    let outcome = solve_mixed();
    let roster = outcome.roster.as_ref().unwrap();
    let objective = outcome.objective.expect("objective on a solved outcome");

    let score = score_roster(&mixed_params(), &mixed_squad(), roster).unwrap();
    match outcome.status {
        // At the optimum every slack sits at its floor
        SolveStatus::Optimal => assert_eq!(objective, score),
        // An incumbent may carry inflated slack, never deflated
        _ => assert!(objective >= score, "objective {objective} below true cost {score}"),
    }
}

// ============================================================================
// LAW: Determinism
// ============================================================================

#[test]
fn identical_inputs_solve_identically() {
    let solver = RosterSolver::with_time_limit(Duration::from_secs(20));
    let first = solver.solve(&mixed_params(), &mixed_squad()).unwrap();
    let second = solver.solve(&mixed_params(), &mixed_squad()).unwrap();

    assert_eq!(first.status, second.status, "same inputs, same status");
    if first.status == SolveStatus::Optimal && second.status == SolveStatus::Optimal {
        assert_eq!(first.objective, second.objective, "same optimum value");
    }
}

// ============================================================================
// LAW: Priority dominance
// ============================================================================

#[test]
fn one_day_block_outweighs_a_short_block() {
    // One soldier, one week, target 3, minimum block 3. A lone base day on
    // the final day is a one-day block the horizon exempts from the short
    // count; a 2-day block at the start is short but not one-day.
    let params = RosterParameters::new(date(2026, 1, 1), date(2026, 1, 7))
        .targets(3, 4)
        .consecutive_limits(7, 7)
        .min_base_block(3)
        .min_required_per_day(0);
    let soldiers = vec![Soldier::new("s-001").name("Soldier_1")];

    let lonely = hand_roster(&params, &[false, false, false, false, false, false, true]);
    let short = hand_roster(&params, &[true, true, false, false, false, false, false]);

    let lonely_cost = score_roster(&params, &soldiers, &lonely).unwrap();
    let short_cost = score_roster(&params, &soldiers, &short).unwrap();

    assert!(
        lonely_cost > short_cost,
        "one one-day block ({lonely_cost}) must outscore one short block ({short_cost})"
    );
    assert!(lonely_cost >= i64::from(dutyroster_solver::weights::W_ONE_DAY));
    assert!(short_cost < i64::from(dutyroster_solver::weights::W_LONG_BASE));
}

// ============================================================================
// LAW: Monotonicity in the consecutive-base limit
// ============================================================================

#[test]
fn raising_the_base_limit_never_worsens_the_optimum() {
    let base_params = RosterParameters::new(date(2026, 1, 1), date(2026, 1, 10))
        .targets(7, 3)
        .consecutive_limits(3, 7)
        .min_base_block(3)
        .min_required_per_day(2);
    let soldiers = squad(4);

    let solver = RosterSolver::with_time_limit(Duration::from_secs(20));

    let tight = solver.solve(&base_params, &soldiers).unwrap();
    let mut relaxed_params = base_params;
    relaxed_params.max_consecutive_base_days = 5;
    let relaxed = solver.solve(&relaxed_params, &soldiers).unwrap();

    assert_eq!(tight.status, SolveStatus::Optimal, "instance is small enough to prove");
    assert_eq!(relaxed.status, SolveStatus::Optimal);
    assert!(
        relaxed.objective.unwrap() <= tight.objective.unwrap(),
        "relaxing a limit must not worsen the optimum ({:?} vs {:?})",
        relaxed.objective,
        tight.objective
    );
}

/// Build a one-soldier roster by hand from a base-day mask.
fn hand_roster(params: &RosterParameters, mask: &[bool]) -> Roster {
    let dates = params.dates();
    assert_eq!(dates.len(), mask.len());

    let days: Vec<DayAssignment> = dates
        .iter()
        .zip(mask)
        .map(|(&date, &on_base)| DayAssignment {
            date,
            status: if on_base { DayStatus::Base } else { DayStatus::Home },
        })
        .collect();

    let mut blocks = Vec::new();
    let mut run = 0u32;
    for &on_base in mask {
        if on_base {
            run += 1;
        } else if run > 0 {
            blocks.push(run);
            run = 0;
        }
    }
    if run > 0 {
        blocks.push(run);
    }
    let base_days = mask.iter().filter(|&&b| b).count() as u32;

    let mut schedules = BTreeMap::new();
    schedules.insert("Soldier_1".to_string(), days);
    let mut totals = BTreeMap::new();
    totals.insert(
        "Soldier_1".to_string(),
        SoldierTotals { base_days, home_days: mask.len() as u32 - base_days, blocks },
    );
    let daily_soldiers_count = dates
        .iter()
        .zip(mask)
        .map(|(&date, &on_base)| (date, u32::from(on_base)))
        .collect();

    Roster { schedules, totals, daily_soldiers_count }
}
