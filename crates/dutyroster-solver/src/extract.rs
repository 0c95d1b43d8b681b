//! Solution extraction
//!
//! Turns an assigned decision matrix into the canonical roster: ordered
//! per-soldier day lists, per-soldier totals with block lengths, and the
//! per-day headcount histogram. Also evaluates the penalty formula over a
//! concrete matrix, which is what `score_roster` and the objective
//! consistency checks rely on.

use std::collections::BTreeMap;

use dutyroster_core::{DayAssignment, DayStatus, Roster, SoldierTotals};

use crate::resolve::ResolvedInputs;
use crate::weights;

/// Lengths of the maximal runs of `value` in `row`, in day order
pub(crate) fn run_lengths(row: &[bool], value: bool) -> Vec<u32> {
    let mut runs = Vec::new();
    let mut current = 0u32;
    for &cell in row {
        if cell == value {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

/// Build the canonical roster from an assigned matrix.
pub(crate) fn build_roster(inputs: &ResolvedInputs, matrix: &[Vec<bool>]) -> Roster {
    let mut schedules = BTreeMap::new();
    let mut totals = BTreeMap::new();
    let mut daily: Vec<u32> = vec![0; inputs.n_days];

    for (s, soldier) in inputs.soldiers.iter().enumerate() {
        let row = &matrix[s];
        let days: Vec<DayAssignment> = inputs
            .dates
            .iter()
            .zip(row)
            .map(|(&date, &on_base)| DayAssignment {
                date,
                status: if on_base { DayStatus::Base } else { DayStatus::Home },
            })
            .collect();

        let blocks = run_lengths(row, true);
        let base_days = blocks.iter().sum::<u32>();
        let home_days = inputs.n_days as u32 - base_days;

        for (d, &on_base) in row.iter().enumerate() {
            if on_base {
                daily[d] += 1;
            }
        }

        schedules.insert(soldier.name.clone(), days);
        totals.insert(soldier.name.clone(), SoldierTotals { base_days, home_days, blocks });
    }

    let daily_soldiers_count = inputs.dates.iter().copied().zip(daily).collect();

    Roster { schedules, totals, daily_soldiers_count }
}

/// Number of fully occupied `limit + 1` windows in `row` for the given
/// status; equals the minimal total of the model's windowed run slacks.
fn over_full_windows(row: &[bool], value: bool, limit: usize) -> i64 {
    let t = row.len();
    if t <= limit {
        return 0;
    }
    (0..(t - limit))
        .filter(|&d| row[d..=d + limit].iter().all(|&cell| cell == value))
        .count() as i64
}

/// Evaluate the weighted penalty formula over a concrete matrix.
///
/// Mirrors the model's objective exactly; on an `Optimal` outcome the
/// solver's objective value equals this evaluation.
pub(crate) fn evaluate_penalty(inputs: &ResolvedInputs, matrix: &[Vec<bool>]) -> i64 {
    let t = inputs.n_days;
    let params = &inputs.params;
    let k_base = params.max_consecutive_base_days as usize;
    let k_home = params.max_consecutive_home_days as usize;
    let m = params.min_base_block_days as usize;

    let mut total = 0i64;

    for (s, soldier) in inputs.soldiers.iter().enumerate() {
        let row = &matrix[s];
        let base_blocks = run_lengths(row, true);
        let home_blocks = run_lengths(row, false);

        if t >= 2 {
            let one_day = base_blocks.iter().filter(|&&len| len == 1).count()
                + home_blocks.iter().filter(|&&len| len == 1).count();
            total += one_day as i64 * i64::from(weights::W_ONE_DAY);
        }

        let long_home = home_blocks.iter().filter(|&&len| len as usize > k_home).count();
        total += long_home as i64 * i64::from(weights::W_LONG_HOME);
        let long_base = base_blocks.iter().filter(|&&len| len as usize > k_base).count();
        total += long_base as i64 * i64::from(weights::W_LONG_BASE);

        total += over_full_windows(row, true, k_base) * i64::from(weights::W_MAX_RUN);
        total += over_full_windows(row, false, k_home) * i64::from(weights::W_MAX_RUN);

        if m >= 2 && m <= t {
            // Short blocks are anchored at their start; blocks beginning in
            // the last m-1 days are cut off by the horizon and not counted
            let mut d = 0;
            let mut short = 0i64;
            while d < t {
                if row[d] && (d == 0 || !row[d - 1]) {
                    let len = row[d..].iter().take_while(|&&cell| cell).count();
                    if d <= t - m && len < m {
                        short += 1;
                    }
                    d += len;
                } else {
                    d += 1;
                }
            }
            total += short * i64::from(weights::W_SHORT_BLOCK);
        }

        let base_days = row.iter().filter(|&&cell| cell).count() as i64;
        let deviation = (base_days - i64::from(soldier.base_target)).abs();
        total += deviation * i64::from(weights::W_TARGET);

        if soldier.weekend_only {
            let spill = row
                .iter()
                .enumerate()
                .filter(|&(d, &cell)| cell && !inputs.kinds[d].is_weekend())
                .count() as i64;
            total += spill * i64::from(weights::W_WEEKEND);
        }
    }

    let min_required = i64::from(params.min_required_soldiers_per_day);
    if min_required > 0 {
        for d in 0..t {
            let coverage = (0..matrix.len()).filter(|&s| matrix[s][d]).count() as i64;
            total += (min_required - coverage).max(0) * i64::from(weights::W_SHORTAGE);
        }
    }

    total
}
