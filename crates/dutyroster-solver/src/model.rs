//! CP model construction
//!
//! Builds one constraint model per solve over a Boolean matrix
//! `x[soldier][day]` (1 = Base, 0 = Home). Personal unavailability is the
//! only hard rule; every other requirement is reified into indicator and
//! slack variables and priced into a single weighted objective, so any
//! input admits at least one assignment.
//!
//! Booleans are 0/1 bounded integers and all reification is linear
//! (`a = b ∧ c` as `a ≤ b`, `a ≤ c`, `a ≥ b + c − 1`; threshold
//! indicators via scaled window sums). The block machinery is written
//! once and instantiated per axis: base occupancy is `x`, home occupancy
//! is `1 − x`, with a sign/offset pair translating between them.

use dutyroster_core::RosterError;
use pumpkin_solver::constraints as cp;
use pumpkin_solver::variables::{DomainId, IntegerVariable, TransformableVariable};
use pumpkin_solver::Solver;

use crate::resolve::ResolvedInputs;
use crate::weights;

/// A built model, ready for the driver
pub(crate) struct RosterModel {
    pub solver: Solver,
    /// Decision matrix in `(soldier, day)` creation order
    pub x: Vec<Vec<DomainId>>,
    /// Weighted penalty total, to be minimized
    pub objective: DomainId,
}

fn engine(err: impl std::fmt::Debug) -> RosterError {
    RosterError::Engine(format!("{err:?}"))
}

fn post_le<Var>(solver: &mut Solver, terms: Vec<Var>, rhs: i32) -> Result<(), RosterError>
where
    Var: IntegerVariable + 'static,
{
    let tag = solver.new_constraint_tag();
    solver
        .add_constraint(cp::less_than_or_equals(terms, rhs, tag))
        .post()
        .map(|_| ())
        .map_err(engine)
}

fn post_ge<Var>(solver: &mut Solver, terms: Vec<Var>, rhs: i32) -> Result<(), RosterError>
where
    Var: IntegerVariable + 'static,
{
    let tag = solver.new_constraint_tag();
    solver
        .add_constraint(cp::greater_than_or_equals(terms, rhs, tag))
        .post()
        .map(|_| ())
        .map_err(engine)
}

fn post_eq<Var>(solver: &mut Solver, terms: Vec<Var>, rhs: i32) -> Result<(), RosterError>
where
    Var: IntegerVariable + Clone + 'static,
{
    post_le(solver, terms.clone(), rhs)?;
    post_ge(solver, terms, rhs)
}

/// Block indicators for one status axis of one soldier
struct AxisVars {
    /// `start[d]` = a block begins on day `d`
    start: Vec<DomainId>,
    /// `one_day[d]` = a block both begins and ends on day `d`; empty on a
    /// single-day horizon, where every block is one day by construction
    one_day: Vec<DomainId>,
    /// `long[d]` = a block begins on day `d` and overruns the limit
    long: Vec<DomainId>,
    /// `run_over[d]` = the `limit + 1` window at `d` is fully occupied
    run_over: Vec<DomainId>,
}

/// Build the start/end/one-day/long/run-over machinery for one axis.
///
/// Occupancy on the axis is `sign * x[d] + offset`: `(1, 0)` for base,
/// `(-1, 1)` for home. All constraints below are the occupancy-form
/// encodings rewritten into `x` terms.
fn add_block_axis(
    solver: &mut Solver,
    row: &[DomainId],
    sign: i32,
    offset: i32,
    limit: usize,
) -> Result<AxisVars, RosterError> {
    let t = row.len();

    // start[d] = occ[d] ∧ ¬occ[d-1], pinned to occ[0] at the horizon edge
    let mut start = Vec::with_capacity(t);
    for d in 0..t {
        let var = solver.new_bounded_integer(0, 1);
        if d == 0 {
            post_eq(solver, vec![var.scaled(1), row[0].scaled(-sign)], offset)?;
        } else {
            post_le(solver, vec![var.scaled(1), row[d].scaled(-sign)], offset)?;
            post_le(solver, vec![var.scaled(1), row[d - 1].scaled(sign)], 1 - offset)?;
            post_ge(
                solver,
                vec![var.scaled(1), row[d].scaled(-sign), row[d - 1].scaled(sign)],
                0,
            )?;
        }
        start.push(var);
    }

    // end[d] = occ[d] ∧ ¬occ[d+1], pinned to occ[t-1] at the horizon edge
    let mut end = Vec::with_capacity(t);
    for d in 0..t {
        let var = solver.new_bounded_integer(0, 1);
        if d == t - 1 {
            post_eq(solver, vec![var.scaled(1), row[d].scaled(-sign)], offset)?;
        } else {
            post_le(solver, vec![var.scaled(1), row[d].scaled(-sign)], offset)?;
            post_le(solver, vec![var.scaled(1), row[d + 1].scaled(sign)], 1 - offset)?;
            post_ge(
                solver,
                vec![var.scaled(1), row[d].scaled(-sign), row[d + 1].scaled(sign)],
                0,
            )?;
        }
        end.push(var);
    }

    let mut one_day = Vec::new();
    if t >= 2 {
        for d in 0..t {
            let var = solver.new_bounded_integer(0, 1);
            post_le(solver, vec![var.scaled(1), start[d].scaled(-1)], 0)?;
            post_le(solver, vec![var.scaled(1), end[d].scaled(-1)], 0)?;
            post_ge(
                solver,
                vec![var.scaled(1), start[d].scaled(-1), end[d].scaled(-1)],
                -1,
            )?;
            one_day.push(var);
        }
    }

    // Windows of limit + 1 days: `long` marks a block overrunning the
    // limit (anchored at its start), `run_over` marks any fully occupied
    // window regardless of where the run began.
    let mut long = Vec::new();
    let mut run_over = Vec::new();
    if t > limit {
        let window = limit as i32 + 1;
        for d in 0..(t - limit) {
            let lvar = solver.new_bounded_integer(0, 1);
            post_le(solver, vec![lvar.scaled(1), start[d].scaled(-1)], 0)?;
            let mut terms = vec![lvar.scaled(window)];
            terms.extend(row[d..=d + limit].iter().map(|&v| v.scaled(-sign)));
            post_le(solver, terms, window * offset)?;
            let mut terms = vec![lvar.scaled(1), start[d].scaled(-1)];
            terms.extend(row[d..=d + limit].iter().map(|&v| v.scaled(-sign)));
            post_ge(solver, terms, window * (offset - 1))?;
            long.push(lvar);

            let rvar = solver.new_bounded_integer(0, 1);
            let mut terms: Vec<_> = row[d..=d + limit].iter().map(|&v| v.scaled(sign)).collect();
            terms.push(rvar.scaled(-1));
            post_le(solver, terms, limit as i32 - window * offset)?;
            run_over.push(rvar);
        }
    }

    Ok(AxisVars { start, one_day, long, run_over })
}

/// Build the full roster model from resolved inputs.
pub(crate) fn build(inputs: &ResolvedInputs) -> Result<RosterModel, RosterError> {
    let n = inputs.soldiers.len();
    let t = inputs.n_days;
    let params = &inputs.params;
    let k_base = params.max_consecutive_base_days as usize;
    let k_home = params.max_consecutive_home_days as usize;
    let m = params.min_base_block_days as usize;

    let mut solver = Solver::default();

    // Decision matrix, created in (soldier, day) order so repeated solves
    // explore the search space identically
    let x: Vec<Vec<DomainId>> = (0..n)
        .map(|_| (0..t).map(|_| solver.new_bounded_integer(0, 1)).collect())
        .collect();

    // (variable, weight, variable upper bound) for the objective
    let mut penalties: Vec<(DomainId, i32, i64)> = Vec::new();

    // Unavailability is the only unconditionally hard rule
    for (s, soldier) in inputs.soldiers.iter().enumerate() {
        for d in 0..t {
            if soldier.unavailable[d] {
                post_le(&mut solver, vec![x[s][d].scaled(1)], 0)?;
            }
        }
    }

    for (s, soldier) in inputs.soldiers.iter().enumerate() {
        let row = &x[s];

        let base = add_block_axis(&mut solver, row, 1, 0, k_base)?;
        let home = add_block_axis(&mut solver, row, -1, 1, k_home)?;

        for &var in base.one_day.iter().chain(&home.one_day) {
            penalties.push((var, weights::W_ONE_DAY, 1));
        }
        for &var in &home.long {
            penalties.push((var, weights::W_LONG_HOME, 1));
        }
        for &var in &base.long {
            penalties.push((var, weights::W_LONG_BASE, 1));
        }
        for &var in base.run_over.iter().chain(&home.run_over) {
            penalties.push((var, weights::W_MAX_RUN, 1));
        }

        // Base blocks shorter than the minimum, anchored at their start;
        // blocks beginning in the last m-1 days are cut off by the horizon
        // rather than malformed, and are not counted
        if m >= 2 && m <= t {
            for d in 0..=(t - m) {
                let short = solver.new_bounded_integer(0, 1);
                post_le(&mut solver, vec![short.scaled(1), base.start[d].scaled(-1)], 0)?;
                let mut terms = vec![short.scaled(1)];
                terms.extend((0..m).map(|k| row[d + k].scaled(1)));
                post_le(&mut solver, terms, m as i32)?;
                let mut terms = vec![short.scaled(m as i32), base.start[d].scaled(-(m as i32))];
                terms.extend((0..m).map(|k| row[d + k].scaled(1)));
                post_ge(&mut solver, terms, 0)?;
                penalties.push((short, weights::W_SHORT_BLOCK, 1));
            }
        }

        // Base-day target with two-sided deviation
        let target = soldier.base_target.min(i32::MAX as u32) as i32;
        let deficit = solver.new_bounded_integer(0, target);
        let excess = solver.new_bounded_integer(0, t as i32);
        let mut terms: Vec<_> = row.iter().map(|&v| v.scaled(1)).collect();
        terms.push(deficit.scaled(1));
        terms.push(excess.scaled(-1));
        post_eq(&mut solver, terms, target)?;
        penalties.push((deficit, weights::W_TARGET, i64::from(target)));
        penalties.push((excess, weights::W_TARGET, t as i64));

        // Weekend-only soldiers pay for every weekday spent on base
        if soldier.weekend_only {
            for d in 0..t {
                if !inputs.kinds[d].is_weekend() {
                    let spill = solver.new_bounded_integer(0, 1);
                    post_le(&mut solver, vec![row[d].scaled(1), spill.scaled(-1)], 0)?;
                    penalties.push((spill, weights::W_WEEKEND, 1));
                }
            }
        }
    }

    // Daily coverage floor with per-day shortage slack
    let min_required = params.min_required_soldiers_per_day.min(i32::MAX as u32) as i32;
    if min_required > 0 {
        for d in 0..t {
            let shortage = solver.new_bounded_integer(0, min_required);
            let mut terms: Vec<_> = (0..n).map(|s| x[s][d].scaled(1)).collect();
            terms.push(shortage.scaled(1));
            post_ge(&mut solver, terms, min_required)?;
            penalties.push((shortage, weights::W_SHORTAGE, i64::from(min_required)));
        }
    }

    // Tie the objective variable to the weighted penalty sum
    let ub: i64 = penalties.iter().map(|&(_, w, b)| i64::from(w) * b).sum();
    let ub = ub.min(i64::from(i32::MAX) - 1) as i32;
    let objective = solver.new_bounded_integer(0, ub);
    let mut terms: Vec<_> = penalties.iter().map(|&(v, w, _)| v.scaled(w)).collect();
    terms.push(objective.scaled(-1));
    post_eq(&mut solver, terms, 0)?;

    tracing::debug!(
        soldiers = n,
        days = t,
        penalty_terms = penalties.len(),
        objective_ub = ub,
        "built roster model"
    );

    Ok(RosterModel { solver, x, objective })
}
