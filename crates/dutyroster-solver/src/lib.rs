//! # dutyroster-solver
//!
//! Constraint-programming rostering solver.
//!
//! One `solve()` call runs a strictly linear pipeline: parameter
//! resolution, CP model construction, a single bounded optimisation run,
//! and solution extraction. Nothing survives the call; two solves on
//! disjoint inputs are independent.
//!
//! Almost every requirement is soft. Operator inputs routinely
//! overconstrain a roster, and an `INFEASIBLE` answer is useless in
//! production, so daily coverage, per-soldier targets, run limits and
//! block shaping are all priced into one weighted objective instead of
//! being cut into the model. Personal unavailability is the only hard
//! rule.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dutyroster_core::{RosterParameters, Soldier};
//! use dutyroster_solver::RosterSolver;
//!
//! let params = RosterParameters::new(
//!     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
//! )
//! .targets(2, 2)
//! .consecutive_limits(3, 3)
//! .min_base_block(2)
//! .min_required_per_day(1);
//!
//! let soldiers = vec![Soldier::new("s-001"), Soldier::new("s-002")];
//! let outcome = RosterSolver::new().solve(&params, &soldiers).unwrap();
//! assert!(outcome.is_solved());
//! ```

use std::time::{Duration, Instant};

use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::DomainId;
use pumpkin_solver::Solver;

use dutyroster_core::{
    Roster, RosterError, RosterParameters, Soldier, SolveOutcome, SolveStatus, SuspectedCause,
};

mod extract;
mod model;
mod resolve;
pub mod weights;

pub use resolve::{analyze_demand, effective_targets, EXCEPTIONAL_BASE_BONUS};

/// Default optimisation budget for small instances
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);

/// Instance size (soldiers × days) up to which the default budget applies
const SCALE_THRESHOLD: u64 = 2_000;

/// The rostering solver.
///
/// Stateless apart from its configuration; construct once and reuse, or
/// construct per call, as convenient.
#[derive(Clone, Debug, Default)]
pub struct RosterSolver {
    time_limit: Option<Duration>,
}

impl RosterSolver {
    /// Create a solver with the default time budget
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    /// Create a solver with an explicit wall-clock budget
    pub fn with_time_limit(limit: Duration) -> Self {
        Self { time_limit: Some(limit) }
    }

    /// Wall-clock budget for an instance of `cells = soldiers * days`.
    ///
    /// The default 60 s scales linearly once the instance outgrows the
    /// threshold size, keeping the budget proportional to the model.
    fn budget(&self, cells: u64) -> Duration {
        if let Some(limit) = self.time_limit {
            return limit;
        }
        if cells <= SCALE_THRESHOLD {
            DEFAULT_TIME_LIMIT
        } else {
            Duration::from_secs(DEFAULT_TIME_LIMIT.as_secs() * cells / SCALE_THRESHOLD)
        }
    }

    /// Produce a roster for the given parameters and population.
    ///
    /// Returns `Err` only for inputs the model cannot represent (empty
    /// population, inverted range, non-positive limits, duplicate ids) or
    /// for an engine defect. Overconstrained but representable inputs
    /// come back as a roster with penalized slack, or in the extreme as
    /// an `Infeasible`/`Unknown` outcome carrying a demand analysis.
    pub fn solve(
        &self,
        params: &RosterParameters,
        soldiers: &[Soldier],
    ) -> Result<SolveOutcome, RosterError> {
        let started = Instant::now();
        let inputs = resolve::resolve(params, soldiers)?;
        let built = model::build(&inputs)?;
        let budget = self.budget(inputs.soldiers.len() as u64 * inputs.n_days as u64);

        let model::RosterModel { mut solver, x, objective } = built;
        let mut brancher = solver.default_brancher();
        let mut termination = TimeBudget::starting_now(budget);

        fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}
        let result = solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(OptimisationDirection::Minimise, objective, noop_callback),
        );

        let outcome = match result {
            OptimisationResult::Optimal(solution) => {
                solved(&inputs, &x, objective, &solution, SolveStatus::Optimal)
            }
            OptimisationResult::Satisfiable(solution) => {
                solved(&inputs, &x, objective, &solution, SolveStatus::Feasible)
            }
            OptimisationResult::Unsatisfiable => unsolved(&inputs, SolveStatus::Infeasible),
            OptimisationResult::Unknown => unsolved(&inputs, SolveStatus::Unknown),
        };

        tracing::info!(
            status = outcome.status.name(),
            objective = outcome.objective,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "roster solve finished"
        );
        Ok(outcome)
    }
}

/// Solve with the default configuration.
pub fn solve(
    params: &RosterParameters,
    soldiers: &[Soldier],
) -> Result<SolveOutcome, RosterError> {
    RosterSolver::new().solve(params, soldiers)
}

/// Evaluate the penalty objective over an existing roster.
///
/// Useful for auditing a stored assignment against the same pricing the
/// solver used. The roster must cover exactly this population and
/// horizon.
pub fn score_roster(
    params: &RosterParameters,
    soldiers: &[Soldier],
    roster: &Roster,
) -> Result<i64, RosterError> {
    let inputs = resolve::resolve(params, soldiers)?;
    let matrix = matrix_from_roster(&inputs, roster)?;
    Ok(extract::evaluate_penalty(&inputs, &matrix))
}

fn matrix_from_roster(
    inputs: &resolve::ResolvedInputs,
    roster: &Roster,
) -> Result<Vec<Vec<bool>>, RosterError> {
    inputs
        .soldiers
        .iter()
        .map(|soldier| {
            let days = roster.schedule_for(&soldier.name).ok_or_else(|| {
                RosterError::RosterMismatch(format!("no schedule for soldier {}", soldier.name))
            })?;
            if days.len() != inputs.n_days {
                return Err(RosterError::RosterMismatch(format!(
                    "schedule for {} covers {} days, horizon has {}",
                    soldier.name,
                    days.len(),
                    inputs.n_days
                )));
            }
            Ok(days
                .iter()
                .map(|day| day.status == dutyroster_core::DayStatus::Base)
                .collect())
        })
        .collect()
}

fn solved<S: ProblemSolution>(
    inputs: &resolve::ResolvedInputs,
    x: &[Vec<DomainId>],
    objective: DomainId,
    solution: &S,
    status: SolveStatus,
) -> SolveOutcome {
    let matrix: Vec<Vec<bool>> = x
        .iter()
        .map(|row| row.iter().map(|&var| solution.get_integer_value(var) != 0).collect())
        .collect();
    let objective = i64::from(solution.get_integer_value(objective));
    let roster = extract::build_roster(inputs, &matrix);
    SolveOutcome { status, objective: Some(objective), roster: Some(roster), demand: None }
}

fn unsolved(inputs: &resolve::ResolvedInputs, status: SolveStatus) -> SolveOutcome {
    let mut analysis = resolve::analyze_resolved(inputs);
    if status == SolveStatus::Unknown && analysis.suspected.is_none() {
        analysis.suspected = Some(SuspectedCause::TimeLimitExhausted);
    }
    SolveOutcome { status, objective: None, roster: None, demand: Some(analysis) }
}
