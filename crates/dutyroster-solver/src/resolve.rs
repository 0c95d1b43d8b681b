//! Parameter resolution
//!
//! Normalizes raw run inputs into the solver's internal form: integer day
//! indices, weekday classification, and per-soldier effective targets.
//! Validation here is deliberately thin. Only inputs the model cannot
//! represent at all are rejected; everything else is passed through and
//! absorbed as penalized slack downstream.

use std::collections::HashSet;

use chrono::NaiveDate;
use dutyroster_core::{
    DayKind, DemandAnalysis, RosterError, RosterParameters, Soldier, SoldierId, SuspectedCause,
};

/// Base-day bonus granted to exceptional-output soldiers
pub const EXCEPTIONAL_BASE_BONUS: u32 = 2;

/// A soldier with internalized unavailability and effective targets
#[derive(Clone, Debug)]
pub struct ResolvedSoldier {
    pub id: SoldierId,
    pub name: String,
    /// `unavailable[d]` is true when the soldier must be Home on day `d`
    pub unavailable: Vec<bool>,
    pub weekend_only: bool,
    /// Effective base-day target after flag derivation
    pub base_target: u32,
}

impl ResolvedSoldier {
    /// Number of unavailable days inside the horizon
    pub fn unavailable_count(&self) -> usize {
        self.unavailable.iter().filter(|&&u| u).count()
    }
}

/// Normalized model inputs for one solve
#[derive(Clone, Debug)]
pub struct ResolvedInputs {
    pub params: RosterParameters,
    pub n_days: usize,
    /// Horizon dates, indexed by day
    pub dates: Vec<NaiveDate>,
    /// Weekday classification, indexed by day
    pub kinds: Vec<DayKind>,
    pub soldiers: Vec<ResolvedSoldier>,
}

impl ResolvedInputs {
    /// Number of weekend days (Fri/Sat/Sun) in the horizon
    pub fn weekend_day_count(&self) -> usize {
        self.kinds.iter().filter(|k| k.is_weekend()).count()
    }
}

/// Derive one soldier's effective `(base, home)` targets from the defaults
/// and the soldier's flags.
///
/// Exceptional output raises the base target by [`EXCEPTIONAL_BASE_BONUS`]
/// (clamped to the horizon) and lowers the home target symmetrically,
/// floored at zero. Weekend-only caps the base target at the number of
/// weekend days actually present.
pub fn effective_targets(
    params: &RosterParameters,
    soldier: &Soldier,
    n_days: u32,
    weekend_days: u32,
) -> (u32, u32) {
    let mut base = params.default_base_days_target;
    let mut home = params.default_home_days_target;

    if soldier.exceptional_output {
        // Clamped to the horizon, but never below an already-oversized target
        let raised = base.saturating_add(EXCEPTIONAL_BASE_BONUS).min(n_days).max(base);
        let granted = raised - base;
        base = raised;
        home = home.saturating_sub(granted);
    }

    if soldier.weekend_only {
        base = base.min(weekend_days);
    }

    (base, home)
}

/// Validate and internalize the inputs for one solve.
pub fn resolve(
    params: &RosterParameters,
    soldiers: &[Soldier],
) -> Result<ResolvedInputs, RosterError> {
    if soldiers.is_empty() {
        return Err(RosterError::EmptyPopulation);
    }
    if params.n_days() <= 0 {
        return Err(RosterError::DegenerateHorizon {
            start: params.start_date,
            end: params.end_date,
        });
    }
    if params.max_consecutive_base_days == 0 {
        return Err(RosterError::InvalidParameter {
            name: "max_consecutive_base_days",
            value: 0,
        });
    }
    if params.max_consecutive_home_days == 0 {
        return Err(RosterError::InvalidParameter {
            name: "max_consecutive_home_days",
            value: 0,
        });
    }
    if params.min_base_block_days == 0 {
        return Err(RosterError::InvalidParameter {
            name: "min_base_block_days",
            value: 0,
        });
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(soldiers.len());
    for soldier in soldiers {
        if !seen.insert(soldier.id.as_str()) {
            return Err(RosterError::DuplicateSoldier(soldier.id.clone()));
        }
    }

    let n_days = params.n_days() as usize;
    let dates = params.dates();
    let kinds: Vec<DayKind> = dates.iter().map(|&d| DayKind::from_date(d)).collect();
    let weekend_days = kinds.iter().filter(|k| k.is_weekend()).count() as u32;

    let soldiers = soldiers
        .iter()
        .map(|soldier| {
            let mut unavailable = vec![false; n_days];
            for &date in &soldier.unavailable_days {
                // Dates outside the horizon carry no information for this run
                if date >= params.start_date && date <= params.end_date {
                    let index = (date - params.start_date).num_days() as usize;
                    unavailable[index] = true;
                }
            }
            let (base_target, _home_target) =
                effective_targets(params, soldier, n_days as u32, weekend_days);
            ResolvedSoldier {
                id: soldier.id.clone(),
                name: soldier.name.clone(),
                unavailable,
                weekend_only: soldier.weekend_only,
                base_target,
            }
        })
        .collect();

    Ok(ResolvedInputs {
        params: params.clone(),
        n_days,
        dates,
        kinds,
        soldiers,
    })
}

/// Feasibility arithmetic for a run's inputs, without solving.
///
/// Compares the soldier-days the population can supply against the
/// coverage demand, and checks whether the base-day target can be cut
/// into blocks that fit the horizon once the forced home gaps between
/// them are counted.
pub fn analyze_demand(
    params: &RosterParameters,
    soldiers: &[Soldier],
) -> Result<DemandAnalysis, RosterError> {
    let inputs = resolve(params, soldiers)?;
    Ok(analyze_resolved(&inputs))
}

/// [`analyze_demand`] over already-resolved inputs.
pub(crate) fn analyze_resolved(inputs: &ResolvedInputs) -> DemandAnalysis {
    let params = &inputs.params;
    let n_soldiers = inputs.soldiers.len();
    let n_days = inputs.n_days as i64;

    let total_soldier_days = n_soldiers as i64 * n_days;
    let unavailable_soldier_days: i64 = inputs
        .soldiers
        .iter()
        .map(|s| s.unavailable_count() as i64)
        .sum();
    let available_soldier_days = total_soldier_days - unavailable_soldier_days;
    let required_soldier_days = i64::from(params.min_required_soldiers_per_day) * n_days;

    let base_target = i64::from(params.default_base_days_target);
    let max_base = i64::from(params.max_consecutive_base_days.max(1));
    let min_blocks = (base_target + max_base - 1) / max_base;
    let implied_gap_days = (min_blocks - 1).max(0) * i64::from(params.min_base_block_days);

    let suspected = if available_soldier_days < required_soldier_days {
        Some(SuspectedCause::SupplyShortfall)
    } else if base_target + implied_gap_days > n_days {
        Some(SuspectedCause::BlockArithmetic)
    } else {
        None
    };

    DemandAnalysis {
        n_soldiers,
        n_days,
        base_days_target: base_target,
        total_soldier_days,
        unavailable_soldier_days,
        available_soldier_days,
        required_soldier_days,
        min_blocks,
        implied_gap_days,
        suspected,
    }
}
