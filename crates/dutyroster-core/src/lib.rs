//! # dutyroster-core
//!
//! Core domain model for the dutyroster rostering engine.
//!
//! This crate provides:
//! - Input types: `Soldier`, `RosterParameters`
//! - Calendar classification: `DayKind`
//! - Result types: `Roster`, `SoldierTotals`, `SolveOutcome`, `DemandAnalysis`
//! - Core traits: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dutyroster_core::{RosterParameters, Soldier};
//!
//! let params = RosterParameters::new(
//!     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
//! )
//! .targets(7, 7)
//! .consecutive_limits(7, 7)
//! .min_base_block(3)
//! .min_required_per_day(3);
//!
//! let soldiers = vec![
//!     Soldier::new("s-001").name("Adar"),
//!     Soldier::new("s-002").name("Ben").weekend_only(),
//! ];
//! assert_eq!(params.n_days(), 14);
//! assert_eq!(soldiers.len(), 2);
//! ```

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a soldier
pub type SoldierId = String;

// ============================================================================
// Soldier
// ============================================================================

/// A member of the unit to be rostered.
///
/// Unavailable days are calendar dates; dates outside the scheduling
/// horizon are ignored by the solver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Soldier {
    /// Unique identifier
    pub id: SoldierId,
    /// Human-readable name (defaults to the id)
    pub name: String,
    /// Calendar dates on which this soldier cannot be on base
    pub unavailable_days: Vec<NaiveDate>,
    /// Demands more base time than the default target
    pub exceptional_output: bool,
    /// Should serve on weekend days (Fri/Sat/Sun) only
    pub weekend_only: bool,
}

impl Soldier {
    /// Create a new soldier with the given id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            unavailable_days: Vec::new(),
            exceptional_output: false,
            weekend_only: false,
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark a single date as unavailable
    pub fn unavailable_on(mut self, date: NaiveDate) -> Self {
        self.unavailable_days.push(date);
        self
    }

    /// Mark an inclusive date range as unavailable
    pub fn unavailable_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        let mut date = start;
        while date <= end {
            self.unavailable_days.push(date);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        self
    }

    /// Mark as an exceptional-output soldier (raised base-day target)
    pub fn exceptional_output(mut self) -> Self {
        self.exceptional_output = true;
        self
    }

    /// Mark as a weekend-only soldier
    pub fn weekend_only(mut self) -> Self {
        self.weekend_only = true;
        self
    }
}

// ============================================================================
// RosterParameters
// ============================================================================

/// Parameters for a single rostering run.
///
/// The date range is inclusive on both ends. Targets and limits describe
/// the desired shape of every soldier's duty pattern; apart from the date
/// range and positivity requirements they are preferences, not guarantees,
/// and the solver absorbs any tension between them as penalized slack.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterParameters {
    /// First day of the horizon
    pub start_date: NaiveDate,
    /// Last day of the horizon (inclusive)
    pub end_date: NaiveDate,
    /// Default number of base days per soldier
    pub default_base_days_target: u32,
    /// Default number of home days per soldier
    pub default_home_days_target: u32,
    /// Longest tolerated run of consecutive base days
    pub max_consecutive_base_days: u32,
    /// Longest tolerated run of consecutive home days
    pub max_consecutive_home_days: u32,
    /// Shortest well-formed base block (typically 2 or 3)
    pub min_base_block_days: u32,
    /// Daily coverage floor
    pub min_required_soldiers_per_day: u32,
}

impl RosterParameters {
    /// Create parameters for the given inclusive date range with
    /// conservative defaults for everything else.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            default_base_days_target: 0,
            default_home_days_target: 0,
            max_consecutive_base_days: 7,
            max_consecutive_home_days: 7,
            min_base_block_days: 2,
            min_required_soldiers_per_day: 0,
        }
    }

    /// Set the per-soldier base/home day targets
    pub fn targets(mut self, base: u32, home: u32) -> Self {
        self.default_base_days_target = base;
        self.default_home_days_target = home;
        self
    }

    /// Set the maximum consecutive base/home day limits
    pub fn consecutive_limits(mut self, base: u32, home: u32) -> Self {
        self.max_consecutive_base_days = base;
        self.max_consecutive_home_days = home;
        self
    }

    /// Set the minimum base-block length
    pub fn min_base_block(mut self, days: u32) -> Self {
        self.min_base_block_days = days;
        self
    }

    /// Set the daily coverage floor
    pub fn min_required_per_day(mut self, soldiers: u32) -> Self {
        self.min_required_soldiers_per_day = soldiers;
        self
    }

    /// Number of days in the horizon. Non-positive when the range is inverted.
    pub fn n_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// All dates in the horizon, in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut date = self.start_date;
        while date <= self.end_date {
            dates.push(date);
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        dates
    }
}

// ============================================================================
// Calendar Classification
// ============================================================================

/// Classification of a horizon day.
///
/// Friday, Saturday and Sunday form the weekend for weekend-only rostering;
/// the membership is fixed and not caller-configurable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayKind {
    Weekday,
    Friday,
    Saturday,
    Sunday,
}

impl DayKind {
    /// Classify a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Fri => DayKind::Friday,
            Weekday::Sat => DayKind::Saturday,
            Weekday::Sun => DayKind::Sunday,
            _ => DayKind::Weekday,
        }
    }

    /// Is this day part of the weekend (Fri/Sat/Sun)?
    pub fn is_weekend(self) -> bool {
        !matches!(self, DayKind::Weekday)
    }
}

/// Daily status of a soldier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    /// On duty at the facility
    Base,
    /// Off duty
    Home,
}

impl std::fmt::Display for DayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayStatus::Base => write!(f, "Base"),
            DayStatus::Home => write!(f, "Home"),
        }
    }
}

// ============================================================================
// Solve Status
// ============================================================================

/// Terminal status of a rostering run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven optimal within the time budget
    Optimal,
    /// Best assignment found when the time budget ran out
    Feasible,
    /// No assignment satisfies the hard constraints
    Infeasible,
    /// Time budget ran out before any assignment was found
    Unknown,
}

impl SolveStatus {
    /// Canonical uppercase name
    pub fn name(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }

    /// Did the run produce a usable roster?
    pub fn is_solved(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Roster (Result)
// ============================================================================

/// One day of one soldier's assignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Per-soldier totals over the horizon
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierTotals {
    /// Days assigned Base
    pub base_days: u32,
    /// Days assigned Home
    pub home_days: u32,
    /// Lengths of the base blocks, in day order
    pub blocks: Vec<u32>,
}

/// A fully assigned duty roster.
///
/// Schedules and totals are keyed by soldier name, daily headcounts by
/// date; all maps iterate in a stable order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Roster {
    /// Ordered day list per soldier
    pub schedules: BTreeMap<String, Vec<DayAssignment>>,
    /// Totals per soldier
    pub totals: BTreeMap<String, SoldierTotals>,
    /// Number of soldiers on base per day
    pub daily_soldiers_count: BTreeMap<NaiveDate, u32>,
}

impl Roster {
    /// Number of rostered soldiers
    pub fn n_soldiers(&self) -> usize {
        self.schedules.len()
    }

    /// Look up one soldier's ordered day list
    pub fn schedule_for(&self, name: &str) -> Option<&[DayAssignment]> {
        self.schedules.get(name).map(Vec::as_slice)
    }
}

/// Outcome of a rostering run: a status, and either a roster or a
/// demand analysis explaining why none was produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveOutcome {
    /// Terminal solver status
    pub status: SolveStatus,
    /// Achieved objective value, when a roster exists
    pub objective: Option<i64>,
    /// The assignment, on `Optimal` or `Feasible`
    pub roster: Option<Roster>,
    /// Diagnostic analysis, on `Infeasible` or `Unknown`
    pub demand: Option<DemandAnalysis>,
}

impl SolveOutcome {
    /// Did the run produce a usable roster?
    pub fn is_solved(&self) -> bool {
        self.status.is_solved()
    }
}

// ============================================================================
// Demand Analysis
// ============================================================================

/// Suspected reason a run produced no roster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspectedCause {
    /// Unavailability leaves fewer soldier-days than coverage demands
    SupplyShortfall,
    /// The block/gap arithmetic does not fit inside the horizon
    BlockArithmetic,
    /// The time budget ran out before a first assignment was found
    TimeLimitExhausted,
}

/// Feasibility arithmetic for a run's inputs.
///
/// Computed without solving: compares the soldier-days the population can
/// supply against what the coverage floor demands, and checks whether the
/// base-day target can be split into blocks that fit the horizon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandAnalysis {
    /// Population size
    pub n_soldiers: usize,
    /// Horizon length in days
    pub n_days: i64,
    /// Default base-day target the arithmetic was run against
    pub base_days_target: i64,
    /// `n_soldiers * n_days`
    pub total_soldier_days: i64,
    /// Soldier-days removed by unavailability (within the horizon)
    pub unavailable_soldier_days: i64,
    /// Supply after unavailability
    pub available_soldier_days: i64,
    /// `min_required_soldiers_per_day * n_days`
    pub required_soldier_days: i64,
    /// Fewest base blocks a soldier needs: `ceil(base_target / max_consecutive_base)`
    pub min_blocks: i64,
    /// Home days those blocks force between them: `(min_blocks - 1) * min_base_block`
    pub implied_gap_days: i64,
    /// Suspected cause of failure, when the arithmetic is tight
    pub suspected: Option<SuspectedCause>,
}

impl DemandAnalysis {
    /// Days one soldier's target consumes once the forced gaps are counted
    pub fn days_consumed(&self) -> i64 {
        self.base_days_target + self.implied_gap_days
    }

    /// Does the target's block/gap arithmetic fit inside the horizon?
    pub fn fits_horizon(&self) -> bool {
        self.days_consumed() <= self.n_days
    }

    /// Does supply cover the coverage demand?
    pub fn supply_sufficient(&self) -> bool {
        self.available_soldier_days >= self.required_soldier_days
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a solve outcome to the output format
    fn render(&self, outcome: &SolveOutcome) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rostering error
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("no soldiers supplied")]
    EmptyPopulation,

    #[error("degenerate horizon: {start} to {end}")]
    DegenerateHorizon { start: NaiveDate, end: NaiveDate },

    #[error("parameter {name} must be positive, got {value}")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("duplicate soldier id: {0}")]
    DuplicateSoldier(SoldierId),

    #[error("roster does not match the supplied inputs: {0}")]
    RosterMismatch(String),

    #[error("constraint engine rejected the model: {0}")]
    Engine(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
