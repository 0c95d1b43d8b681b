//! Penalty weights
//!
//! Every requirement except personal unavailability is soft, and the
//! objective decides which violations an imperfect roster prefers. The
//! weights are powers of ten so that, at realistic violation counts, each
//! tier dominates everything below it:
//!
//! 1. one-day blocks are operationally useless and get crushed first;
//! 2. an over-long home stretch (a forgotten soldier) outranks an
//!    over-long base stretch (an overworked one);
//! 3. coverage shortfall outranks an individual target miss;
//! 4. short blocks and windowed run violations carry the smallest cost.

/// Penalty per single-day block, base or home
pub const W_ONE_DAY: i32 = 1_000_000;

/// Penalty per home block exceeding the consecutive-home limit
pub const W_LONG_HOME: i32 = 100_000;

/// Penalty per base block exceeding the consecutive-base limit
pub const W_LONG_BASE: i32 = 10_000;

/// Penalty per missing soldier-day of coverage
pub const W_SHORTAGE: i32 = 1_000;

/// Penalty per day of deviation from a soldier's base-day target
pub const W_TARGET: i32 = 100;

/// Penalty per weekday a weekend-only soldier spends on base
pub const W_WEEKEND: i32 = 100;

/// Penalty per base block shorter than the minimum block length
pub const W_SHORT_BLOCK: i32 = 10;

/// Penalty per over-full window of consecutive base or home days
pub const W_MAX_RUN: i32 = 10;
