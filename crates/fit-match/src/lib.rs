//! Best-fit search over a grid of candidates and transformations.
//!
//! [`find_best_match`] is the core operation: given candidate values, named
//! transformations and a target, it returns the (candidate, transformation)
//! pair whose transformed value lies closest to the target, or `None` when
//! nothing plausible exists. Everything else in this crate is built on the
//! same pair scan:
//!
//! - [`find_best_matches`] runs the search independently per target.
//! - [`grid`] lists every pair, ranks pairs for one target, and looks up the
//!   target nearest to an arbitrary value.
//! - [`MatchReport`] summarises a run.

pub mod engine;
pub mod grid;
pub mod report;

pub use engine::{
    MatchEngine, find_best_match, find_best_match_with, find_best_matches,
    find_best_matches_with,
};
pub use grid::{
    GridEntry, RankedPair, ToleranceHit, evaluate_grid, nearest_target, rank_for_target,
    within_tolerance,
};
pub use report::{MatchOutcome, MatchReport};
