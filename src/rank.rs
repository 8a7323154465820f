//! Layered (Sugiyama-style) ranking of diagram entities.
//!
//! Phases, run strictly in order on the same [`Graph`](crate::graph::Graph):
//!   1. Cycle elimination (DFS back-edge reversal)
//!   2. Longest-path layer assignment
//!   3. Barycenter crossing reduction

pub mod cycles;
pub mod engine;
pub mod levels;
pub mod ordering;
pub mod types;

pub use engine::RankEngine;
pub use types::{EdgeResult, Placement, Ranking};
