//! Objective functions evaluated by the improvement commands.
//!
//! An objective reports its current value from scratch and the change a
//! staged move would cause. Deltas follow the sign convention
//! `old - new`, so a positive delta is an improvement.

pub mod displacement;
pub mod hpwl;

pub use displacement::DisplacementObjective;
pub use hpwl::HpwlObjective;

use crate::moves::MoveRecord;
use dpo_network::Network;

/// A cost the optimizer tries to reduce.
pub trait DetailedObjective {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Current value, computed from scratch.
    fn curr(&mut self, network: &Network) -> f64;

    /// `old - new` for the nodes in `records` moving to their new state.
    fn delta(&mut self, network: &Network, records: &[MoveRecord]) -> f64;
}

/// Builds an objective from its command-line name.
pub fn objective_by_name(
    name: &str,
    skip_nets_larger_than: usize,
) -> Option<Box<dyn DetailedObjective>> {
    match name {
        "hpwl" => Some(Box::new(HpwlObjective::new(skip_nets_larger_than))),
        "disp" => Some(Box::new(DisplacementObjective::new())),
        _ => None,
    }
}
