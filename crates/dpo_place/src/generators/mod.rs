//! Move generators.
//!
//! A generator picks a candidate cell, proposes a destination and asks the
//! legality manager to stage a move or swap. It never evaluates or commits
//! the move; the caller does that with an objective.

pub mod displacement;
pub mod global_swap;
pub mod random;
pub mod vertical_swap;

pub use displacement::DisplacementGenerator;
pub use global_swap::GlobalSwap;
pub use random::RandomGenerator;
pub use vertical_swap::VerticalSwap;

use crate::context::PlacementContext;
use crate::log;
use crate::segment::SegmentId;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::NodeId;
use serde::Serialize;

/// Counters every generator keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
    /// Calls to `generate`.
    pub attempts: u64,
    /// Single-cell moves staged.
    pub moves: u64,
    /// Swaps staged.
    pub swaps: u64,
}

/// A source of candidate moves.
pub trait DetailedGenerator {
    /// Name used on the command line and in logs.
    fn name(&self) -> &'static str;

    /// Prepares per-pass state.
    fn init(&mut self, _ctx: &PlacementContext) {}

    /// Picks a candidate and stages a move. Returns `true` if one was staged.
    fn generate(&mut self, ctx: &mut PlacementContext, candidates: &[NodeId]) -> bool;

    /// Cumulative counters.
    fn stats(&self) -> GeneratorStats;

    /// Logs the counters.
    fn report_stats(&self, sink: &DiagnosticSink) {
        let s = self.stats();
        sink.emit(Diagnostic::info(
            log::code(log::STATS),
            format!(
                "Generator {}, Cumulative attempts {}, swaps {}, moves {} since last reset.",
                self.name(),
                s.attempts,
                s.swaps,
                s.moves
            ),
        ));
    }
}

/// Builds a generator from its command-line name.
pub fn generator_by_name(name: &str) -> Option<Box<dyn DetailedGenerator>> {
    match name {
        "gs" => Some(Box::new(GlobalSwap::new())),
        "vs" => Some(Box::new(VerticalSwap::new())),
        "rng" => Some(Box::new(RandomGenerator::new())),
        "disp" => Some(Box::new(DisplacementGenerator::new())),
        _ => None,
    }
}

/// Row bottom and segment near `(x, y)` that `node` may legally occupy.
///
/// Uses the row closest to `y` and the first segment of that row whose span
/// contains `x`; the segment must belong to the node's region.
pub(crate) fn locate(
    ctx: &PlacementContext,
    node: NodeId,
    x: i64,
    y: i64,
) -> Option<(i64, SegmentId)> {
    let row = ctx.arch.find_closest_row(y)?;
    let seg = ctx.segments().find_in_row(row, x)?;
    (ctx.segments().segment(seg).region == ctx.network.node(node).region)
        .then(|| (ctx.arch.rows[row].bottom, seg))
}

/// Stages a move of `node` to `(x, y)` in `seg`, falling back to a swap
/// when `allow_swap` is set.
pub(crate) fn stage_move_or_swap(
    ctx: &mut PlacementContext,
    stats: &mut GeneratorStats,
    node: NodeId,
    x: i64,
    y: i64,
    seg: SegmentId,
    allow_swap: bool,
) -> bool {
    let Some(&cur_seg) = ctx.segments().segments_of(node).first() else {
        return false;
    };
    let n = ctx.network.node(node);
    let (cur_x, cur_y) = (n.left, n.bottom);
    if ctx.try_move(node, cur_x, cur_y, cur_seg, x, y, seg) {
        stats.moves += 1;
        return true;
    }
    if allow_swap && ctx.try_swap(node, cur_x, cur_y, cur_seg, x, y, seg) {
        stats.swaps += 1;
        return true;
    }
    false
}
