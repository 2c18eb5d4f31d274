//! Moves that pull cells back toward their original position.

use super::random::{random_point, TRIES};
use super::{locate, stage_move_or_swap, DetailedGenerator, GeneratorStats};
use crate::context::PlacementContext;
use dpo_network::NodeId;
use rand::seq::SliceRandom;

/// Proposes a move or swap to a random spot within +/-5 sites and +/-5
/// rows of the cell's original position.
#[derive(Debug, Clone, Default)]
pub struct DisplacementGenerator {
    stats: GeneratorStats,
}

impl DisplacementGenerator {
    /// Half-width of the window in sites.
    pub const SITES: i64 = 5;
    /// Half-height of the window in rows.
    pub const ROWS: i64 = 5;

    /// Creates the generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DetailedGenerator for DisplacementGenerator {
    fn name(&self) -> &'static str {
        "disp"
    }

    fn generate(&mut self, ctx: &mut PlacementContext, candidates: &[NodeId]) -> bool {
        self.stats.attempts += 1;
        let Some(&node) = candidates.choose(&mut ctx.rng) else {
            return false;
        };
        if !ctx.is_single_height(node) {
            return false;
        }
        let n = ctx.network.node(node);
        let (ox, oy) = (n.orig_left, n.orig_bottom);
        for _ in 0..TRIES {
            let (x, y) = random_point(ctx, ox, oy, Self::SITES, Self::ROWS);
            let Some((bottom, seg)) = locate(ctx, node, x, y) else {
                continue;
            };
            if stage_move_or_swap(ctx, &mut self.stats, node, x, bottom, seg, true) {
                return true;
            }
        }
        false
    }

    fn stats(&self) -> GeneratorStats {
        self.stats
    }
}
