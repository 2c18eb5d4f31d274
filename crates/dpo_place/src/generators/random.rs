//! Random window moves.

use super::{locate, stage_move_or_swap, DetailedGenerator, GeneratorStats};
use crate::context::PlacementContext;
use dpo_network::NodeId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Destinations tried per call.
pub(crate) const TRIES: usize = 5;

/// Proposes a single-cell move to a random spot within a window of
/// +/-10 sites and +/-10 rows around the cell's current position.
#[derive(Debug, Clone, Default)]
pub struct RandomGenerator {
    stats: GeneratorStats,
}

impl RandomGenerator {
    /// Half-width of the window in sites.
    pub const SITES: i64 = 10;
    /// Half-height of the window in rows.
    pub const ROWS: i64 = 10;

    /// Creates the generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DetailedGenerator for RandomGenerator {
    fn name(&self) -> &'static str {
        "rng"
    }

    fn generate(&mut self, ctx: &mut PlacementContext, candidates: &[NodeId]) -> bool {
        self.stats.attempts += 1;
        let Some(&node) = candidates.choose(&mut ctx.rng) else {
            return false;
        };
        if !ctx.is_single_height(node) {
            return false;
        }
        for _ in 0..TRIES {
            let n = ctx.network.node(node);
            let (cx, cy) = (n.left, n.bottom);
            let (x, y) = random_point(ctx, cx, cy, Self::SITES, Self::ROWS);
            let Some((bottom, seg)) = locate(ctx, node, x, y) else {
                continue;
            };
            if stage_move_or_swap(ctx, &mut self.stats, node, x, bottom, seg, false) {
                return true;
            }
        }
        false
    }

    fn stats(&self) -> GeneratorStats {
        self.stats
    }
}

/// A point drawn uniformly on the site/row grid around `(cx, cy)`, clamped
/// to the die.
pub(crate) fn random_point(
    ctx: &mut PlacementContext,
    cx: i64,
    cy: i64,
    sites: i64,
    rows: i64,
) -> (i64, i64) {
    let pitch = ctx.arch.site_width().max(1);
    let height = ctx.arch.row_height().max(1);
    let dx = ctx.rng.gen_range(-sites..=sites) * pitch;
    let dy = ctx.rng.gen_range(-rows..=rows) * height;
    let die = ctx.arch.die;
    (
        (cx + dx).clamp(die.xmin, die.xmax),
        (cy + dy).clamp(die.ymin, die.ymax),
    )
}
