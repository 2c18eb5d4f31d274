//! The `orient` command: row orientation normalization and mirroring.

use super::{CommandArgs, DetailedCommand, PassSummary};
use crate::context::PlacementContext;
use crate::log;
use crate::moves::MoveRecord;
use crate::objective::{DetailedObjective, HpwlObjective};
use dpo_common::DpoResult;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{total_hpwl, NodeId};

/// `orient [-f]`.
///
/// Every movable cell placed in a row takes the orientation that row
/// requires. Without `-f`, single-height cells are then mirrored left to
/// right wherever that strictly shortens their nets.
#[derive(Debug, Default)]
pub struct OrientCommand;

impl OrientCommand {
    /// Creates the command.
    pub fn new() -> Self {
        Self
    }

    /// Normalizes orientations; returns the number of cells changed.
    pub fn normalize(ctx: &mut PlacementContext) -> usize {
        let mut changed = 0;
        for i in 0..ctx.network.node_count() {
            let id = NodeId::from_raw(i as u32);
            let node = ctx.network.node(id);
            if !node.is_movable() {
                continue;
            }
            let Some(&seg) = ctx.segments().segments_of(id).first() else {
                continue;
            };
            let row = ctx.segments().segment(seg).row;
            let Some(row_orient) = ctx.arch.rows.get(row).map(|r| r.orient) else {
                continue;
            };
            let want = node.orient.for_row(row_orient);
            if want != node.orient {
                ctx.set_orientation(id, want);
                changed += 1;
            }
        }
        changed
    }

    /// Mirrors single-height cells that gain from it; returns the count.
    fn mirror(ctx: &mut PlacementContext) -> usize {
        let mut objective = HpwlObjective::new(ctx.params().skip_nets_larger_than);
        let mut flipped = 0;
        let cells = ctx.single_height_cells().to_vec();
        for id in cells {
            let Some(&seg) = ctx.segments().segments_of(id).first() else {
                continue;
            };
            let node = ctx.network.node(id);
            let rec = MoveRecord {
                node: id,
                old_left: node.left,
                old_bottom: node.bottom,
                old_orient: node.orient,
                old_seg: seg,
                new_left: node.left,
                new_bottom: node.bottom,
                new_orient: node.orient.flip_horizontal(),
                new_seg: seg,
            };
            if objective.delta(&ctx.network, &[rec]) > 0.0 {
                ctx.set_orientation(id, rec.new_orient);
                flipped += 1;
            }
        }
        flipped
    }
}

impl DetailedCommand for OrientCommand {
    fn name(&self) -> &'static str {
        "orient"
    }

    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary> {
        let initial = total_hpwl(&ctx.network) as f64;
        let changed = Self::normalize(ctx);
        sink.emit(Diagnostic::info(
            log::code(log::ORIENT),
            format!("Changed orientation of {changed} cells to match their rows"),
        ));
        if !args.has("-f") {
            let flipped = Self::mirror(ctx);
            sink.emit(Diagnostic::info(
                log::code(log::ORIENT),
                format!("Mirrored {flipped} cells"),
            ));
        }
        Ok(PassSummary {
            passes: 1,
            initial,
            final_cost: total_hpwl(&ctx.network) as f64,
        })
    }
}
