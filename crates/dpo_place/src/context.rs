//! The placement context shared by every command and generator.

use crate::log;
use crate::moves::MoveList;
use crate::segment::SegmentTable;
use dpo_arch::Architecture;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{Network, NodeId};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Optimizer limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementParams {
    /// Seed for the shared RNG.
    pub seed: u64,
    /// Edges with more pins than this are ignored by incremental evaluation
    /// and by the optimal-region computation.
    pub skip_nets_larger_than: usize,
    /// Horizontal displacement limit from the original position, in sites.
    pub max_displacement_sites: i64,
    /// Vertical displacement limit from the original position, in rows.
    pub max_displacement_rows: i64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            seed: 10,
            skip_nets_larger_than: 100,
            max_displacement_sites: 500,
            max_displacement_rows: 100,
        }
    }
}

/// Everything one optimization run mutates: the network, the segment
/// occupancy, the staged move and the RNG.
///
/// Nothing is global, so independent contexts can run side by side. Node
/// coordinates and segment lists change only through the manager methods
/// (`accept_move`, `relocate_batch`, `set_orientation`), which keep the two
/// consistent.
pub struct PlacementContext {
    /// The immutable architecture.
    pub arch: Architecture,
    /// The netlist being optimized.
    pub network: Network,
    /// The single RNG shared by all commands.
    pub rng: StdRng,
    pub(crate) segments: SegmentTable,
    pub(crate) moves: MoveList,
    pub(crate) params: PlacementParams,
    pub(crate) max_disp_x: i64,
    pub(crate) max_disp_y: i64,
    single_height: Vec<NodeId>,
    multi_height: Vec<NodeId>,
}

impl PlacementContext {
    /// Records original positions, builds segments and assigns cells to them.
    pub fn new(
        arch: Architecture,
        mut network: Network,
        params: PlacementParams,
        sink: &DiagnosticSink,
    ) -> Self {
        network.record_original_positions();
        let mut segments = SegmentTable::build(&arch, &network);
        let (single_height, multi_height) = segments.assign(&arch, &network, sink);
        sink.emit(Diagnostic::info(
            log::code(log::SEGMENTS),
            format!(
                "Built {} segments over {} rows; assigned {} single and {} multi-height cells",
                segments.len(),
                arch.rows.len(),
                single_height.len(),
                multi_height.len()
            ),
        ));
        let max_disp_x = params.max_displacement_sites.saturating_mul(arch.site_width());
        let max_disp_y = params.max_displacement_rows.saturating_mul(arch.row_height());
        Self {
            rng: StdRng::seed_from_u64(params.seed),
            arch,
            network,
            segments,
            moves: MoveList::new(),
            params,
            max_disp_x,
            max_disp_y,
            single_height,
            multi_height,
        }
    }

    /// Gives back the architecture and the optimized network.
    pub fn into_parts(self) -> (Architecture, Network) {
        (self.arch, self.network)
    }

    /// The segment table.
    pub fn segments(&self) -> &SegmentTable {
        &self.segments
    }

    /// The currently staged move.
    pub fn moves(&self) -> &MoveList {
        &self.moves
    }

    /// The optimizer limits.
    pub fn params(&self) -> &PlacementParams {
        &self.params
    }

    /// Single-height cells that sit in a segment: the move candidates.
    pub fn single_height_cells(&self) -> &[NodeId] {
        &self.single_height
    }

    /// Multi-height cells that sit in segments; these never move.
    pub fn multi_height_cells(&self) -> &[NodeId] {
        &self.multi_height
    }

    /// Returns `true` if `node` is a movable single-height cell in one segment.
    pub fn is_single_height(&self, node: NodeId) -> bool {
        let n = self.network.node(node);
        n.is_movable()
            && n.height <= self.arch.row_height()
            && self.segments.segments_of(node).len() == 1
    }

    /// Horizontal and vertical displacement limits in database units.
    pub fn max_displacement(&self) -> (i64, i64) {
        (self.max_disp_x, self.max_disp_y)
    }
}
