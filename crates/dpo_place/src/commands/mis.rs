//! The `mis` command: matching over independent sets of equal cells.
//!
//! Cells are coloured so that no two cells of a colour share a net. Around
//! each seed cell, up to [`MAX_PROBLEM_SIZE`] interchangeable cells of the
//! seed's colour are gathered from a coarse bucket grid; since they share no
//! nets, the cost of putting any of them at any of their current spots is
//! independent of the others, and the best assignment is solved exactly.

use super::swap::improvement_percent;
use super::{run_passes_with, CommandArgs, DetailedCommand, PassSummary, StopRule};
use crate::assignment::solve_assignment;
use crate::context::PlacementContext;
use crate::log;
use crate::moves::MoveRecord;
use crate::objective::{DetailedObjective, DisplacementObjective, HpwlObjective};
use crate::segment::SegmentId;
use dpo_common::DpoResult;
use dpo_diagnostics::{Diagnostic, DiagnosticSink};
use dpo_network::{total_hpwl, EdgeId, NodeId};
use petgraph::graphmap::UnGraphMap;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// Most cells in one matching problem.
pub const MAX_PROBLEM_SIZE: usize = 50;

/// Times a cell may take part in a problem before it stops seeding new ones.
pub const MAX_TIMES_USED: u32 = 3;

/// Cost of an assignment that breaks a displacement limit.
const INFEASIBLE: i64 = 1 << 50;

/// `mis [-p passes] [-t tol] [-d]`; `-d` minimizes displacement instead of
/// HPWL and drops the colour constraint.
#[derive(Debug, Default)]
pub struct MisCommand;

impl MisCommand {
    /// Creates the command.
    pub fn new() -> Self {
        Self
    }
}

impl DetailedCommand for MisCommand {
    fn name(&self) -> &'static str {
        "mis"
    }

    fn run(
        &mut self,
        ctx: &mut PlacementContext,
        args: &CommandArgs<'_>,
        sink: &DiagnosticSink,
    ) -> DpoResult<PassSummary> {
        let passes = args.passes(1);
        let tol = args.tolerance(0.01);
        let use_disp = args.has("-d");
        let what = if use_disp { "disp" } else { "hpwl" };
        sink.emit(Diagnostic::info(
            log::code(log::INFO),
            format!(
                "Set matching objective is {}",
                if use_disp { "displacement" } else { "wire length" }
            ),
        ));

        ctx.resort_segments();
        let initial = current_cost(ctx, use_disp);
        let summary = run_passes_with(StopRule::AtOrBelow, passes, tol, initial, |p, cost| {
            sink.emit(Diagnostic::info(
                log::code(log::PASS),
                format!("Pass {p} of matching; {what} is {cost}"),
            ));
            let moved = place(ctx, use_disp)?;
            sink.emit(Diagnostic::debug(
                log::code(log::PASS),
                format!("Matching moved {moved} cells"),
            ));
            Ok(current_cost(ctx, use_disp))
        })?;
        ctx.resort_segments();

        sink.emit(Diagnostic::info(
            log::code(log::INFO),
            format!(
                "End of matching; {what} is {}, total imp is {:.2}%",
                summary.final_cost,
                improvement_percent(summary.initial, summary.final_cost)
            ),
        ));
        Ok(summary)
    }
}

fn current_cost(ctx: &PlacementContext, use_disp: bool) -> f64 {
    if use_disp {
        DisplacementObjective::new().curr(&ctx.network)
    } else {
        total_hpwl(&ctx.network) as f64
    }
}

/// One pass over shuffled seeds. Returns the number of cells moved.
fn place(ctx: &mut PlacementContext, use_disp: bool) -> DpoResult<usize> {
    let mut candidates = ctx.single_height_cells().to_vec();
    if candidates.len() < 2 {
        return Ok(0);
    }
    let colors = (!use_disp).then(|| color_cells(ctx, &candidates));
    let grid = BucketGrid::build(ctx, &candidates);
    let mut times_used = vec![0u32; ctx.network.node_count()];
    let objective = HpwlObjective::new(ctx.params().skip_nets_larger_than);
    let mut moved = 0;

    candidates.shuffle(&mut ctx.rng);
    for &seed in &candidates {
        if times_used[seed.index()] >= MAX_TIMES_USED {
            continue;
        }
        let group = grid.gather(ctx, seed, colors.as_deref());
        moved += solve_match(ctx, &objective, &group, use_disp)?;
        for n in &group {
            times_used[n.index()] += 1;
        }
    }
    Ok(moved)
}

/// Greedy colouring, highest degree first, of the graph joining every two
/// candidates that share a net of `2..=skip` pins. Indexed by node;
/// non-candidates get `usize::MAX`.
pub fn color_cells(ctx: &PlacementContext, candidates: &[NodeId]) -> Vec<usize> {
    let network = &ctx.network;
    let skip = ctx.params().skip_nets_larger_than;
    let mut is_candidate = vec![false; network.node_count()];
    let mut graph: UnGraphMap<u32, ()> = UnGraphMap::new();
    for &c in candidates {
        is_candidate[c.index()] = true;
        graph.add_node(c.as_raw());
    }

    let mut on_edge: Vec<u32> = Vec::new();
    for edge in &network.edges {
        if edge.pins.len() <= 1 || edge.pins.len() > skip {
            continue;
        }
        on_edge.clear();
        on_edge.extend(
            edge.pins
                .iter()
                .map(|&p| network.pin(p).node)
                .filter(|n| is_candidate[n.index()])
                .map(NodeId::as_raw),
        );
        for (i, &a) in on_edge.iter().enumerate() {
            for &b in &on_edge[i + 1..] {
                if a != b {
                    graph.add_edge(a, b, ());
                }
            }
        }
    }

    let mut order: Vec<u32> = graph.nodes().collect();
    order.sort_by_key(|&n| (std::cmp::Reverse(graph.neighbors(n).count()), n));
    let mut colors = vec![usize::MAX; network.node_count()];
    let mut taken: Vec<bool> = Vec::new();
    for n in order {
        taken.clear();
        for m in graph.neighbors(n) {
            let c = colors[m as usize];
            if c != usize::MAX {
                if c >= taken.len() {
                    taken.resize(c + 1, false);
                }
                taken[c] = true;
            }
        }
        colors[n as usize] = taken.iter().position(|t| !t).unwrap_or(taken.len());
    }
    colors
}

/// Coarse grid of buckets holding candidate cells by position.
struct BucketGrid {
    xmin: i64,
    ymin: i64,
    step_x: f64,
    step_y: f64,
    dim_w: usize,
    dim_h: usize,
    buckets: Vec<Vec<NodeId>>,
    bucket_of: Vec<Option<usize>>,
}

impl BucketGrid {
    /// Buckets sized to hold a couple of hundred average cells.
    fn build(ctx: &PlacementContext, candidates: &[NodeId]) -> Self {
        let die = ctx.arch.die;
        let n = candidates.len().max(1) as f64;
        let (sum_w, sum_h) = candidates.iter().fold((0i64, 0i64), |(w, h), &c| {
            let node = ctx.network.node(c);
            (w + node.width, h + node.height)
        });
        let step_x = (sum_w as f64 / n * 200f64.sqrt()).max(1.0);
        let step_y = (sum_h as f64 / n * 200f64.sqrt()).max(1.0);
        let dim_w = ((die.width() as f64 / step_x).ceil() as usize).max(1);
        let dim_h = ((die.height() as f64 / step_y).ceil() as usize).max(1);

        let mut grid = Self {
            xmin: die.xmin,
            ymin: die.ymin,
            step_x,
            step_y,
            dim_w,
            dim_h,
            buckets: vec![Vec::new(); dim_w * dim_h],
            bucket_of: vec![None; ctx.network.node_count()],
        };
        for &c in candidates {
            let node = ctx.network.node(c);
            let b = grid.index(node.left, node.bottom);
            grid.buckets[b].push(c);
            grid.bucket_of[c.index()] = Some(b);
        }
        grid
    }

    fn index(&self, x: i64, y: i64) -> usize {
        let i = (((x - self.xmin) as f64 / self.step_x) as i64).clamp(0, self.dim_w as i64 - 1);
        let j = (((y - self.ymin) as f64 / self.step_y) as i64).clamp(0, self.dim_h as i64 - 1);
        j as usize * self.dim_w + i as usize
    }

    /// Breadth-first search over buckets from the seed's bucket, collecting
    /// cells interchangeable with the seed.
    fn gather(
        &self,
        ctx: &PlacementContext,
        seed: NodeId,
        colors: Option<&[usize]>,
    ) -> Vec<NodeId> {
        let mut group = vec![seed];
        let Some(start) = self.bucket_of[seed.index()] else {
            return group;
        };
        let s = ctx.network.node(seed);
        let mut visited = vec![false; self.buckets.len()];
        let mut queue = VecDeque::from([start]);
        while let Some(b) = queue.pop_front() {
            if std::mem::replace(&mut visited[b], true) {
                continue;
            }
            for &c in &self.buckets[b] {
                let n = ctx.network.node(c);
                let compatible = c != seed
                    && colors.map_or(true, |col| col[c.index()] == col[seed.index()])
                    && n.width == s.width
                    && n.height == s.height
                    && n.region == s.region
                    && n.left_edge_type == s.left_edge_type
                    && n.right_edge_type == s.right_edge_type
                    && ctx.is_single_height(c);
                if compatible {
                    group.push(c);
                }
            }
            if group.len() >= MAX_PROBLEM_SIZE {
                group.truncate(MAX_PROBLEM_SIZE);
                break;
            }
            let (i, j) = (b % self.dim_w, b / self.dim_w);
            if i > 0 {
                queue.push_back(b - 1);
            }
            if i + 1 < self.dim_w {
                queue.push_back(b + 1);
            }
            if j > 0 {
                queue.push_back(b - self.dim_w);
            }
            if j + 1 < self.dim_h {
                queue.push_back(b + self.dim_w);
            }
        }
        group
    }
}

/// Solves one matching problem and relocates the cells. Returns how many
/// cells moved.
fn solve_match(
    ctx: &mut PlacementContext,
    objective: &HpwlObjective,
    group: &[NodeId],
    use_disp: bool,
) -> DpoResult<usize> {
    if group.len() < 2 {
        return Ok(0);
    }
    let spots: Vec<(i64, i64, SegmentId)> = group
        .iter()
        .filter_map(|&c| {
            let n = ctx.network.node(c);
            let seg = *ctx.segments().segments_of(c).first()?;
            Some((n.left, n.bottom, seg))
        })
        .collect();
    if spots.len() != group.len() {
        return Ok(0);
    }

    let cost: Vec<Vec<i64>> = group
        .iter()
        .map(|&c| {
            spots
                .iter()
                .map(|&(x, y, seg)| spot_cost(ctx, objective, c, x, y, seg, use_disp))
                .collect()
        })
        .collect();
    let assign = solve_assignment(&cost);
    if assign.iter().enumerate().any(|(i, &j)| cost[i][j] >= INFEASIBLE) {
        return Ok(0);
    }

    let records: Vec<MoveRecord> = assign
        .iter()
        .enumerate()
        .filter(|&(i, &j)| i != j)
        .filter_map(|(i, &j)| ctx.make_record(group[i], spots[j].0, spots[j].2))
        .collect();
    if records.is_empty() {
        return Ok(0);
    }
    ctx.relocate_batch(&records)?;
    Ok(records.len())
}

/// Cost of `node` sitting at `(x, y)` in `seg`, other cells where they are.
fn spot_cost(
    ctx: &PlacementContext,
    objective: &HpwlObjective,
    node: NodeId,
    x: i64,
    y: i64,
    seg: SegmentId,
    use_disp: bool,
) -> i64 {
    if !ctx.within_displacement(node, x, y) {
        return INFEASIBLE;
    }
    let n = ctx.network.node(node);
    if use_disp {
        return (x - n.orig_left).abs() + (y - n.orig_bottom).abs();
    }
    let Some(rec) = ctx.make_record(node, x, seg) else {
        return INFEASIBLE;
    };
    let mut edges: Vec<EdgeId> = n.pins.iter().map(|&p| ctx.network.pin(p).edge).collect();
    edges.sort_unstable();
    edges.dedup();
    edges
        .into_iter()
        .filter(|&e| objective.counts(&ctx.network, e))
        .map(|e| HpwlObjective::edge_hpwl_with(&ctx.network, e, &[rec]))
        .sum()
}
