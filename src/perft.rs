use std::fmt::Display;
use std::time::{Duration, Instant};

use tabled::{Table, Tabled};
use tracing::debug;

use crate::move_gen::gen_moves;
use crate::position::{Move, Position};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub tot: u64,
    pub captures: u64,
    pub multi_captures: u64,
    pub promotions: u64,
    pub no_moves: u64,
}

impl PerftDepthResult {
    pub fn new(tot: u64, captures: u64, multi_captures: u64, promotions: u64, no_moves: u64) -> Self {
        PerftDepthResult {
            tot,
            captures,
            multi_captures,
            promotions,
            no_moves,
        }
    }
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

/// Counts leaf nodes `depth` plies down, split by root move.
pub fn perft(position: &Position, depth: usize) -> (Vec<(Move, u64)>, u64) {
    if depth == 0 {
        return (Vec::new(), 1);
    }

    let move_counts: Vec<(Move, u64)> = gen_moves(position)
        .into_iter()
        .map(|mve| {
            let next = position.apply_unchecked(&mve);
            let nodes = count_leaves(&next, depth - 1);
            (mve, nodes)
        })
        .collect();
    let tot = move_counts.iter().map(|(_, nodes)| nodes).sum();

    (move_counts, tot)
}

fn count_leaves(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = gen_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mve| count_leaves(&position.apply_unchecked(mve), depth - 1))
        .sum()
}

/// Walks the move tree to `depth`, gathering per-ply statistics.
pub fn perft_full(position: &Position, depth: usize) -> PerftResult {
    let mut depth_results = vec![PerftDepthResult::default(); depth];

    let start = Instant::now();

    perft_helper(&mut depth_results, position, depth, 0);

    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().map(|res| res.tot).sum();

    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64();

    debug!(
        "perft depth {}: {} nodes in {:?}",
        depth, tot_nodes, time_elapsed
    );

    PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_helper(
    depth_results: &mut [PerftDepthResult],
    position: &Position,
    max_depth: usize,
    curr_depth: usize,
) {
    if curr_depth == max_depth {
        return;
    }

    let moves = gen_moves(position);

    if moves.is_empty() {
        // The side to move has lost; credited to the ply that led here
        if let Some(prev_res) = curr_depth.checked_sub(1).and_then(|d| depth_results.get_mut(d)) {
            prev_res.no_moves += 1;
        }
        return;
    }

    let promotion_row = position.active().promotion_row();
    let kings = position.kings(position.active());
    let curr_res = &mut depth_results[curr_depth];

    curr_res.tot += moves.len() as u64;
    for mve in moves.iter() {
        if mve.is_capture() {
            curr_res.captures += 1;
        }
        if mve.num_captures() > 1 {
            curr_res.multi_captures += 1;
        }
        let crowned = mve.path()[1..]
            .iter()
            .any(|&sq| promotion_row.is_square_set(sq));
        if crowned && !kings.is_square_set(mve.src()) {
            curr_res.promotions += 1;
        }
    }

    for mve in moves.iter() {
        let next = position.apply_unchecked(mve);
        perft_helper(depth_results, &next, max_depth, curr_depth + 1);
    }
}
