//! Exact min-cost assignment (Hungarian method).

/// Solves the square assignment problem.
///
/// Returns `assign` with `assign[i] = j` such that the sum of
/// `cost[i][assign[i]]` is minimal. Runs in O(n^3). Costs must stay well
/// below `i64::MAX / 4`.
pub fn solve_assignment(cost: &[Vec<i64>]) -> Vec<usize> {
    const INF: i64 = i64::MAX / 4;
    let n = cost.len();
    if n == 0 {
        return Vec::new();
    }

    // Potentials and the matching are 1-based; column 0 is a sentinel.
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut row_of = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0;
        let mut minv = vec![INF; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = INF;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if row_of[j0] == 0 {
                break;
            }
        }
        while j0 != 0 {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
        }
    }

    let mut assign = vec![0; n];
    for j in 1..=n {
        if row_of[j] != 0 {
            assign[row_of[j] - 1] = j - 1;
        }
    }
    assign
}
