//! Single-source negative-cycle detection by edge relaxation.

use super::{Cycle, CycleFinder};
use crate::matrix::WeightMatrix;
use crate::SearchResult;

/// Bellman-Ford negative-cycle search anchored at one source vertex.
///
/// After `N - 1` relaxation rounds every edge that still relaxes leads back
/// to a negative loop through the predecessor chain. Each such loop is
/// reconstructed, anchored to the source and scored; the most negative
/// anchored cycle wins. Ties keep the first candidate found (strict `<`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFord;

impl BellmanFord {
    pub fn new() -> Self {
        Self
    }

    /// Run the search from `source`.
    ///
    /// Returns `Ok(None)` when no negative cycle reachable from `source` can
    /// be anchored to it.
    ///
    /// # Errors
    ///
    /// `SearchError::SourceOutOfRange` if `source` is not a vertex.
    pub fn search(&self, weights: &WeightMatrix, source: usize) -> SearchResult<Option<Cycle>> {
        weights.check_source(source)?;

        let size = weights.dimension();
        let mut distance = vec![f64::INFINITY; size];
        let mut predecessor: Vec<Option<usize>> = vec![None; size];
        distance[source] = 0.0;

        for round in 1..size {
            let mut changed = false;
            for (from, to, weight) in weights.edges() {
                changed |= relax(&mut distance, &mut predecessor, from, to, weight);
            }
            if !changed {
                tracing::trace!(source, round, "Distances converged early");
                return Ok(None);
            }
        }

        let mut best: Option<Cycle> = None;
        let mut candidates = 0usize;

        for (from, to, weight) in weights.edges() {
            if !relax(&mut distance, &mut predecessor, from, to, weight) {
                continue;
            }
            candidates += 1;

            let Some(members) = trace_loop(&predecessor, to) else {
                tracing::trace!(source, vertex = to, "Predecessor chain ends before closing a loop");
                continue;
            };

            let Some(candidate) = anchor_to_source(weights, &members, source) else {
                tracing::trace!(source, loop_members = ?members, "Loop not connected to source");
                continue;
            };

            let threshold = best.as_ref().map_or(0.0, Cycle::weight);
            if candidate.weight() < threshold {
                tracing::trace!(source, cycle = %candidate, "New best candidate");
                best = Some(candidate);
            }
        }

        tracing::debug!(
            source,
            relaxable_edges = candidates,
            found = best.is_some(),
            weight = best.as_ref().map(Cycle::weight),
            "Bellman-Ford search completed"
        );

        Ok(best)
    }
}

impl CycleFinder for BellmanFord {
    fn find_cycle(&self, weights: &WeightMatrix, source: usize) -> SearchResult<Option<Cycle>> {
        self.search(weights, source)
    }
}

fn relax(
    distance: &mut [f64],
    predecessor: &mut [Option<usize>],
    from: usize,
    to: usize,
    weight: f64,
) -> bool {
    if distance[from].is_finite() && distance[from] + weight < distance[to] {
        distance[to] = distance[from] + weight;
        predecessor[to] = Some(from);
        true
    } else {
        false
    }
}

/// Walk predecessors back from `start` until a vertex repeats and return the
/// loop through that vertex in forward (trading) order.
fn trace_loop(predecessor: &[Option<usize>], start: usize) -> Option<Vec<usize>> {
    let mut visited = vec![false; predecessor.len()];
    let mut walk = Vec::new();
    let mut vertex = start;

    while !visited[vertex] {
        visited[vertex] = true;
        walk.push(vertex);
        vertex = predecessor[vertex]?;
    }

    // the first repeated vertex lies on the loop
    let entry = walk.iter().position(|&v| v == vertex)?;
    let mut members = walk.split_off(entry);
    members.reverse();
    Some(members)
}

/// Orient a loop into a concrete `[source, ..., source]` cycle.
///
/// A loop through the source is rotated to start there. Otherwise the source
/// must have an edge into the loop and the loop an edge back to the source;
/// every entry point is tried and the most negative detour is kept.
fn anchor_to_source(weights: &WeightMatrix, members: &[usize], source: usize) -> Option<Cycle> {
    if let Some(position) = members.iter().position(|&v| v == source) {
        let mut vertices: Vec<usize> = members[position..]
            .iter()
            .chain(&members[..position])
            .copied()
            .collect();
        vertices.push(source);
        return Cycle::from_vertices(weights, vertices);
    }

    let len = members.len();
    let mut best: Option<Cycle> = None;

    for entry in 0..len {
        let exit = members[(entry + len - 1) % len];
        if !weights.has_edge(source, members[entry]) || !weights.has_edge(exit, source) {
            continue;
        }

        let mut vertices = Vec::with_capacity(len + 2);
        vertices.push(source);
        vertices.extend(members[entry..].iter().chain(&members[..entry]));
        vertices.push(source);

        if let Some(candidate) = Cycle::from_vertices(weights, vertices) {
            if best.as_ref().map_or(true, |b| candidate.weight() < b.weight()) {
                best = Some(candidate);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use crate::matrix::RateMatrix;

    fn triangle(closing_rate: f64) -> WeightMatrix {
        let rates = RateMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.0],
            vec![0.0, 0.0, 0.4],
            vec![closing_rate, 0.0, 0.0],
        ])
        .unwrap();
        WeightMatrix::from_rates(&rates)
    }

    #[test]
    fn test_positive_triangle_has_no_cycle() {
        let weights = triangle(0.6);
        assert_eq!(BellmanFord::new().search(&weights, 0).unwrap(), None);
    }

    #[test]
    fn test_profitable_triangle_is_found() {
        let weights = triangle(6.0);
        let cycle = BellmanFord::new().search(&weights, 0).unwrap().unwrap();

        assert_eq!(cycle.vertices(), &[0, 1, 2, 0]);
        assert_eq!(cycle.len(), 4);
        let expected = -(0.5_f64.ln() + 0.4_f64.ln() + 6.0_f64.ln());
        assert!((cycle.weight() - expected).abs() < 1e-12);
        assert!(cycle.weight() < 0.0);
    }

    #[test]
    fn test_cycle_rotated_to_any_source_on_loop() {
        let weights = triangle(6.0);
        let cycle = BellmanFord::new().search(&weights, 2).unwrap().unwrap();
        assert_eq!(cycle.vertices(), &[2, 0, 1, 2]);
    }

    #[test]
    fn test_loop_off_source_requires_connecting_edges() {
        // negative loop 1 -> 2 -> 3 -> 1, source 0 can enter at 2 but not return
        let rows = vec![
            vec![None, None, Some(0.1), None],
            vec![None, None, Some(0.1), None],
            vec![None, None, None, Some(0.1)],
            vec![None, Some(-1.0), None, None],
        ];
        let weights = WeightMatrix::from_rows(rows.clone()).unwrap();
        assert_eq!(BellmanFord::new().search(&weights, 0).unwrap(), None);

        // a way back 1 -> 0 closes 0 -> 2 -> 3 -> 1 -> 0
        let mut rows = rows;
        rows[1][0] = Some(0.1);
        let weights = WeightMatrix::from_rows(rows).unwrap();
        let cycle = BellmanFord::new().search(&weights, 0).unwrap().unwrap();
        assert_eq!(cycle.vertices(), &[0, 2, 3, 1, 0]);
        assert!((cycle.weight() + 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_unreachable_negative_loop_is_ignored() {
        let weights = WeightMatrix::from_rows(vec![
            vec![None, None, None],
            vec![None, None, Some(-1.0)],
            vec![None, Some(0.5), None],
        ])
        .unwrap();
        assert_eq!(BellmanFord::new().search(&weights, 0).unwrap(), None);
    }

    #[test]
    fn test_zero_weight_edge_participates() {
        // 0 -> 1 at 1:1, 1 -> 2 at 1:1, 2 -> 0 at 1.1
        let rates = RateMatrix::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.1, 0.0, 0.0],
        ])
        .unwrap();
        let weights = WeightMatrix::from_rates(&rates);
        let cycle = BellmanFord::new().search(&weights, 0).unwrap().unwrap();
        assert_eq!(cycle.vertices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_source_out_of_range() {
        let weights = triangle(6.0);
        let err = BellmanFord::new().search(&weights, 3).unwrap_err();
        assert_eq!(err, SearchError::SourceOutOfRange { source_vertex: 3, size: 3 });
    }

    #[test]
    fn test_trace_loop_orders_forward() {
        // predecessor loop 3 -> 1 -> 2 -> 3, vertex 0 unreached
        let predecessor = vec![None, Some(3), Some(1), Some(2)];
        let members = trace_loop(&predecessor, 2).unwrap();
        // forward hops must follow predecessor edges: pred[v] -> v
        for window in members.windows(2) {
            assert_eq!(predecessor[window[1]], Some(window[0]));
        }
        assert_eq!(predecessor[members[0]], Some(*members.last().unwrap()));
        assert_eq!(members.len(), 3);

        let chain = vec![None, Some(0), Some(1)];
        assert!(trace_loop(&chain, 2).is_none());
    }
}
