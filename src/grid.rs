use crate::frontier::Frontier;
use nalgebra::Vector2;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

pub type Coord = Vector2<i32>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid boundary, min {min} > max {max} on the {axis} axis")]
    InvalidBoundary { axis: char, min: i32, max: i32 },
    #[error("column {column} has {found} tiles, expected {expected}")]
    RaggedColumns {
        column: usize,
        expected: usize,
        found: usize,
    },
}

/// Inclusive rectangle of valid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    min: Coord,
    max: Coord,
}

impl Boundary {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Result<Self, GridError> {
        if max_x < min_x {
            return Err(GridError::InvalidBoundary {
                axis: 'x',
                min: min_x,
                max: max_x,
            });
        }
        if max_y < min_y {
            return Err(GridError::InvalidBoundary {
                axis: 'y',
                min: min_y,
                max: max_y,
            });
        }
        Ok(Boundary {
            min: Vector2::new(min_x, min_y),
            max: Vector2::new(max_x, max_y),
        })
    }

    pub fn min(&self) -> Coord {
        self.min
    }

    pub fn max(&self) -> Coord {
        self.max
    }

    pub fn contains(&self, point: &Coord) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }
}

/// Sequence of 4-adjacent coordinates joining two points, both ends included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace(Vec<Coord>);

impl Trace {
    fn validated(points: Vec<Coord>, start: &Coord, end: &Coord) -> Option<Trace> {
        if points.first() != Some(start) || points.last() != Some(end) {
            return None;
        }
        if points
            .windows(2)
            .any(|pair| squared_distance(&pair[0], &pair[1]) != 1)
        {
            return None;
        }
        Some(Trace(points))
    }

    pub fn start(&self) -> Coord {
        self.0[0]
    }

    pub fn end(&self) -> Coord {
        self.0[self.0.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a trace holds at least its start point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[Coord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub fn in_boundary(point: &Coord, boundary: &Boundary) -> bool {
    boundary.contains(point)
}

/// Top, right, bottom, left.
pub fn vertical_neighbors(point: &Coord) -> [Coord; 4] {
    [
        Vector2::new(point.x, point.y + 1),
        Vector2::new(point.x + 1, point.y),
        Vector2::new(point.x, point.y - 1),
        Vector2::new(point.x - 1, point.y),
    ]
}

/// Top right, bottom right, bottom left, top left.
pub fn diagonal_neighbors(point: &Coord) -> [Coord; 4] {
    [
        Vector2::new(point.x + 1, point.y + 1),
        Vector2::new(point.x + 1, point.y - 1),
        Vector2::new(point.x - 1, point.y - 1),
        Vector2::new(point.x - 1, point.y + 1),
    ]
}

pub fn surround_neighbors(point: &Coord) -> [Coord; 8] {
    let [t, r, b, l] = vertical_neighbors(point);
    let [tr, br, bl, tl] = diagonal_neighbors(point);
    [t, r, b, l, tr, br, bl, tl]
}

/// Deltas are widened to `i64` before squaring.
pub fn squared_distance(a: &Coord, b: &Coord) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

pub fn distance(a: &Coord, b: &Coord) -> f64 {
    (squared_distance(a, b) as f64).sqrt()
}

/// Best-first search for a trace from `start` to `end`.
///
/// Moves are 4-connected with unit cost, and the frontier is keyed by cost so far plus the
/// squared euclidean distance to `end`. That estimate overshoots on long distances, so the trace
/// always connects the two points but is not guaranteed to be the shortest one.
///
/// Cells in `blocks` and cells outside `boundary` are never entered. `start` itself is exempt
/// from both checks: `start == end` yields `[start]` even when the cell is blocked, and a start
/// lying just outside `boundary` still steps into it, so its trace begins outside.
///
/// Returns `None` when no connecting trace exists.
pub fn shortest_trace(
    start: &Coord,
    end: &Coord,
    blocks: Option<&HashSet<Coord>>,
    boundary: &Boundary,
) -> Option<Trace> {
    let is_blocked = |point: &Coord| {
        !boundary.contains(point) || blocks.is_some_and(|blocks| blocks.contains(point))
    };

    let mut frontier: Frontier<Coord, i64> = Frontier::default();
    let mut dist_to: HashMap<Coord, i64> = HashMap::new();
    let mut edge_to: HashMap<Coord, Coord> = HashMap::new();
    let mut visited: HashSet<Coord> = HashSet::new();

    dist_to.insert(*start, 0);
    frontier.push(*start, squared_distance(start, end));

    while let Some(point) = frontier.pop_min() {
        visited.insert(point);
        if point == *end {
            break;
        }
        let start_to_point = dist_to.get(&point).copied().unwrap_or(0);
        for next in vertical_neighbors(&point) {
            if visited.contains(&next) || is_blocked(&next) {
                continue;
            }
            let start_to_next = start_to_point + squared_distance(&point, &next);
            if dist_to.get(&next).map_or(true, |&dist| dist > start_to_next) {
                dist_to.insert(next, start_to_next);
                edge_to.insert(next, point);
            }
            let score = start_to_next + squared_distance(&next, end);
            if frontier.contains(&next) {
                frontier.decrease_priority(&next, score);
            } else {
                frontier.push(next, score);
            }
        }
    }

    // Walk the predecessor links back to the start, stopping early on a gap.
    let mut trace = VecDeque::new();
    let mut cursor = Some(*end);
    while let Some(point) = cursor {
        trace.push_front(point);
        if point == *start {
            break;
        }
        cursor = edge_to.get(&point).copied();
    }

    Trace::validated(trace.into(), start, end)
}

#[cfg(test)]
mod tests {
    use crate::grid::{
        diagonal_neighbors, distance, in_boundary, shortest_trace, squared_distance,
        surround_neighbors, vertical_neighbors, Boundary, Coord, GridError,
    };
    use nalgebra::Vector2;
    use pathfinding::prelude::bfs;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn points(list: &[(i32, i32)]) -> Vec<Coord> {
        list.iter().map(|&(x, y)| Vector2::new(x, y)).collect()
    }

    fn assert_connected(trace: &[Coord], start: &Coord, end: &Coord) {
        assert_eq!(trace.first(), Some(start));
        assert_eq!(trace.last(), Some(end));
        for pair in trace.windows(2) {
            assert_eq!(squared_distance(&pair[0], &pair[1]), 1, "{:?}", pair);
        }
    }

    #[test]
    fn boundary_rejects_inverted_axes() {
        assert_eq!(
            Boundary::new(3, 0, 2, 5),
            Err(GridError::InvalidBoundary {
                axis: 'x',
                min: 3,
                max: 2
            })
        );
        assert_eq!(
            Boundary::new(0, 1, 0, 0),
            Err(GridError::InvalidBoundary {
                axis: 'y',
                min: 1,
                max: 0
            })
        );
        assert!(Boundary::new(2, 2, 2, 2).is_ok());
    }

    #[test]
    fn in_boundary_is_inclusive() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        assert!(in_boundary(&Vector2::new(0, 0), &boundary));
        assert!(in_boundary(&Vector2::new(4, 4), &boundary));
        assert!(in_boundary(&Vector2::new(0, 4), &boundary));
        assert!(!in_boundary(&Vector2::new(5, 0), &boundary));
        assert!(!in_boundary(&Vector2::new(0, -1), &boundary));
    }

    #[test]
    fn neighbor_order() {
        let p = Vector2::new(2, 3);
        assert_eq!(
            vertical_neighbors(&p).to_vec(),
            points(&[(2, 4), (3, 3), (2, 2), (1, 3)])
        );
        assert_eq!(
            diagonal_neighbors(&p).to_vec(),
            points(&[(3, 4), (3, 2), (1, 2), (1, 4)])
        );
    }

    #[test]
    fn surround_neighbors_are_the_eight_adjacent_cells() {
        let p = Vector2::new(-1, 7);
        let surround = surround_neighbors(&p);
        assert_eq!(surround[..4], vertical_neighbors(&p));
        assert_eq!(surround[4..], diagonal_neighbors(&p));
        let distinct: HashSet<Coord> = surround.iter().copied().collect();
        assert_eq!(distinct.len(), 8);
        for q in surround {
            assert_ne!(q, p);
            assert!((q.x - p.x).abs() <= 1 && (q.y - p.y).abs() <= 1);
        }
    }

    #[test]
    fn distances() {
        let a = Vector2::new(1, 1);
        let b = Vector2::new(4, 5);
        assert_eq!(squared_distance(&a, &b), 25);
        assert_eq!(squared_distance(&b, &a), 25);
        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(squared_distance(&a, &a), 0);
    }

    #[test]
    fn same_start_and_end() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        let p = Vector2::new(3, 2);
        let trace = shortest_trace(&p, &p, None, &boundary).unwrap();
        assert_eq!(trace.points(), &[p]);
    }

    #[test]
    fn same_start_and_end_ignores_blocks() {
        let boundary = Boundary::new(0, 0, 0, 0).unwrap();
        let p = Vector2::new(0, 0);
        let blocks = HashSet::from([p]);
        let trace = shortest_trace(&p, &p, Some(&blocks), &boundary).unwrap();
        assert_eq!(trace.points(), &[p]);
    }

    #[test]
    fn straight_line() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        let trace = shortest_trace(
            &Vector2::new(0, 0),
            &Vector2::new(4, 0),
            Some(&HashSet::new()),
            &boundary,
        )
        .unwrap();
        assert_eq!(
            trace.points(),
            points(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)])
        );
        assert_eq!(trace.start(), Vector2::new(0, 0));
        assert_eq!(trace.end(), Vector2::new(4, 0));
    }

    #[test]
    fn detour_around_block() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        let blocks = HashSet::from([Vector2::new(1, 0)]);
        let start = Vector2::new(0, 0);
        let end = Vector2::new(2, 0);
        let trace = shortest_trace(&start, &end, Some(&blocks), &boundary).unwrap();
        assert_connected(trace.points(), &start, &end);
        assert_eq!(
            trace.points(),
            points(&[(0, 0), (0, 1), (1, 1), (2, 1), (2, 0)])
        );
    }

    #[test]
    fn enclosed_end_has_no_trace() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        let blocks: HashSet<Coord> = points(&[(2, 3), (3, 2), (2, 1), (1, 2)])
            .into_iter()
            .collect();
        let trace = shortest_trace(
            &Vector2::new(0, 0),
            &Vector2::new(2, 2),
            Some(&blocks),
            &boundary,
        );
        assert_eq!(trace, None);
    }

    #[test]
    fn blocked_end_has_no_trace() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        let end = Vector2::new(3, 3);
        let blocks = HashSet::from([end]);
        assert_eq!(
            shortest_trace(&Vector2::new(0, 0), &end, Some(&blocks), &boundary),
            None
        );
    }

    #[test]
    fn boundary_prunes_the_search() {
        // The only way around the wall leaves the boundary.
        let boundary = Boundary::new(0, 0, 2, 2).unwrap();
        let blocks: HashSet<Coord> = points(&[(1, 0), (1, 1), (1, 2)]).into_iter().collect();
        assert_eq!(
            shortest_trace(
                &Vector2::new(0, 1),
                &Vector2::new(2, 1),
                Some(&blocks),
                &boundary
            ),
            None
        );

        let wider = Boundary::new(0, 0, 2, 3).unwrap();
        let trace = shortest_trace(
            &Vector2::new(0, 1),
            &Vector2::new(2, 1),
            Some(&blocks),
            &wider,
        )
        .unwrap();
        assert!(trace.iter().all(|p| wider.contains(p)));
        assert!(trace.iter().any(|p| p.y == 3));
    }

    #[test]
    fn start_outside_boundary_steps_in() {
        let boundary = Boundary::new(0, 0, 4, 4).unwrap();
        let start = Vector2::new(-1, 0);
        let end = Vector2::new(2, 0);
        let trace = shortest_trace(&start, &end, None, &boundary).unwrap();
        assert_eq!(trace.points(), points(&[(-1, 0), (0, 0), (1, 0), (2, 0)]));
        assert!(!boundary.contains(&trace.start()));

        // Two cells out, every neighbour of the start is outside as well.
        let far = Vector2::new(-2, 0);
        assert_eq!(shortest_trace(&far, &end, None, &boundary), None);
    }

    #[test]
    fn squared_distance_is_exact_on_wide_spans() {
        let a = Vector2::new(0, 0);
        let b = Vector2::new(50_000, 50_000);
        assert_eq!(squared_distance(&a, &b), 5_000_000_000);
        let corner = Vector2::new(i32::MAX, i32::MAX);
        let side = i64::from(i32::MAX);
        assert_eq!(squared_distance(&a, &corner), 2 * side * side);
    }

    #[test]
    fn wide_boundary_is_searched() {
        let boundary = Boundary::new(0, 0, 50_000, 0).unwrap();
        let start = Vector2::new(0, 0);
        let end = Vector2::new(50_000, 0);
        let trace = shortest_trace(&start, &end, None, &boundary).unwrap();
        assert_eq!(trace.len(), 50_001);
        assert_connected(trace.points(), &start, &end);
    }

    #[test]
    fn every_pair_on_open_grid_is_connected() {
        let boundary = Boundary::new(0, 0, 3, 3).unwrap();
        let cells: Vec<Coord> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Vector2::new(x, y)))
            .collect();
        for start in &cells {
            for end in &cells {
                let trace = shortest_trace(start, end, None, &boundary).unwrap();
                assert_connected(trace.points(), start, end);
                assert!(trace.iter().all(|p| boundary.contains(p)));
            }
        }
    }

    #[test]
    fn reachability_matches_breadth_first_search() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let boundary = Boundary::new(0, 0, 7, 5).unwrap();
        for _ in 0..40 {
            let blocks: HashSet<Coord> = (0..8)
                .flat_map(|x| (0..6).map(move |y| Vector2::new(x, y)))
                .filter(|_| rng.gen_bool(0.3))
                .collect();
            let start = Vector2::new(rng.gen_range(0..8), rng.gen_range(0..6));
            let end = Vector2::new(rng.gen_range(0..8), rng.gen_range(0..6));
            if blocks.contains(&start) || blocks.contains(&end) {
                continue;
            }

            let expected = bfs(
                &start,
                |p| {
                    vertical_neighbors(p)
                        .into_iter()
                        .filter(|q| boundary.contains(q) && !blocks.contains(q))
                        .collect::<Vec<_>>()
                },
                |p| *p == end,
            );
            let trace = shortest_trace(&start, &end, Some(&blocks), &boundary);
            assert_eq!(trace.is_some(), expected.is_some());
            if let Some(trace) = trace {
                assert_connected(trace.points(), &start, &end);
                assert!(trace.iter().all(|p| !blocks.contains(p)));
            }
        }
    }
}
