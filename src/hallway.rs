use crate::grid::{shortest_trace, surround_neighbors, Coord, Trace};
use crate::tile::TileGrid;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Unordered pair of points to be joined by a corridor.
#[derive(Debug, Copy, Clone)]
pub struct Hallway {
    pub from: Coord,
    pub to: Coord,
}

impl Hallway {
    pub fn new(from: Coord, to: Coord) -> Self {
        Hallway { from, to }
    }

    fn ordered(&self) -> ((i32, i32), (i32, i32)) {
        let a = (self.from.x, self.from.y);
        let b = (self.to.x, self.to.y);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl Eq for Hallway {}

impl PartialEq for Hallway {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Hash for Hallway {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

impl fmt::Display for Hallway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.from.x, self.from.y, self.to.x, self.to.y
        )
    }
}

/// Outcome of [`Hallways::fill`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FillReport {
    pub carved: Vec<(Hallway, Trace)>,
    pub out_of_extent: Vec<Hallway>,
    pub unreachable: Vec<Hallway>,
}

impl FillReport {
    /// True when every registered hallway got a corridor.
    pub fn is_complete(&self) -> bool {
        self.out_of_extent.is_empty() && self.unreachable.is_empty()
    }
}

/// Set of hallways, iterated in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Hallways {
    hallways: Vec<Hallway>,
    seen: HashSet<Hallway>,
}

impl Hallways {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the hallway was not registered yet.
    pub fn add(&mut self, hallway: Hallway) -> bool {
        if !self.seen.insert(hallway) {
            return false;
        }
        self.hallways.push(hallway);
        true
    }

    /// Registers a hallway from endpoints that may be missing. Incomplete pairs are rejected.
    pub fn add_endpoints(&mut self, from: Option<Coord>, to: Option<Coord>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => self.add(Hallway::new(from, to)),
            _ => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hallways.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hallways.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Hallway> {
        self.hallways.iter()
    }

    /// Carves every hallway into `tiles`.
    ///
    /// Cells holding a tile from `blocks` are obstacles. They are collected once, before any
    /// corridor is laid, so corridors may cross each other. Floors of all corridors are written
    /// first, then each corridor is sealed with `wall_tile` on every surrounding cell that is
    /// neither an obstacle nor already a floor.
    pub fn fill<T>(
        &self,
        tiles: &mut TileGrid<T>,
        blocks: &HashSet<T>,
        floor_tile: T,
        wall_tile: T,
    ) -> FillReport
    where
        T: Copy + Eq + Hash + fmt::Display,
    {
        let mut report = FillReport::default();
        let Some(boundary) = tiles.boundary() else {
            return report;
        };

        let mut blocked_points = HashSet::new();
        for (x, column) in tiles.columns().iter().enumerate() {
            for (y, tile) in column.iter().enumerate() {
                if blocks.contains(tile) {
                    // Boundary fits in i32, so do the indices.
                    blocked_points.insert(Coord::new(x as i32, y as i32));
                }
            }
        }

        for hallway in self.hallways.iter() {
            if !boundary.contains(&hallway.from) || !boundary.contains(&hallway.to) {
                log::warn!("hallway {} lies outside of the tiles, skipped", hallway);
                report.out_of_extent.push(*hallway);
                continue;
            }
            match shortest_trace(&hallway.from, &hallway.to, Some(&blocked_points), &boundary) {
                Some(trace) => {
                    log::debug!("hallway {} traced over {} tiles", hallway, trace.len());
                    report.carved.push((*hallway, trace));
                }
                None => {
                    log::warn!("no trace for hallway {}\n{}", hallway, tiles);
                    report.unreachable.push(*hallway);
                }
            }
        }

        // Floors of every hallway go down before any wall.
        for (_, trace) in report.carved.iter() {
            for point in trace {
                tiles.set(point, floor_tile);
            }
        }

        for (_, trace) in report.carved.iter() {
            for point in trace {
                for surround in surround_neighbors(point) {
                    if !boundary.contains(&surround) || blocked_points.contains(&surround) {
                        continue;
                    }
                    if let Some(tile) = tiles.get_mut(&surround) {
                        if *tile != floor_tile {
                            *tile = wall_tile;
                        }
                    }
                }
            }
        }

        report
    }
}

impl<'a> IntoIterator for &'a Hallways {
    type Item = &'a Hallway;
    type IntoIter = std::slice::Iter<'a, Hallway>;

    fn into_iter(self) -> Self::IntoIter {
        self.hallways.iter()
    }
}

impl Extend<Hallway> for Hallways {
    fn extend<I: IntoIterator<Item = Hallway>>(&mut self, iter: I) {
        for hallway in iter {
            self.add(hallway);
        }
    }
}

impl FromIterator<Hallway> for Hallways {
    fn from_iter<I: IntoIterator<Item = Hallway>>(iter: I) -> Self {
        let mut hallways = Hallways::new();
        hallways.extend(iter);
        hallways
    }
}
