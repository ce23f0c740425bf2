use crate::grid::{Boundary, Coord, GridError};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tile {
    Nothing,
    Floor,
    Wall,
}

impl Tile {
    pub fn character(&self) -> char {
        match self {
            Tile::Nothing => ' ',
            Tile::Floor => '·',
            Tile::Wall => '#',
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.character())
    }
}

/// Rectangular grid of tiles addressed as `[x][y]`, `y` growing upwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid<T> {
    columns: Vec<Vec<T>>,
}

impl<T> TileGrid<T> {
    pub fn new(width: usize, height: usize, tile: T) -> Self
    where
        T: Clone,
    {
        TileGrid {
            columns: vec![vec![tile; height]; width],
        }
    }

    pub fn from_columns(columns: Vec<Vec<T>>) -> Result<Self, GridError> {
        if let Some(expected) = columns.first().map(Vec::len) {
            if let Some((column, found)) = columns
                .iter()
                .map(Vec::len)
                .enumerate()
                .find(|(_, len)| *len != expected)
            {
                return Err(GridError::RaggedColumns {
                    column,
                    expected,
                    found,
                });
            }
        }
        Ok(TileGrid { columns })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Inclusive extent of the grid, `None` when the grid has no cells.
    pub fn boundary(&self) -> Option<Boundary> {
        if self.is_empty() {
            return None;
        }
        let max_x = i32::try_from(self.width() - 1).ok()?;
        let max_y = i32::try_from(self.height() - 1).ok()?;
        Boundary::new(0, 0, max_x, max_y).ok()
    }

    pub fn get(&self, point: &Coord) -> Option<&T> {
        let (x, y) = index(point)?;
        self.columns.get(x)?.get(y)
    }

    pub fn get_mut(&mut self, point: &Coord) -> Option<&mut T> {
        let (x, y) = index(point)?;
        self.columns.get_mut(x)?.get_mut(y)
    }

    /// Overwrites the tile at `point`. Returns false when the point is off the grid.
    pub fn set(&mut self, point: &Coord, tile: T) -> bool {
        match self.get_mut(point) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn columns(&self) -> &[Vec<T>] {
        &self.columns
    }
}

fn index(point: &Coord) -> Option<(usize, usize)> {
    Some((usize::try_from(point.x).ok()?, usize::try_from(point.y).ok()?))
}

/// Renders the top row first, one line per row.
impl<T> fmt::Display for TileGrid<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height()).rev() {
            for column in &self.columns {
                write!(f, "{}", column[y])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
