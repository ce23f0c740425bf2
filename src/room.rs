use crate::grid::Coord;
use nalgebra::Vector2;

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub width: i32,
    pub height: i32,
    /// Bottom left floor cell.
    pub origin: Coord,
}

impl Room {
    pub fn new(id: RoomId, width: i32, height: i32, origin: Coord) -> Self {
        Room {
            id,
            width,
            height,
            origin,
        }
    }

    pub fn center(&self) -> Coord {
        self.origin + Vector2::new(self.width / 2, self.height / 2)
    }

    /// One past the top right floor cell.
    pub fn end(&self) -> Coord {
        self.origin + Vector2::new(self.width, self.height)
    }

    pub fn contains(&self, point: &Coord) -> bool {
        let end = self.end();
        self.origin.x <= point.x && point.x < end.x && self.origin.y <= point.y && point.y < end.y
    }

    /// Whether the wall rings of the two rooms come closer than `margin` cells.
    pub fn is_contract(&self, other: &Room, margin: i32) -> bool {
        let pad = i64::from(margin) + 1;
        // Extents as (start, end) pairs per axis, widened so the padding cannot overflow.
        let span = |start: i32, len: i32| (i64::from(start), i64::from(start) + i64::from(len));
        let (self_x, self_y) = (
            span(self.origin.x, self.width),
            span(self.origin.y, self.height),
        );
        let (other_x, other_y) = (
            span(other.origin.x, other.width),
            span(other.origin.y, other.height),
        );
        self_x.0 - pad < other_x.1 + 1
            && other_x.0 - 1 < self_x.1 + pad
            && self_y.0 - pad < other_y.1 + 1
            && other_y.0 - 1 < self_y.1 + pad
    }

    /// Cells of the wall ring hugging the floor.
    pub fn ring(&self) -> impl Iterator<Item = Coord> + '_ {
        let end = self.end();
        (self.origin.x - 1..=end.x)
            .flat_map(move |x| (self.origin.y - 1..=end.y).map(move |y| Vector2::new(x, y)))
            .filter(move |point| !self.contains(point))
    }

    pub fn floor(&self) -> impl Iterator<Item = Coord> + '_ {
        let end = self.end();
        (self.origin.x..end.x)
            .flat_map(move |x| (self.origin.y..end.y).map(move |y| Vector2::new(x, y)))
    }
}

#[derive(Ord, PartialOrd, PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct RoomId(u64);

impl RoomId {
    pub fn first() -> Self {
        RoomId(1)
    }

    pub fn gen_id(&mut self) -> Self {
        let ret = *self;
        self.0 += 1;
        ret
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}
