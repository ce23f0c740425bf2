use crate::grid::squared_distance;
use crate::hallway::{FillReport, Hallway, Hallways};
use crate::room::{Room, RoomId};
use crate::tile::{Tile, TileGrid};
use nalgebra::Vector2;
use pathfinding::prelude::kruskal;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;
use thiserror::Error;

pub struct DungeonGeneratorConfig {
    pub width: u32,         // Width of the tile grid (x-axis)
    pub height: u32,        // Height of the tile grid (y-axis)
    pub seed: Option<u64>,  // Seed value for random dungeon generation
    pub room_count: u32,    // Rooms wanted, fewer are placed when the grid is crowded
    pub room_attempts: u32, // Placement tries per room
    pub room_width_range: RangeInclusive<u32>,
    pub room_height_range: RangeInclusive<u32>,
    pub room_margin: u32,
}

impl Default for DungeonGeneratorConfig {
    fn default() -> Self {
        DungeonGeneratorConfig {
            width: 48,
            height: 24,
            seed: None,
            room_count: 8,
            room_attempts: 32,
            room_width_range: 3..=8,
            room_height_range: 3..=5,
            room_margin: 1,
        }
    }
}

#[derive(Debug)]
pub struct DungeonGeneratorResult {
    pub rooms: BTreeMap<RoomId, Room>,
    pub hallways: Hallways,
    pub tiles: TileGrid<Tile>,
    pub report: FillReport,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DungeonGeneratorError {
    #[error("room size range {0:?} is empty or starts at zero")]
    InvalidRoomSizeRange(RangeInclusive<u32>),
    #[error("width {width} cannot hold a room {room_width} wide")]
    NarrowWidthOrRoomWidthTooLarge { width: u32, room_width: u32 },
    #[error("height {height} cannot hold a room {room_height} high")]
    NarrowHeightOrRoomHeightTooLarge { height: u32, room_height: u32 },
    #[error("grid {width}x{height} is too large")]
    GridTooLarge { width: u32, height: u32 },
    #[error("room margin {0} is too large")]
    MarginTooLarge(u32),
}

// The perimeter and a wall ring on each side of a room.
const ROOM_CLEARANCE: u32 = 4;

pub fn generate_dungeon(
    config: DungeonGeneratorConfig,
) -> Result<DungeonGeneratorResult, DungeonGeneratorError> {
    // validate
    for range in [&config.room_width_range, &config.room_height_range] {
        if *range.start() == 0 || range.is_empty() {
            return Err(DungeonGeneratorError::InvalidRoomSizeRange(range.clone()));
        }
    }
    let fits = |size: u32, room_size: u32| {
        room_size
            .checked_add(ROOM_CLEARANCE)
            .is_some_and(|needed| needed <= size)
    };
    if !fits(config.width, *config.room_width_range.end()) {
        return Err(DungeonGeneratorError::NarrowWidthOrRoomWidthTooLarge {
            width: config.width,
            room_width: *config.room_width_range.end(),
        });
    }
    if !fits(config.height, *config.room_height_range.end()) {
        return Err(DungeonGeneratorError::NarrowHeightOrRoomHeightTooLarge {
            height: config.height,
            room_height: *config.room_height_range.end(),
        });
    }
    let (Ok(width), Ok(height)) = (i32::try_from(config.width), i32::try_from(config.height))
    else {
        return Err(DungeonGeneratorError::GridTooLarge {
            width: config.width,
            height: config.height,
        });
    };
    let margin = i32::try_from(config.room_margin)
        .map_err(|_| DungeonGeneratorError::MarginTooLarge(config.room_margin))?;

    let mut rng: rand::rngs::StdRng = config
        .seed
        .map(SeedableRng::seed_from_u64)
        .unwrap_or_else(rand::rngs::StdRng::from_entropy);

    let mut room_id = RoomId::first();
    let mut rooms: BTreeMap<RoomId, Room> = BTreeMap::new();
    for _ in 0..config.room_count {
        for _ in 0..config.room_attempts {
            let room_width = rng.gen_range(config.room_width_range.clone()) as i32;
            let room_height = rng.gen_range(config.room_height_range.clone()) as i32;
            let room_origin = Vector2::new(
                rng.gen_range(2..=(width - 2 - room_width)),
                rng.gen_range(2..=(height - 2 - room_height)),
            );
            let room = Room::new(room_id, room_width, room_height, room_origin);
            if rooms.values().any(|other| room.is_contract(other, margin)) {
                continue;
            }
            rooms.insert(room_id.gen_id(), room);
            break;
        }
    }

    // Create mst of room centers
    let room_list = rooms.values().collect::<Vec<_>>();
    let mut weighted_edges = Vec::new();
    for (index, room0) in room_list.iter().enumerate() {
        for room1 in &room_list[(index + 1)..] {
            let squared_length = squared_distance(&room0.center(), &room1.center());
            weighted_edges.push((room0.id, room1.id, squared_length.unsigned_abs()));
        }
    }
    let hallways = kruskal(&weighted_edges)
        .filter_map(|(room0_id, room1_id, _)| {
            let room0 = rooms.get(room0_id)?;
            let room1 = rooms.get(room1_id)?;
            Some(Hallway::new(room0.center(), room1.center()))
        })
        .collect::<Hallways>();

    let mut tiles = TileGrid::new(config.width as usize, config.height as usize, Tile::Nothing);
    for x in 0..width {
        tiles.set(&Vector2::new(x, 0), Tile::Wall);
        tiles.set(&Vector2::new(x, height - 1), Tile::Wall);
    }
    for y in 0..height {
        tiles.set(&Vector2::new(0, y), Tile::Wall);
        tiles.set(&Vector2::new(width - 1, y), Tile::Wall);
    }
    for room in rooms.values() {
        for point in room.floor() {
            tiles.set(&point, Tile::Floor);
        }
    }

    let blocks = HashSet::from([Tile::Wall]);
    let report = hallways.fill(&mut tiles, &blocks, Tile::Floor, Tile::Wall);

    for room in rooms.values() {
        for point in room.ring() {
            if let Some(tile) = tiles.get_mut(&point) {
                if *tile == Tile::Nothing {
                    *tile = Tile::Wall;
                }
            }
        }
    }

    if !report.is_complete() {
        log::warn!(
            "{} hallways out of the grid, {} unreachable",
            report.out_of_extent.len(),
            report.unreachable.len()
        );
    }
    log::info!(
        "generated {} rooms joined by {} hallways",
        rooms.len(),
        report.carved.len()
    );

    Ok(DungeonGeneratorResult {
        rooms,
        hallways,
        tiles,
        report,
    })
}
