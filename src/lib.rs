pub mod frontier;
pub mod gen;
pub mod grid;
pub mod hallway;
pub mod room;
pub mod tile;
