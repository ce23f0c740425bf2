use dungeon_hallways::gen::{generate_dungeon, DungeonGeneratorConfig};

fn main() {
    let seed = std::env::args().nth(1).and_then(|arg| arg.parse().ok());

    let dungeon = generate_dungeon(DungeonGeneratorConfig {
        seed,
        ..Default::default()
    })
    .unwrap();

    print!("{}", dungeon.tiles);
    for (hallway, trace) in dungeon.report.carved.iter() {
        println!("{} ({} tiles)", hallway, trace.len());
    }
}
