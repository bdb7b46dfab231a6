use terrain_pathfinding::*;

/// Finds a path around a wall and prints it on top of the terrain.
fn main() {
    // 0 is impassable, 0x80 marks a safezone cell.
    let terrain = TerrainGrid::from_rows(&[
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 0, 1, 1, 1, 1],
        [1, 1, 1, 0, 1, 0x81, 0x81, 1],
        [1, 1, 1, 0, 1, 1, 1, 1],
        [1, 4, 4, 0, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ]);
    println!("{}", terrain);

    let mut finder = PathFinderConfig::default()
        .with_heuristic(HeuristicKind::MaxAxis, 1)
        .build()
        .unwrap();
    let start = Point::new(0, 2);
    let end = Point::new(6, 2);
    let path = finder.find_path(start, end, &terrain, false, &CancellationToken::new());
    match path {
        Some(path) => {
            let visited = path_points(&path);
            println!("Path of cost {}:", path_cost(&terrain, &path));
            for y in 0..terrain.height() as u8 {
                for x in 0..terrain.width() as u8 {
                    let p = Point::new(x, y);
                    let cell = terrain.cell(p).unwrap();
                    if p == start {
                        print!("S");
                    } else if p == end {
                        print!("G");
                    } else if visited.contains(&p) {
                        print!("*");
                    } else if !cell.is_walkable() {
                        print!("#");
                    } else {
                        print!(".");
                    }
                }
                println!();
            }
        }
        None => println!("No path from {} to {}: {:?}", start, end, finder.state()),
    }
    println!("{:?}", finder.last_statistics());
}
