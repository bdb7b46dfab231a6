use crate::point::Point;
use core::fmt;
use grid_util::{SimpleValueGrid, ValueGrid};

/// Bit marking a cell as part of a safezone.
pub const SAFEZONE_FLAG: u8 = 0x80;
/// Bits holding the cost of entering a cell.
pub const COST_MASK: u8 = 0x7F;
/// Largest supported side length, bounded by the byte-sized [Point] components.
pub const MAX_SIDE: usize = 256;

/// A decoded terrain byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TerrainCell(pub u8);

impl TerrainCell {
    pub fn new(cost: u8, safezone: bool) -> TerrainCell {
        debug_assert!(cost <= COST_MASK, "terrain cost {} does not fit in 7 bits", cost);
        let flag = if safezone { SAFEZONE_FLAG } else { 0 };
        TerrainCell((cost & COST_MASK) | flag)
    }
    /// The cost of entering this cell from a neighbour, 0 if the cell is impassable.
    pub fn cost(&self) -> u8 {
        self.0 & COST_MASK
    }
    pub fn is_safezone(&self) -> bool {
        self.0 & SAFEZONE_FLAG != 0
    }
    pub fn is_walkable(&self) -> bool {
        self.cost() != 0
    }
    /// Whether a search may enter this cell.
    pub fn passable_for(&self, include_safezone: bool) -> bool {
        self.is_walkable() && (include_safezone || !self.is_safezone())
    }
}

impl From<u8> for TerrainCell {
    fn from(value: u8) -> TerrainCell {
        TerrainCell(value)
    }
}

/// The byte grid a search runs on. Produced by the map subsystem and only read while
/// searching, so a single grid can back concurrent searches on distinct finders.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    cells: SimpleValueGrid<u8>,
}

impl TerrainGrid {
    /// Creates a grid with every cell set to the raw byte `fill`.
    ///
    /// Panics if either side is zero or larger than 256.
    pub fn new(width: usize, height: usize, fill: u8) -> TerrainGrid {
        assert!(
            (1..=MAX_SIDE).contains(&width) && (1..=MAX_SIDE).contains(&height),
            "terrain of {}x{} exceeds the supported 1..=256 range",
            width,
            height
        );
        TerrainGrid {
            cells: SimpleValueGrid::new(width, height, fill),
        }
    }

    /// Builds a grid from raw bytes laid out row by row, so `rows[y][x]` is the cell at
    /// `(x, y)`. All rows must have the same length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> TerrainGrid {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut terrain = TerrainGrid::new(width, height, 0);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(row.len(), width, "terrain row {} has a different width", y);
            for (x, &value) in row.iter().enumerate() {
                terrain.cells.set(x as i32, y as i32, value);
            }
        }
        terrain
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }
    pub fn height(&self) -> usize {
        self.cells.height()
    }
    pub fn contains(&self, point: Point) -> bool {
        (point.x as usize) < self.width() && (point.y as usize) < self.height()
    }
    /// The decoded cell at `point`, [None] outside the grid.
    pub fn cell(&self, point: Point) -> Option<TerrainCell> {
        self.contains(point)
            .then(|| TerrainCell(self.cells.get(point.x as i32, point.y as i32)))
    }
    /// Overwrites the raw byte at `point`. Panics outside the grid.
    pub fn set(&mut self, point: Point, value: u8) {
        assert!(self.contains(point), "{} is outside the terrain", point);
        self.cells.set(point.x as i32, point.y as i32, value);
    }
    pub fn set_cell(&mut self, point: Point, cell: TerrainCell) {
        self.set(point, cell.0);
    }
}

impl fmt::Display for TerrainGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Terrain:")?;
        for y in 0..self.height() as i32 {
            let values = (0..self.width() as i32)
                .map(|x| {
                    let cell = TerrainCell(self.cells.get(x, y));
                    if !cell.is_walkable() {
                        "#".to_owned()
                    } else if cell.is_safezone() {
                        format!("s{}", cell.cost())
                    } else {
                        cell.cost().to_string()
                    }
                })
                .collect::<Vec<String>>();
            writeln!(f, "{}", values.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_cost_and_safezone() {
        let cell = TerrainCell(0x80 | 5);
        assert_eq!(cell.cost(), 5);
        assert!(cell.is_safezone());
        assert!(cell.is_walkable());
        assert!(!cell.passable_for(false));
        assert!(cell.passable_for(true));

        let wall = TerrainCell(0x80);
        assert_eq!(wall.cost(), 0);
        assert!(!wall.passable_for(true));

        assert_eq!(TerrainCell::new(127, false).0, 127);
        assert_eq!(TerrainCell::new(1, true).0, 0x81);
    }

    #[test]
    fn from_rows_is_row_major() {
        let terrain = TerrainGrid::from_rows(&[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(terrain.width(), 3);
        assert_eq!(terrain.height(), 2);
        assert_eq!(terrain.cell(Point::new(2, 0)), Some(TerrainCell(3)));
        assert_eq!(terrain.cell(Point::new(0, 1)), Some(TerrainCell(4)));
        assert_eq!(terrain.cell(Point::new(3, 0)), None);
        assert_eq!(terrain.cell(Point::new(0, 2)), None);
    }

    #[test]
    fn set_and_display() {
        let mut terrain = TerrainGrid::new(3, 1, 1);
        terrain.set(Point::new(1, 0), 0);
        terrain.set_cell(Point::new(2, 0), TerrainCell::new(2, true));
        assert_eq!(terrain.to_string(), "Terrain:\n1 # s2\n");
    }

    #[test]
    #[should_panic]
    fn rejects_oversize_terrain() {
        TerrainGrid::new(257, 1, 1);
    }
}
