use crate::error::ConfigError;
use crate::Coords;

/// Fixed-size arena. Read-only once built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: i32,
    cols: i32,
}

impl Grid {
    pub fn new(rows: i32, cols: i32) -> Result<Self, ConfigError> {
        if rows <= 0 || cols <= 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }

        Ok(Grid { rows, cols })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn contains(&self, (x, y): Coords) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Every in-bounds cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |y| (0..cols).map(move |x| (x, y)))
    }

    pub fn center(&self) -> Coords {
        (self.cols / 2, self.rows / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(Grid::new(0, 5), Err(ConfigError::EmptyGrid { .. })));
        assert!(matches!(Grid::new(5, -1), Err(ConfigError::EmptyGrid { .. })));
    }

    #[test]
    fn contains_checks_both_axes() {
        let grid = Grid::new(5, 7).unwrap();

        assert!(grid.contains((0, 0)));
        assert!(grid.contains((6, 4)));
        assert!(!grid.contains((7, 4)));
        assert!(!grid.contains((6, 5)));
        assert!(!grid.contains((-1, 0)));
        assert!(!grid.contains((0, -1)));
    }

    #[test]
    fn cells_cover_the_grid_once() {
        let grid = Grid::new(3, 4).unwrap();
        let cells: Vec<Coords> = grid.cells().collect();

        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[4], (0, 1));
        assert!(cells.iter().all(|c| grid.contains(*c)));
    }
}
