use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Default for Direction {
    fn default() -> Self {
        Right
    }
}

impl Direction {
    pub fn offset(&self) -> Coords {
        match self {
            Left => (-1, 0),
            Up => (0, -1),
            Right => (1, 0),
            Down => (0, 1),
        }
    }

    pub fn step(&self, from: Coords) -> Coords {
        let (dx, dy) = self.offset();
        (from.0 + dx, from.1 + dy)
    }

    /// The direction of a single step from `from` to `to`, if it is one.
    pub fn between(from: Coords, to: Coords) -> Option<Direction> {
        [Left, Up, Right, Down].iter().copied().find(|dir| dir.step(from) == to)
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right)
        )
    }

    pub fn head_char(&self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// True if `a` and `b` are exactly one axis-aligned step apart.
pub fn is_step(a: Coords, b: Coords) -> bool {
    (a.0 - b.0).abs() + (a.1 - b.1).abs() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_unit_steps() {
        for dir in [Left, Up, Right, Down] {
            assert!(is_step((3, 3), dir.step((3, 3))));
        }
        assert_eq!(Left.step((0, 0)), (-1, 0));
        assert_eq!(Up.step((0, 0)), (0, -1));
    }

    #[test]
    fn between_neighbours_only() {
        assert_eq!(Direction::between((2, 1), (1, 1)), Some(Left));
        assert_eq!(Direction::between((2, 1), (2, 2)), Some(Down));
        assert_eq!(Direction::between((2, 1), (2, 1)), None);
        assert_eq!(Direction::between((0, 0), (2, 0)), None);
    }

    #[test]
    fn opposites() {
        assert!(Up.is_opposite(&Down));
        assert!(Left.is_opposite(&Right));
        assert!(!Up.is_opposite(&Left));
        assert!(!Right.is_opposite(&Right));
    }
}
