use std::fmt;

/// Unique identifier for any entity tracked in the state.
///
/// Entities carry no data of their own; their capabilities come from the
/// component stores that contain them. Ordering is the stable tie-break used
/// by every system that iterates more than one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Returns the next identifier in allocation order.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// `x` grows to the right and `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the four orthogonal neighbours in UP, DOWN, LEFT, RIGHT order.
    pub fn neighbours(self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_follow_up_down_left_right() {
        let origin = Position::new(2, 2);
        assert_eq!(
            origin.neighbours(),
            [
                Position::new(2, 1),
                Position::new(2, 3),
                Position::new(1, 2),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn entity_ids_order_numerically() {
        let mut ids = vec![EntityId(7), EntityId(2), EntityId(11)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(2), EntityId(7), EntityId(11)]);
        assert_eq!(EntityId(3).to_string(), "#3");
    }
}
