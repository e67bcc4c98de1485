//! Actions accepted by the turn reducer.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

/// One value from the closed action set.
///
/// String forms are the upper-case names (`"UP"`, `"USE_KEY"`, ...); the
/// numeric index follows declaration order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    UseKey,
    PickUp,
    Wait,
}

impl Action {
    pub const COUNT: usize = 7;

    /// Parses an action name, rejecting anything outside the action set.
    pub fn parse(name: &str) -> Result<Self, ActionParseError> {
        name.parse()
            .map_err(|_| ActionParseError::UnknownName(name.to_owned()))
    }

    /// Maps an action index (as used by policy outputs) to an action.
    pub fn from_index(index: u8) -> Result<Self, ActionParseError> {
        Self::from_repr(index).ok_or(ActionParseError::IndexOutOfRange(index))
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Movement direction for the four move actions.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::UseKey | Action::PickUp | Action::Wait => None,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionParseError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// Cardinal direction on the grid (`y` grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed priority order used to break ties.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const fn step(self, from: Position) -> Position {
        let (dx, dy) = self.delta();
        from.offset(dx, dy)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("unknown action '{0}'")]
    UnknownName(String),

    #[error("action index {0} is out of range (expected 0..{count})", count = Action::COUNT)]
    IndexOutOfRange(u8),
}

impl GameError for ActionParseError {
    /// The snapshot is untouched, so the caller may retry with a valid action.
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownName(_) => "ACTION_UNKNOWN_NAME",
            Self::IndexOutOfRange(_) => "ACTION_INDEX_OUT_OF_RANGE",
        }
    }
}
