use crate::game::settings::OperationMode;
use crate::map::direction::Direction;

/// Raw player input, already decoded by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Swipe(Direction),
    /// A touched maze tile.
    Touch { column: i32, row: i32 },
    /// Device tilt, reduced to its dominant heading.
    Tilt(Direction),
}

impl Input {
    /// The operation mode this input belongs to. Input from any other mode is ignored.
    pub fn mode(&self) -> OperationMode {
        match self {
            Input::Swipe(_) => OperationMode::Swipe,
            Input::Touch { .. } => OperationMode::Touch,
            Input::Tilt(_) => OperationMode::Accel,
        }
    }
}

impl From<Direction> for Input {
    fn from(direction: Direction) -> Self {
        Input::Swipe(direction)
    }
}
