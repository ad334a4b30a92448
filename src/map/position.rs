//! Sub-tile position of a moving actor.

use glam::IVec2;

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, MAZE_UNIT, SPEED_UNIT};
use crate::map::direction::Direction;

/// Pixel offset of a tile's centre from its lower-left corner.
const PIXEL_ORIGIN: i32 = MAZE_UNIT / 2;

/// A tile coordinate plus the dot offset inside it.
///
/// Speed is spent in 1/16 dot units: the `dxf`/`dyf` accumulators collect the budget
/// and every full [`SPEED_UNIT`] moves the actor one dot. Crossing eight dots moves it to
/// the neighbouring tile, wrapping at the grid edges (the tunnel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub column: i32,
    pub row: i32,
    pub dx: i32,
    pub dy: i32,
    dxf: i32,
    dyf: i32,
    /// Dots moved since this counter was last cleared.
    pub amount_moved: i32,
}

impl Position {
    pub const fn new(column: i32, row: i32) -> Self {
        Self::with_offset(column, row, 0, 0)
    }

    pub const fn with_offset(column: i32, row: i32, dx: i32, dy: i32) -> Self {
        Self {
            column,
            row,
            dx,
            dy,
            dxf: 0,
            dyf: 0,
            amount_moved: 0,
        }
    }

    /// Builds a centred position from pixel coordinates.
    pub fn from_pixel(pixel: IVec2) -> Self {
        let x = pixel.x - PIXEL_ORIGIN;
        let y = pixel.y - PIXEL_ORIGIN;
        Self::with_offset(x.div_euclid(MAZE_UNIT), y.div_euclid(MAZE_UNIT), x.rem_euclid(MAZE_UNIT), y.rem_euclid(MAZE_UNIT))
    }

    /// Places the position, clearing the accumulators and the moved counter.
    pub fn set(&mut self, column: i32, row: i32, dx: i32, dy: i32) {
        *self = Self::with_offset(column, row, dx, dy);
    }

    pub fn tile(&self) -> IVec2 {
        IVec2::new(self.column, self.row)
    }

    pub fn x(&self) -> i32 {
        self.column * MAZE_UNIT + self.dx + PIXEL_ORIGIN
    }

    pub fn y(&self) -> i32 {
        self.row * MAZE_UNIT + self.dy + PIXEL_ORIGIN
    }

    pub fn pixel(&self) -> IVec2 {
        IVec2::new(self.x(), self.y())
    }

    pub fn is_center(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Movement is only allowed along an axis whose perpendicular offset is zero.
    pub fn can_move(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left | Direction::Right => self.dy == 0,
            Direction::Up | Direction::Down => self.dx == 0,
            Direction::None | Direction::Stop => false,
        }
    }

    /// How far, in dots, the actor is already past the tile centre toward `direction`.
    pub fn absolute_delta(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Right if self.dx > 0 => self.dx,
            Direction::Left if self.dx < 0 => -self.dx,
            Direction::Up if self.dy > 0 => self.dy,
            Direction::Down if self.dy < 0 => -self.dy,
            _ => 0,
        }
    }

    /// Drops the fractional budget on the axis of `direction` (both axes for `Stop`).
    pub fn round_down(&mut self, direction: Direction) {
        match direction {
            Direction::Left | Direction::Right => self.dxf = 0,
            Direction::Up | Direction::Down => self.dyf = 0,
            Direction::Stop => {
                self.dxf = 0;
                self.dyf = 0;
            }
            Direction::None => {}
        }
    }

    /// Spends up to one [`SPEED_UNIT`] of `speed` toward `direction` and returns the rest.
    ///
    /// Moving toward `Stop` or `None` drops both accumulators and consumes everything.
    pub fn step(&mut self, direction: Direction, speed: i32) -> i32 {
        let (amount, remaining) = if speed >= SPEED_UNIT {
            (SPEED_UNIT, speed - SPEED_UNIT)
        } else {
            (speed, 0)
        };

        match direction {
            Direction::Left => {
                self.dxf -= amount;
                if self.dxf <= -SPEED_UNIT {
                    self.dxf += SPEED_UNIT;
                    self.shift_horizontal(-1);
                }
            }
            Direction::Right => {
                self.dxf += amount;
                if self.dxf >= SPEED_UNIT {
                    self.dxf -= SPEED_UNIT;
                    self.shift_horizontal(1);
                }
            }
            Direction::Down => {
                self.dyf -= amount;
                if self.dyf <= -SPEED_UNIT {
                    self.dyf += SPEED_UNIT;
                    self.shift_vertical(-1);
                }
            }
            Direction::Up => {
                self.dyf += amount;
                if self.dyf >= SPEED_UNIT {
                    self.dyf -= SPEED_UNIT;
                    self.shift_vertical(1);
                }
            }
            Direction::Stop | Direction::None => {
                self.dxf = 0;
                self.dyf = 0;
                return 0;
            }
        }

        remaining
    }

    fn shift_horizontal(&mut self, dots: i32) {
        self.amount_moved += 1;
        self.dx += dots;
        if self.dx.abs() >= MAZE_UNIT {
            self.column = (self.column + self.dx.signum()).rem_euclid(BOARD_WIDTH);
            self.dx = 0;
        }
    }

    fn shift_vertical(&mut self, dots: i32) {
        self.amount_moved += 1;
        self.dy += dots;
        if self.dy.abs() >= MAZE_UNIT {
            self.row = (self.row + self.dy.signum()).rem_euclid(BOARD_HEIGHT);
            self.dy = 0;
        }
    }
}
