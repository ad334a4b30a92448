//! This module defines the maze grid and the movement primitives shared by every actor.

pub mod direction;
pub mod maze;
pub mod parser;
pub mod position;
