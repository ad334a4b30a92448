//! Deterministic simulation core of a maze-chase arcade game.
//!
//! The [`game::Game`] driver advances the world in fixed 16 ms frames. Drawing and
//! sound are delegated to the [`collaborator::Renderer`] and
//! [`collaborator::AudioSink`] traits so the core runs headless.

pub mod collaborator;
pub mod constants;
pub mod deferred;
pub mod entity;
pub mod error;
pub mod formatter;
pub mod game;
pub mod map;
pub mod profiling;
pub mod timer;
