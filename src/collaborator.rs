//! Ports to the presentation layer.
//!
//! The simulation never draws or plays anything itself. It reports what should be
//! shown and heard through [`Renderer`] and [`AudioSink`], fire-and-forget; nothing
//! these calls return feeds back into the game logic except the intermission status.

use std::sync::Arc;

use glam::IVec2;
use parking_lot::Mutex;
use strum_macros::{Display, IntoStaticStr};

use crate::constants::Tile;
use crate::entity::actor::ActorKind;
use crate::entity::item::FruitKind;
use crate::entity::pts::ScorePts;
use crate::map::direction::Direction;

/// How an actor should look this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    /// Animated while moving in the given direction.
    Walking(Direction),
    /// Still frame facing the given direction.
    Stopped(Direction),
    Frightened { blinking_on: bool },
    /// Eyes only, heading back to the nest.
    Escaping(Direction),
    Fruit(FruitKind),
    Pts(ScorePts),
    /// The player's death animation.
    Disappearing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WallColor {
    Blue,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PowerFeedState {
    Clear,
    Stop,
    Blinking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Message {
    PlayerOneReady,
    Ready,
    ClearPlayerOne,
    ClearReady,
    GameOver,
}

/// Drawing port. Positions are pixel coordinates of the actor's centre.
pub trait Renderer {
    fn draw_actor(&mut self, kind: ActorKind, pixel: IVec2, appearance: Appearance);
    fn clear_actor(&mut self, kind: ActorKind);
    fn set_depth(&mut self, kind: ActorKind, depth: i32);
    fn draw_tile(&mut self, column: i32, row: i32, tile: Tile);
    fn draw_maze_wall(&mut self, color: WallColor);
    fn print_message(&mut self, message: Message);

    fn draw_power_feeds(&mut self, _state: PowerFeedState) {}

    /// Starts cutscene `number` (1-based).
    fn start_intermission(&mut self, _number: u8) {}

    /// The round sequencer waits while this returns true.
    fn is_intermission_running(&mut self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum SoundEffect {
    EatFeed,
    EatFruit,
    EatGhost,
    Miss,
    ExtraPacman,
    Beginning,
    Intermission,
}

/// Looping background tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Bgm {
    Normal,
    Spurt1,
    Spurt2,
    Spurt3,
    Spurt4,
    Power,
    Escaping,
}

/// Audio port.
pub trait AudioSink {
    fn play_effect(&mut self, effect: SoundEffect);
    /// Starts a looping track. Asking for the track already playing keeps it going.
    fn play_bgm(&mut self, bgm: Bgm);
    fn stop_bgm(&mut self);
    /// Mutes or unmutes every later call.
    fn set_output(&mut self, enabled: bool);
}

/// A renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_actor(&mut self, _kind: ActorKind, _pixel: IVec2, _appearance: Appearance) {}
    fn clear_actor(&mut self, _kind: ActorKind) {}
    fn set_depth(&mut self, _kind: ActorKind, _depth: i32) {}
    fn draw_tile(&mut self, _column: i32, _row: i32, _tile: Tile) {}
    fn draw_maze_wall(&mut self, _color: WallColor) {}
    fn print_message(&mut self, _message: Message) {}
}

/// An audio sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_effect(&mut self, _effect: SoundEffect) {}
    fn play_bgm(&mut self, _bgm: Bgm) {}
    fn stop_bgm(&mut self) {}
    fn set_output(&mut self, _enabled: bool) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCall {
    DrawActor(ActorKind, IVec2, Appearance),
    ClearActor(ActorKind),
    SetDepth(ActorKind, i32),
    DrawTile(i32, i32, Tile),
    DrawMazeWall(WallColor),
    PrintMessage(Message),
    DrawPowerFeeds(PowerFeedState),
    StartIntermission(u8),
}

/// A renderer that records every call. Clones share the same log, so a test can keep
/// one handle while the game owns another.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn draw_actor(&mut self, kind: ActorKind, pixel: IVec2, appearance: Appearance) {
        self.record(RenderCall::DrawActor(kind, pixel, appearance));
    }

    fn clear_actor(&mut self, kind: ActorKind) {
        self.record(RenderCall::ClearActor(kind));
    }

    fn set_depth(&mut self, kind: ActorKind, depth: i32) {
        self.record(RenderCall::SetDepth(kind, depth));
    }

    fn draw_tile(&mut self, column: i32, row: i32, tile: Tile) {
        self.record(RenderCall::DrawTile(column, row, tile));
    }

    fn draw_maze_wall(&mut self, color: WallColor) {
        self.record(RenderCall::DrawMazeWall(color));
    }

    fn print_message(&mut self, message: Message) {
        self.record(RenderCall::PrintMessage(message));
    }

    fn draw_power_feeds(&mut self, state: PowerFeedState) {
        self.record(RenderCall::DrawPowerFeeds(state));
    }

    fn start_intermission(&mut self, number: u8) {
        self.record(RenderCall::StartIntermission(number));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Effect(SoundEffect),
    Bgm(Bgm),
    StopBgm,
    Output(bool),
}

/// An audio sink that records every call, sharing its log between clones.
///
/// Only changes of the looping track are recorded, mirroring how a real sink ignores a
/// request for the track already playing.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    calls: Arc<Mutex<Vec<AudioCall>>>,
    playing: Arc<Mutex<Option<Bgm>>>,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().clone()
    }

    pub fn effects(&self) -> Vec<SoundEffect> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                AudioCall::Effect(effect) => Some(*effect),
                _ => None,
            })
            .collect()
    }

    pub fn playing(&self) -> Option<Bgm> {
        *self.playing.lock()
    }
}

impl AudioSink for RecordingAudio {
    fn play_effect(&mut self, effect: SoundEffect) {
        self.calls.lock().push(AudioCall::Effect(effect));
    }

    fn play_bgm(&mut self, bgm: Bgm) {
        let mut playing = self.playing.lock();
        if *playing != Some(bgm) {
            *playing = Some(bgm);
            self.calls.lock().push(AudioCall::Bgm(bgm));
        }
    }

    fn stop_bgm(&mut self) {
        *self.playing.lock() = None;
        self.calls.lock().push(AudioCall::StopBgm);
    }

    fn set_output(&mut self, enabled: bool) {
        self.calls.lock().push(AudioCall::Output(enabled));
    }
}
