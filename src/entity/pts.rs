//! Floating score popups.

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};

use crate::collaborator::Appearance;
use crate::entity::actor::{Actor, ActorBody, ActorDelegate, ActorEvent, ActorKind, Frame};
use crate::map::position::Position;
use crate::timer::CountdownTimer;

/// Size of the popup pool.
pub const POPUP_POOL_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum ScorePts {
    Pts100,
    Pts200,
    Pts300,
    Pts400,
    Pts500,
    Pts700,
    Pts800,
    Pts1000,
    Pts1600,
    Pts2000,
    Pts3000,
    Pts5000,
    #[default]
    Pts0,
}

impl ScorePts {
    pub fn score(self) -> u32 {
        match self {
            ScorePts::Pts100 => 100,
            ScorePts::Pts200 => 200,
            ScorePts::Pts300 => 300,
            ScorePts::Pts400 => 400,
            ScorePts::Pts500 => 500,
            ScorePts::Pts700 => 700,
            ScorePts::Pts800 => 800,
            ScorePts::Pts1000 => 1000,
            ScorePts::Pts1600 => 1600,
            ScorePts::Pts2000 => 2000,
            ScorePts::Pts3000 => 3000,
            ScorePts::Pts5000 => 5000,
            ScorePts::Pts0 => 0,
        }
    }

    /// Next step of the ghost-eating chain. Values off the chain stay put.
    pub fn doubled(self) -> Self {
        match self {
            ScorePts::Pts100 => ScorePts::Pts200,
            ScorePts::Pts200 => ScorePts::Pts400,
            ScorePts::Pts400 => ScorePts::Pts800,
            ScorePts::Pts800 => ScorePts::Pts1600,
            other => other,
        }
    }
}

/// One popup, shown for a fixed time at a fixed spot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePopup {
    body: ActorBody,
    pts: ScorePts,
    timer: CountdownTimer,
}

impl ScorePopup {
    fn new(slot: u8) -> Self {
        Self {
            body: ActorBody::new(ActorKind::ScorePts(slot)),
            pts: ScorePts::Pts0,
            timer: CountdownTimer::default(),
        }
    }

    pub fn pts(&self) -> ScorePts {
        self.pts
    }

    fn show(&mut self, pts: ScorePts, position: Position, time: u32) {
        self.pts = pts;
        self.body.position = position;
        self.timer.set(time);
        self.timer.start();
        self.start();
    }

    fn retire(&mut self) {
        self.stop();
        self.hide();
        self.timer.reset();
    }
}

impl Actor for ScorePopup {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn reset(&mut self, _delegate: &dyn ActorDelegate) {
        self.body.reset();
        self.body.visible = false;
        self.timer.reset();
    }

    fn update(&mut self, frame: &mut Frame<'_>) -> Option<ActorEvent> {
        self.timer.update(frame.interval);
        if self.timer.is_fired() {
            self.retire();
        }
        None
    }

    fn appearance(&self) -> Appearance {
        Appearance::Pts(self.pts)
    }
}

/// Pool of score popups. When every slot is busy the oldest popup is recycled.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePtsManager {
    popups: [ScorePopup; POPUP_POOL_SIZE],
    /// Slots in start order, oldest first.
    active: SmallVec<[usize; POPUP_POOL_SIZE]>,
}

impl Default for ScorePtsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScorePtsManager {
    pub fn new() -> Self {
        Self {
            popups: std::array::from_fn(|slot| ScorePopup::new(slot as u8)),
            active: SmallVec::new(),
        }
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn reset(&mut self, delegate: &dyn ActorDelegate) {
        for popup in &mut self.popups {
            popup.reset(delegate);
        }
        self.active.clear();
    }

    /// Shows `pts` at `position` for `time` milliseconds.
    pub fn start(&mut self, pts: ScorePts, position: Position, time: u32) {
        let slot = match (0..POPUP_POOL_SIZE).find(|slot| !self.active.contains(slot)) {
            Some(slot) => slot,
            None => {
                let oldest = self.active.remove(0);
                self.popups[oldest].retire();
                oldest
            }
        };

        self.popups[slot].show(pts, position, time);
        self.active.push(slot);
    }

    pub fn update(&mut self, frame: &mut Frame<'_>) {
        for &slot in &self.active {
            self.popups[slot].update(frame);
        }
        let popups = &self.popups;
        self.active.retain(|slot| popups[*slot].is_enabled());
    }

    pub fn stop(&mut self) {
        for slot in self.active.drain(..) {
            self.popups[slot].retire();
        }
    }
}
