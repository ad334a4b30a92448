use strum_macros::{Display, IntoStaticStr};

use crate::deferred::Deferred;

/// Steps of the round sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
pub enum Sequence {
    #[default]
    Init,
    /// Attract mode setup.
    Demo,
    Start,
    Ready,
    Go,
    Updating,
    /// Resumes play after the pause that follows eating a ghost.
    ReturnToUpdating,
    RoundClear,
    PrepareFlashMaze,
    FlashMaze,
    Intermission,
    PlayerMiss,
    PlayerDisappeared,
    PlayerRestart,
    GameOver,
}

impl Sequence {
    /// Steps during which the player is in control of the round.
    pub fn is_playing(&self) -> bool {
        matches!(self, Sequence::Updating | Sequence::ReturnToUpdating)
    }
}

/// The running sequence step plus any step scheduled to follow it.
pub type SequenceState = Deferred<Sequence>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_step_waits_out_its_delay() {
        let mut state = SequenceState::default();
        state.schedule(Sequence::Start, 0);
        assert_eq!(state.get(), Sequence::Start);

        state.schedule(Sequence::Ready, 48);
        let polls: Vec<bool> = (0..4).map(|_| state.poll(16)).collect();
        assert_eq!(polls, vec![false, false, false, true]);
        assert_eq!(state.get(), Sequence::Ready);
    }
}
