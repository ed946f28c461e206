//! Two-phase page-turn state machine.
//!
//! A flip first runs a *leaving* phase where the outgoing spread animates
//! out, then an *entering* phase where the target spread animates in. The
//! spread index switches to the target at the phase boundary. Only one flip
//! can be in flight; navigation requests while not idle are dropped.
//!
//! Time is passed in as milliseconds so the machine can be driven by a fake
//! clock in tests.

/// Length of each flip phase in milliseconds.
pub const FLIP_PHASE_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    Forward,
    Backward,
}

impl FlipDirection {
    /// Target spread index from `current`, or `None` past either end.
    pub const fn target(self, current: usize, total_spreads: usize) -> Option<usize> {
        match self {
            Self::Forward if current + 1 < total_spreads => Some(current + 1),
            Self::Backward if current > 0 && current < total_spreads => Some(current - 1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPhase {
    Idle,
    Leaving(FlipDirection),
    Entering(FlipDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Leaving,
    Entering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    direction: FlipDirection,
    stage: Stage,
    target: usize,
    stage_started_ms: u64,
}

/// Result of advancing the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipTick {
    /// Set when the leaving phase ended; the caller must show this spread.
    pub turned_to: Option<usize>,
    /// Set when the entering phase ended and the machine is idle again.
    pub settled: bool,
}

impl FlipTick {
    pub const fn changed(&self) -> bool {
        self.turned_to.is_some() || self.settled
    }
}

#[derive(Debug, Clone)]
pub struct FlipAnimator {
    phase_ms: u64,
    transition: Option<Transition>,
}

impl Default for FlipAnimator {
    fn default() -> Self {
        Self::new(FLIP_PHASE_MS)
    }
}

impl FlipAnimator {
    pub const fn new(phase_ms: u64) -> Self {
        Self {
            phase_ms,
            transition: None,
        }
    }

    pub const fn phase_ms(&self) -> u64 {
        self.phase_ms
    }

    pub const fn phase(&self) -> FlipPhase {
        match self.transition {
            None => FlipPhase::Idle,
            Some(Transition {
                direction,
                stage: Stage::Leaving,
                ..
            }) => FlipPhase::Leaving(direction),
            Some(Transition {
                direction,
                stage: Stage::Entering,
                ..
            }) => FlipPhase::Entering(direction),
        }
    }

    pub const fn is_idle(&self) -> bool {
        self.transition.is_none()
    }

    /// Spread the running flip is heading to.
    pub fn target(&self) -> Option<usize> {
        self.transition.map(|t| t.target)
    }

    /// Start a flip from `current`. Returns `false` when the request is
    /// dropped because a flip is running or the target is out of bounds.
    pub fn navigate(
        &mut self,
        direction: FlipDirection,
        current: usize,
        total_spreads: usize,
        now_ms: u64,
    ) -> bool {
        if self.transition.is_some() {
            return false;
        }
        let Some(target) = direction.target(current, total_spreads) else {
            return false;
        };
        self.transition = Some(Transition {
            direction,
            stage: Stage::Leaving,
            target,
            stage_started_ms: now_ms,
        });
        true
    }

    /// Apply every phase boundary reached by `now_ms`.
    ///
    /// Each boundary is measured from the previous one, so a late tick lands
    /// in the same state as a sequence of punctual ones.
    pub fn tick(&mut self, now_ms: u64) -> FlipTick {
        let mut result = FlipTick::default();
        while let Some(mut transition) = self.transition {
            let deadline = transition.stage_started_ms.saturating_add(self.phase_ms);
            if now_ms < deadline {
                break;
            }
            match transition.stage {
                Stage::Leaving => {
                    transition.stage = Stage::Entering;
                    transition.stage_started_ms = deadline;
                    result.turned_to = Some(transition.target);
                    self.transition = Some(transition);
                }
                Stage::Entering => {
                    self.transition = None;
                    result.settled = true;
                }
            }
        }
        result
    }

    /// Fraction of the current phase elapsed, in `[0, 1]`. Idle reports 0.
    pub fn progress(&self, now_ms: u64) -> f32 {
        let Some(transition) = self.transition else {
            return 0.0;
        };
        if self.phase_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(transition.stage_started_ms);
        #[allow(clippy::cast_precision_loss)]
        let fraction = elapsed as f32 / self.phase_ms as f32;
        fraction.clamp(0.0, 1.0)
    }

    /// When the next phase boundary falls, for sizing the event poll.
    pub fn next_deadline(&self) -> Option<u64> {
        self.transition
            .map(|t| t.stage_started_ms.saturating_add(self.phase_ms))
    }

    /// Drop any running flip without turning.
    pub const fn cancel(&mut self) {
        self.transition = None;
    }
}
