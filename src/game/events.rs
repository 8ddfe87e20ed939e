//! Game Events
//!
//! Events generated during a frame update. The HUD/notification side reads
//! trick names from here; replays compare event streams.

use serde::{Deserialize, Serialize};

/// Priority for event processing order within one frame.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Terminal outcomes first
    Outcome = 0,
    /// Then crashes and recoveries
    Crash = 1,
    /// Then scored tricks
    Trick = 2,
    /// Then takeoffs and landings
    Movement = 3,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Charged jump released while grounded
    Jumped {
        /// Charge at release, [0, 1]
        charge: f32,
        /// Vertical velocity after the launch impulse
        launch_velocity: f32,
    },

    /// Left the ground without jumping (ledge, kicker lip)
    TookOff,

    /// Touched down with acceptable alignment
    Landed {
        /// dot(body up, ground normal)
        alignment: f32,
        /// Seconds spent airborne
        air_time: f32,
    },

    /// A named trick was scored on landing
    TrickLanded {
        /// Trick display name
        name: String,
        /// Points awarded
        points: u32,
        /// Score after award
        total_score: u32,
    },

    /// Failed landing
    Crashed {
        /// dot(body up, ground normal) at touchdown
        alignment: f32,
        /// Lives left after the crash
        lives_remaining: u32,
    },

    /// Crash recovery finished, back on the board
    Recovered,

    /// Last life lost
    Died {
        /// Final score
        score: u32,
    },

    /// Win threshold reached
    Won {
        /// Final score
        score: u32,
    },
}

impl GameEventData {
    /// Processing priority of this kind of event.
    pub fn priority(&self) -> EventPriority {
        match self {
            GameEventData::Died { .. } | GameEventData::Won { .. } => EventPriority::Outcome,
            GameEventData::Crashed { .. } | GameEventData::Recovered => EventPriority::Crash,
            GameEventData::TrickLanded { .. } => EventPriority::Trick,
            GameEventData::Jumped { .. }
            | GameEventData::TookOff
            | GameEventData::Landed { .. } => EventPriority::Movement,
        }
    }
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame when event occurred
    pub frame: u64,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u64, data: GameEventData) -> Self {
        Self {
            frame,
            priority: data.priority(),
            data,
        }
    }

    /// Create jumped event.
    pub fn jumped(frame: u64, charge: f32, launch_velocity: f32) -> Self {
        Self::new(frame, GameEventData::Jumped { charge, launch_velocity })
    }

    /// Create took-off event.
    pub fn took_off(frame: u64) -> Self {
        Self::new(frame, GameEventData::TookOff)
    }

    /// Create landed event.
    pub fn landed(frame: u64, alignment: f32, air_time: f32) -> Self {
        Self::new(frame, GameEventData::Landed { alignment, air_time })
    }

    /// Create trick landed event.
    pub fn trick_landed(frame: u64, name: String, points: u32, total_score: u32) -> Self {
        Self::new(
            frame,
            GameEventData::TrickLanded {
                name,
                points,
                total_score,
            },
        )
    }

    /// Create crashed event.
    pub fn crashed(frame: u64, alignment: f32, lives_remaining: u32) -> Self {
        Self::new(
            frame,
            GameEventData::Crashed {
                alignment,
                lives_remaining,
            },
        )
    }

    /// Create recovered event.
    pub fn recovered(frame: u64) -> Self {
        Self::new(frame, GameEventData::Recovered)
    }

    /// Create died event.
    pub fn died(frame: u64, score: u32) -> Self {
        Self::new(frame, GameEventData::Died { score })
    }

    /// Create won event.
    pub fn won(frame: u64, score: u32) -> Self {
        Self::new(frame, GameEventData::Won { score })
    }

    /// Trick name and points, if this is a trick event.
    pub fn as_trick(&self) -> Option<(&str, u32)> {
        match &self.data {
            GameEventData::TrickLanded { name, points, .. } => Some((name.as_str(), *points)),
            _ => None,
        }
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.priority == other.priority
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: frame, then priority
        self.frame
            .cmp(&other.frame)
            .then(self.priority.cmp(&other.priority))
    }
}
