//! Sound cue dispatch
//!
//! The simulation only names sounds. Playback belongs to whatever sink the
//! host plugs in; calls are fire-and-forget and never feed back into a run.

use serde::{Deserialize, Serialize};

use crate::sim::state::GameEvent;

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Land,
    /// Player took damage
    Hit,
    Pickup,
    Stomp,
    /// Boss announces itself
    BossRoar,
    Victory,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Land => "land",
            SoundCue::Hit => "hit",
            SoundCue::Pickup => "pickup",
            SoundCue::Stomp => "stomp",
            SoundCue::BossRoar => "boss_roar",
            SoundCue::Victory => "victory",
        }
    }
}

/// Anything that can play a named cue
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that logs cues instead of playing them
#[derive(Debug, Default)]
pub struct LogSink {
    muted: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl SoundSink for LogSink {
    fn play(&mut self, cue: SoundCue) {
        if !self.muted {
            log::trace!("sound: {}", cue.as_str());
        }
    }
}

/// Collects cues; handy for hosts that batch playback
impl SoundSink for Vec<SoundCue> {
    fn play(&mut self, cue: SoundCue) {
        self.push(cue);
    }
}

/// Forward every sound event to `sink`. Returns how many cues were played.
pub fn dispatch<'a>(
    events: impl IntoIterator<Item = &'a GameEvent>,
    sink: &mut dyn SoundSink,
) -> usize {
    let mut played = 0;
    for event in events {
        if let GameEvent::Sound(cue) = event {
            sink.play(*cue);
            played += 1;
        }
    }
    played
}
