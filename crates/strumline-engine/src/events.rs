//! Instrument events.
//!
//! The controller is the only writer. Any number of readers subscribe and get
//! their own unbounded channel; a reader that drops its receiver is removed on
//! the next publish.

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

/// Registry id of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StringId(pub u32);

/// Registry id of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PointId(pub u32);

/// What a press picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrabTarget {
    /// The pitch end of a string.
    StringOrigin(StringId),
    /// The circle center of a string.
    StringCenter(StringId),
    /// A plucker point.
    Point(PointId),
}

/// Something that happened to an instrument this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InstrumentEvent {
    /// A string's pitch class was recomputed.
    PitchChanged {
        /// Source string.
        string: StringId,
        /// Continuous pitch class in `[0, 12)`.
        pitch_class: f32,
    },
    /// A string's octave was recomputed.
    OctaveChanged {
        /// Source string.
        string: StringId,
        /// Continuous octave in `[3, 7]`.
        octave: f32,
    },
    /// A string started a note.
    NotePlayed {
        /// Source string.
        string: StringId,
        /// Frequency of the note.
        frequency_hz: f64,
        /// Note name such as `D#5`.
        note: String,
    },
    /// A point played its click.
    Clicked {
        /// Source point.
        point: PointId,
    },
    /// The pointer grabbed an anchor.
    Grabbed {
        /// What was grabbed.
        target: GrabTarget,
    },
    /// The pointer let go.
    Released {
        /// What was released.
        target: GrabTarget,
    },
}

/// A change a string reports before the controller knows its id.
#[derive(Debug, Clone, PartialEq)]
pub enum StringNotice {
    /// Pitch class recomputed.
    PitchChanged(f32),
    /// Octave recomputed.
    OctaveChanged(f32),
    /// Note started.
    NotePlayed {
        /// Frequency of the note.
        frequency_hz: f64,
        /// Note name.
        note: String,
    },
}

impl StringNotice {
    /// Tags the notice with its string.
    pub fn into_event(self, string: StringId) -> InstrumentEvent {
        match self {
            StringNotice::PitchChanged(pitch_class) => InstrumentEvent::PitchChanged {
                string,
                pitch_class,
            },
            StringNotice::OctaveChanged(octave) => {
                InstrumentEvent::OctaveChanged { string, octave }
            }
            StringNotice::NotePlayed { frequency_hz, note } => InstrumentEvent::NotePlayed {
                string,
                frequency_hz,
                note,
            },
        }
    }
}

/// Fan-out of events to subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<InstrumentEvent>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new subscription.
    pub fn subscribe(&mut self) -> Receiver<InstrumentEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `event` to every live subscriber.
    pub fn publish(&mut self, event: InstrumentEvent) {
        log::trace!(target: "strumline::events", "{:?}", event);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
