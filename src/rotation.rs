//! Display-side replication and slide rotation.
//!
//! The status board never writes. It re-reads the persisted document on
//! one fixed cadence and rotates through its slides on another; both
//! periodic actions hang off a single state machine so a display
//! session can start and stop them deterministically — and so tests can
//! drive the clock tick by tick instead of sleeping.

use crate::model::BoardDocument;

/// How often the display re-fetches the document.
pub const POLL_INTERVAL_MS: u64 = 2_000;

/// How long each slide stays up.
pub const ROTATION_INTERVAL_MS: u64 = 15_000;

/// Slides: 0 well/EDS, 1 route/latch, 2 fleet, 3 equip/cargo,
/// 4 weather/flights.
pub const SLIDE_COUNT: usize = 5;

/// The one slide that is skipped when it would be empty.
pub const WEATHER_SLIDE: usize = 4;

/// Read side of the persistence gateway.
pub trait DocumentSource {
    /// Fetches the document for an identity, falling back to defaults
    /// when nothing usable is stored. Never fails.
    fn fetch(&self, identity: Option<&str>) -> BoardDocument;
}

/// What a call to [`Rotation::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    /// The snapshot was replaced from the gateway.
    pub polled: bool,

    /// The slide index changed; the progress indicator restarts.
    pub advanced: bool,
}

/// The display session's state machine.
pub struct Rotation {
    identity: Option<String>,
    snapshot: BoardDocument,
    slide: usize,
    since_poll: u64,
    since_advance: u64,
    active: bool,
}

impl Rotation {
    /// Starts a display session with an immediate fetch.
    pub fn start(source: &impl DocumentSource, identity: Option<String>) -> Self {
        let snapshot = source.fetch(identity.as_deref());
        Self {
            identity,
            snapshot,
            slide: 0,
            since_poll: 0,
            since_advance: 0,
            active: true,
        }
    }

    /// Tears the session down. Subsequent ticks do nothing: neither
    /// periodic action survives deactivation.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn slide(&self) -> usize {
        self.slide
    }

    pub fn snapshot(&self) -> &BoardDocument {
        &self.snapshot
    }

    /// Advances the clock, firing each periodic action as many times as
    /// its period elapsed. Poll and advance run on independent clocks.
    pub fn tick(&mut self, source: &impl DocumentSource, elapsed_ms: u64) -> Tick {
        let mut tick = Tick::default();
        if !self.active {
            return tick;
        }

        self.since_poll += elapsed_ms;
        while self.since_poll >= POLL_INTERVAL_MS {
            self.since_poll -= POLL_INTERVAL_MS;
            self.poll(source);
            tick.polled = true;
        }

        self.since_advance += elapsed_ms;
        while self.since_advance >= ROTATION_INTERVAL_MS {
            self.since_advance -= ROTATION_INTERVAL_MS;
            if self.advance(source) {
                tick.advanced = true;
            }
        }

        tick
    }

    /// Wholesale snapshot replacement: the last poll always wins, no
    /// merging, no diffing.
    pub fn poll(&mut self, source: &impl DocumentSource) {
        self.snapshot = source.fetch(self.identity.as_deref());
    }

    /// Moves to the next slide. An advance that would land on the
    /// weather/flights slide first re-fetches the document — the cached
    /// snapshot may predate content cleared since the last poll — and
    /// redirects to slide 0 when the fresh read shows neither a weather
    /// image nor any flights. The fresh read only feeds this gate; it
    /// is not installed as the snapshot.
    ///
    /// Returns whether the slide index changed.
    pub fn advance(&mut self, source: &impl DocumentSource) -> bool {
        let mut next = (self.slide + 1) % SLIDE_COUNT;
        if next == WEATHER_SLIDE {
            let fresh = source.fetch(self.identity.as_deref());
            if !fresh.has_weather_image() && !fresh.has_flights() {
                next = 0;
            }
        }
        let changed = next != self.slide;
        self.slide = next;
        changed
    }
}
