//! Mock adapters for integration tests.
//!
//! Records every hardware call so tests can assert on the full command
//! history without touching real GPIO/PWM/SPI peripherals.

use embassy_time::Instant;
use phonebox::app::events::AppEvent;
use phonebox::app::ports::{
    ActuatorPort, CalendarPort, ClockPort, ClockReading, Colour, EventSink, FeedbackPort,
    PreconditionPort, Tune,
};
use phonebox::error::{RemoteUnavailable, TimeUnavailable};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Lock,
    Unlock,
    Show(Colour),
    Play(Tune),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub lid_closed: bool,
    pub phone_present: bool,
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Lid shut, phone in the cradle.
    pub fn ready() -> Self {
        Self {
            lid_closed: true,
            phone_present: true,
            calls: Vec::new(),
        }
    }

    pub fn lid_open() -> Self {
        Self {
            lid_closed: false,
            ..Self::ready()
        }
    }

    pub fn count(&self, call: HwCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// Number of calls recorded since `mark`.
    pub fn since(&self, mark: usize) -> &[HwCall] {
        &self.calls[mark..]
    }
}

impl PreconditionPort for MockHardware {
    fn lid_closed(&mut self) -> bool {
        self.lid_closed
    }

    fn phone_present(&mut self) -> bool {
        self.phone_present
    }
}

impl ActuatorPort for MockHardware {
    fn lock(&mut self) {
        self.calls.push(HwCall::Lock);
    }

    fn unlock(&mut self) {
        self.calls.push(HwCall::Unlock);
    }
}

impl FeedbackPort for MockHardware {
    fn show(&mut self, colour: Colour) {
        self.calls.push(HwCall::Show(colour));
    }

    fn play(&mut self, tune: Tune) {
        self.calls.push(HwCall::Play(tune));
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Wall clock and monotonic clock, both set by the test.
pub struct MockClock {
    pub reading: Option<ClockReading>,
    pub uptime_secs: u64,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(hour: u8, minute: u8, weekday: u8) -> Self {
        Self {
            reading: Some(ClockReading::new(hour, minute, weekday)),
            uptime_secs: 0,
        }
    }

    pub fn unsynced() -> Self {
        Self {
            reading: None,
            uptime_secs: 0,
        }
    }

    pub fn set(&mut self, hour: u8, minute: u8, weekday: u8) {
        self.reading = Some(ClockReading::new(hour, minute, weekday));
    }

    pub fn advance(&mut self, secs: u64) {
        self.uptime_secs += secs;
    }
}

impl ClockPort for MockClock {
    fn now(&mut self) -> Result<ClockReading, TimeUnavailable> {
        self.reading.ok_or(TimeUnavailable)
    }

    fn uptime(&self) -> Instant {
        Instant::from_secs(self.uptime_secs)
    }
}

// ── MockCalendar ──────────────────────────────────────────────

pub struct MockCalendar {
    pub answer: Result<bool, RemoteUnavailable>,
    pub queries: usize,
}

impl MockCalendar {
    pub fn answering(answer: Result<bool, RemoteUnavailable>) -> Self {
        Self { answer, queries: 0 }
    }
}

impl CalendarPort for MockCalendar {
    fn query(&mut self) -> Result<bool, RemoteUnavailable> {
        self.queries += 1;
        self.answer
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
