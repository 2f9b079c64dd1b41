//! Fakes for the hardware seams, all driven by one virtual clock.
//!
//! Nothing here sleeps: a delay just moves virtual time forward, so a ten minute menu session runs
//! in microseconds and every timing assertion is exact.
extern crate std;

use crate::buttons::{Button, ButtonPins};
use crate::clock::{ClockProvider, ClockTime};
use crate::display::{FontSize, TextSurface};
use crate::environment::{EnvironmentSensor, Reading};
use crate::error::{Error, Result};
use crate::sound::ToneOutput;
use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

/// A runaway loop in a test fails instead of hanging.
const HORIZON_MS: u64 = 48 * 60 * 60 * 1000;

/// How long a queued press stays down
const QUEUED_PRESS_MS: u64 = 50;

/// Shared virtual time in nanoseconds
#[derive(Clone, Default)]
pub struct VirtualTime(Rc<Cell<u64>>);

impl VirtualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_ns(ms * 1_000_000);
    }

    fn advance_ns(&self, ns: u64) {
        let now = self.0.get() + ns;
        assert!(now / 1_000_000 < HORIZON_MS, "virtual time ran past the test horizon");
        self.0.set(now);
    }
}

/// `DelayNs` that only advances virtual time
#[derive(Clone)]
pub struct VirtualDelay {
    time: VirtualTime,
}

impl VirtualDelay {
    pub fn new(time: &VirtualTime) -> Self {
        Self { time: time.clone() }
    }
}

impl DelayNs for VirtualDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.time.advance_ns(u64::from(ns));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.time.advance_ms(u64::from(ms));
    }
}

/// Presses either pinned to a virtual time window or queued to happen as soon as someone looks.
struct ButtonScript {
    time: VirtualTime,
    /// (button, from, until) in ms
    held: Vec<(Button, u64, u64)>,
    /// Presses that start the next time any pin is sampled while no queued press is down
    queued: VecDeque<Button>,
    /// The queued press currently down and when it is released
    active: Option<(Button, u64)>,
}

impl ButtonScript {
    fn is_down(&mut self, button: Button) -> bool {
        let now = self.time.now_ms();
        if self
            .held
            .iter()
            .any(|&(held, from, until)| held == button && (from..until).contains(&now))
        {
            return true;
        }
        if let Some((_, until)) = self.active {
            if now >= until {
                self.active = None;
            }
        }
        if self.active.is_none() {
            if let Some(next) = self.queued.pop_front() {
                self.active = Some((next, now + QUEUED_PRESS_MS));
            }
        }
        self.active.is_some_and(|(active, _)| active == button)
    }
}

#[derive(Clone)]
pub struct ScriptedButtons(Rc<RefCell<ButtonScript>>);

impl ScriptedButtons {
    pub fn new(time: &VirtualTime) -> Self {
        Self(Rc::new(RefCell::new(ButtonScript {
            time: time.clone(),
            held: Vec::new(),
            queued: VecDeque::new(),
            active: None,
        })))
    }

    /// Hold `button` down from `from_ms` until just before `until_ms`
    pub fn hold(&self, button: Button, from_ms: u64, until_ms: u64) {
        self.0.borrow_mut().held.push((button, from_ms, until_ms));
    }

    /// Queue presses that happen one after another whenever the device is polling
    pub fn queue(&self, buttons: impl IntoIterator<Item = Button>) {
        self.0.borrow_mut().queued.extend(buttons);
    }

    /// Queued presses nobody has seen yet
    pub fn pending(&self) -> usize {
        self.0.borrow().queued.len()
    }

    pub fn pins(&self) -> ButtonPins<FakeButtonPin> {
        let pin = |button| FakeButtonPin {
            button,
            script: self.clone(),
        };
        ButtonPins {
            up: pin(Button::Up),
            down: pin(Button::Down),
            ok: pin(Button::Ok),
            cancel: pin(Button::Cancel),
        }
    }
}

pub struct FakeButtonPin {
    button: Button,
    script: ScriptedButtons,
}

impl ErrorType for FakeButtonPin {
    type Error = Infallible;
}

impl InputPin for FakeButtonPin {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self.script.0.borrow_mut().is_down(self.button))
    }
}

/// A clock that runs with virtual time from a settable starting point
#[derive(Clone)]
pub struct FakeClock {
    time: VirtualTime,
    day: Rc<Cell<u8>>,
    /// Local time of day in ms at virtual time zero
    base_ms: Rc<Cell<i64>>,
    failing: Rc<Cell<bool>>,
}

impl FakeClock {
    pub fn new(time: &VirtualTime, start: ClockTime) -> Self {
        let clock = Self {
            time: time.clone(),
            day: Rc::new(Cell::new(start.day)),
            base_ms: Rc::new(Cell::new(0)),
            failing: Rc::new(Cell::new(false)),
        };
        clock.jump_to(start.hour, start.minute, start.second);
        clock
    }

    /// Make the clock show `hour:minute:second` right now
    pub fn jump_to(&self, hour: u8, minute: u8, second: u8) {
        let target =
            (i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second)) * 1000;
        let now = i64::try_from(self.time.now_ms()).unwrap();
        self.base_ms.set(target - now);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl ClockProvider for FakeClock {
    fn now(&mut self) -> Result<ClockTime> {
        if self.failing.get() {
            return Err(Error::NoTimeAvailable);
        }
        let ms = self.base_ms.get() + i64::try_from(self.time.now_ms()).unwrap();
        let seconds = (ms / 1000).rem_euclid(24 * 3600);
        Ok(ClockTime::new(
            self.day.get(),
            u8::try_from(seconds / 3600).unwrap(),
            u8::try_from(seconds / 60 % 60).unwrap(),
            u8::try_from(seconds % 60).unwrap(),
        ))
    }

    fn set_time(&mut self, hour: u8, minute: u8) -> Result<()> {
        if self.failing.get() {
            return Err(Error::NoTimeAvailable);
        }
        self.jump_to(hour, minute, 0);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Clear,
    Print {
        text: String,
        x: i32,
        y: i32,
        size: FontSize,
    },
}

/// Text surface that records everything drawn on it
#[derive(Clone, Default)]
pub struct RecordingSurface(Rc<RefCell<Vec<SurfaceOp>>>);

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text ever printed, in order
    pub fn printed(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Print { text, .. } => Some(text.clone()),
                SurfaceOp::Clear => None,
            })
            .collect()
    }

    /// What is on screen: the prints since the last clear
    pub fn visible(&self) -> Vec<SurfaceOp> {
        let ops = self.0.borrow();
        let start = ops
            .iter()
            .rposition(|op| *op == SurfaceOp::Clear)
            .map_or(0, |i| i + 1);
        ops[start..].to_vec()
    }

    pub fn visible_texts(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .filter_map(|op| match op {
                SurfaceOp::Print { text, .. } => Some(text),
                SurfaceOp::Clear => None,
            })
            .collect()
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.0.borrow().clone()
    }

    pub fn reset(&self) {
        self.0.borrow_mut().clear();
    }
}

impl TextSurface for RecordingSurface {
    async fn clear(&mut self) -> Result<()> {
        self.0.borrow_mut().push(SurfaceOp::Clear);
        Ok(())
    }

    async fn print(&mut self, text: &str, x: i32, y: i32, size: FontSize) -> Result<()> {
        self.0.borrow_mut().push(SurfaceOp::Print {
            text: text.to_string(),
            x,
            y,
            size,
        });
        Ok(())
    }
}

/// Records (virtual ms, Some(frequency) | None for silence)
#[derive(Clone)]
pub struct RecordingTone {
    time: VirtualTime,
    events: Rc<RefCell<Vec<(u64, Option<u32>)>>>,
}

impl RecordingTone {
    pub fn new(time: &VirtualTime) -> Self {
        Self {
            time: time.clone(),
            events: Rc::default(),
        }
    }

    pub fn events(&self) -> Vec<(u64, Option<u32>)> {
        self.events.borrow().clone()
    }

    /// Frequencies in the order they were started
    pub fn notes(&self) -> Vec<u32> {
        self.events.borrow().iter().filter_map(|&(_, f)| f).collect()
    }

    pub fn is_silent(&self) -> bool {
        self.events.borrow().last().is_none_or(|&(_, f)| f.is_none())
    }
}

impl ToneOutput for RecordingTone {
    fn set_tone(&mut self, frequency_hz: u32) {
        self.events
            .borrow_mut()
            .push((self.time.now_ms(), Some(frequency_hz)));
    }

    fn stop_tone(&mut self) {
        self.events.borrow_mut().push((self.time.now_ms(), None));
    }
}

/// Output pin that records its level changes as (virtual ms, level)
#[derive(Clone)]
pub struct RecordingPin {
    time: VirtualTime,
    levels: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl RecordingPin {
    pub fn new(time: &VirtualTime) -> Self {
        Self {
            time: time.clone(),
            levels: Rc::default(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.levels.borrow().last().is_some_and(|&(_, high)| high)
    }

    pub fn levels(&self) -> Vec<(u64, bool)> {
        self.levels.borrow().clone()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.levels.borrow_mut().push((self.time.now_ms(), false));
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.levels.borrow_mut().push((self.time.now_ms(), true));
        Ok(())
    }
}

/// Sensor that answers from a script and repeats the last answer once the script runs out
#[derive(Clone)]
pub struct ScriptedSensor {
    answers: Rc<RefCell<VecDeque<Result<Reading>>>>,
    last: Rc<Cell<Result<Reading>>>,
}

impl ScriptedSensor {
    pub fn new(initial: Result<Reading>) -> Self {
        Self {
            answers: Rc::default(),
            last: Rc::new(Cell::new(initial)),
        }
    }

    pub fn push(&self, answer: Result<Reading>) {
        self.answers.borrow_mut().push_back(answer);
    }

    pub fn set(&self, answer: Result<Reading>) {
        self.answers.borrow_mut().clear();
        self.last.set(answer);
    }
}

impl EnvironmentSensor for ScriptedSensor {
    async fn poll(&mut self) -> Result<Reading> {
        if let Some(answer) = self.answers.borrow_mut().pop_front() {
            self.last.set(answer);
        }
        self.last.get()
    }
}
