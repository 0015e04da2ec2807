//! Recording test doubles for the engine's collaborators.
//!
//! Doubles that take part in timing-sensitive sequences share one trace log,
//! so tests can assert on the interleaving of delays, bus traffic and resets.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use elysion_core::traits::{EncoderDriver, EventSink};
use elysion_core::ChangeEvent;
use elysion_hal::{AnalogInput, BusTransport, DigitalIo, IdentityStore, PinMode, SystemControl};
use embedded_hal::delay::DelayNs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
    Begin(Option<u8>),
    Request(u8),
    Send(u8, Vec<u8>),
    StoreWrite(u8, u8),
    Reset,
}

pub type TraceLog = Rc<RefCell<Vec<Trace>>>;

pub fn trace_log() -> TraceLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct MockDelay {
    pub log: TraceLog,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Trace::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Trace::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Trace::DelayMs(ms));
    }
}

pub struct MockBus {
    pub log: TraceLog,
    pub replies: VecDeque<Result<Vec<u8>, ()>>,
    pub fail_begin: bool,
}

impl MockBus {
    pub fn new(log: &TraceLog) -> Self {
        Self {
            log: log.clone(),
            replies: VecDeque::new(),
            fail_begin: false,
        }
    }

    pub fn replying(log: &TraceLog, reply: Result<Vec<u8>, ()>) -> Self {
        let mut bus = Self::new(log);
        bus.replies.push_back(reply);
        bus
    }
}

impl BusTransport for MockBus {
    type Error = ();

    fn begin(&mut self, address: Option<u8>) -> Result<(), ()> {
        self.log.borrow_mut().push(Trace::Begin(address));
        if self.fail_begin {
            Err(())
        } else {
            Ok(())
        }
    }

    fn request(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, ()> {
        self.log.borrow_mut().push(Trace::Request(address));
        let reply = self.replies.pop_front().unwrap_or(Err(()))?;
        let n = reply.len().min(buf.len());
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(n)
    }

    fn send(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
        self.log.borrow_mut().push(Trace::Send(address, data.to_vec()));
        Ok(())
    }
}

pub struct MockStore {
    pub log: TraceLog,
    pub slots: HashMap<u8, u8>,
    pub fail_read: bool,
    pub fail_write: bool,
}

impl MockStore {
    /// Store holding `address` in slot 0
    pub fn holding(log: &TraceLog, address: u8) -> Self {
        Self {
            log: log.clone(),
            slots: HashMap::from([(0, address)]),
            fail_read: false,
            fail_write: false,
        }
    }
}

impl IdentityStore for MockStore {
    type Error = ();

    fn read_byte(&mut self, slot: u8) -> Result<u8, ()> {
        if self.fail_read {
            return Err(());
        }
        Ok(self.slots.get(&slot).copied().unwrap_or(0xFF))
    }

    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), ()> {
        self.log.borrow_mut().push(Trace::StoreWrite(slot, value));
        if self.fail_write {
            return Err(());
        }
        self.slots.insert(slot, value);
        Ok(())
    }
}

pub struct MockSystem {
    pub log: TraceLog,
}

impl SystemControl for MockSystem {
    fn reset(&mut self) {
        self.log.borrow_mut().push(Trace::Reset);
    }
}

/// Pin levels, modes and a pull-up button matrix model
#[derive(Default)]
pub struct IoState {
    pub levels: HashMap<u8, bool>,
    pub modes: HashMap<u8, PinMode>,
    pub writes: Vec<(u8, bool)>,
    pub reads: u32,
    /// Pins with the pull-up enabled read high unless set otherwise
    pub pulled_up: HashSet<u8>,
    /// Output pins currently driven low
    pub driven_low: HashSet<u8>,
    /// Pressed keys as `(output pin, input pin)`
    pub pressed: HashSet<(u8, u8)>,
}

#[derive(Clone, Default)]
pub struct MockIo {
    pub state: Rc<RefCell<IoState>>,
}

impl MockIo {
    pub fn set(&self, pin: u8, high: bool) {
        self.state.borrow_mut().levels.insert(pin, high);
    }

    pub fn press_key(&self, output: u8, input: u8) {
        self.state.borrow_mut().pressed.insert((output, input));
    }

    pub fn release_key(&self, output: u8, input: u8) {
        self.state.borrow_mut().pressed.remove(&(output, input));
    }

    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.state.borrow().modes.get(&pin).copied()
    }
}

impl DigitalIo for MockIo {
    fn configure(&mut self, pin: u8, mode: PinMode) {
        let mut state = self.state.borrow_mut();
        state.modes.insert(pin, mode);
        if mode == PinMode::InputPullUp {
            state.pulled_up.insert(pin);
        }
    }

    fn read(&mut self, pin: u8) -> bool {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        let pulled_low = state
            .pressed
            .iter()
            .any(|&(output, input)| input == pin && state.driven_low.contains(&output));
        if pulled_low {
            return false;
        }
        match state.levels.get(&pin) {
            Some(&level) => level,
            None => state.pulled_up.contains(&pin),
        }
    }

    fn write(&mut self, pin: u8, high: bool) {
        let mut state = self.state.borrow_mut();
        state.writes.push((pin, high));
        if high {
            state.driven_low.remove(&pin);
        } else {
            state.driven_low.insert(pin);
        }
    }
}

#[derive(Clone, Default)]
pub struct MockAdc {
    pub readings: Rc<RefCell<HashMap<u8, u16>>>,
    pub samples: Rc<Cell<u32>>,
}

impl MockAdc {
    pub fn set(&self, pin: u8, reading: u16) {
        self.readings.borrow_mut().insert(pin, reading);
    }
}

impl AnalogInput for MockAdc {
    fn read_analog(&mut self, pin: u8) -> u16 {
        self.samples.set(self.samples.get() + 1);
        self.readings.borrow().get(&pin).copied().unwrap_or(1023)
    }
}

#[derive(Default)]
pub struct MockEncoder {
    pub position: Cell<i32>,
    pub direction: Cell<i8>,
    pub ticks: Cell<u32>,
    pub writes: RefCell<Vec<i32>>,
}

impl EncoderDriver for MockEncoder {
    fn tick(&self) {
        self.ticks.set(self.ticks.get() + 1);
    }

    fn direction(&self) -> i8 {
        self.direction.take()
    }

    fn position(&self) -> i32 {
        self.position.get()
    }

    fn set_position(&self, position: i32) {
        self.writes.borrow_mut().push(position);
        self.position.set(position);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ChangeEvent>,
}

impl EventSink for RecordingSink {
    fn on_change(&mut self, event: ChangeEvent) {
        self.events.push(event);
    }
}
