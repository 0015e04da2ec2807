//! Event dispatch onto the bus
//!
//! Every event becomes one 5-byte record sent to the master before the
//! engine moves on. There is no queue: a slow master stalls the poll loop.

use elysion_hal::{BusTransport, OutputPin};
use elysion_protocol::{PeerMessage, MASTER_ADDRESS};

use crate::bootstrap::DeviceAddress;
use crate::event::ChangeEvent;
use crate::traits::EventSink;

/// Send one record to the master
pub fn send_record<T: BusTransport>(transport: &mut T, message: &PeerMessage) -> Result<(), T::Error> {
    transport.send(MASTER_ADDRESS, &message.encode())
}

/// Placeholder for boards without an activity LED
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActivityLed;

impl OutputPin for NoActivityLed {
    fn set_high(&mut self) {}

    fn set_low(&mut self) {}

    fn is_set_high(&self) -> bool {
        false
    }
}

/// [`EventSink`] that serializes events onto the bus
pub struct BusDispatcher<T, L = NoActivityLed> {
    transport: T,
    address: DeviceAddress,
    activity_led: Option<L>,
    sent: u32,
    dropped: u32,
}

impl<T: BusTransport> BusDispatcher<T, NoActivityLed> {
    pub fn new(transport: T, address: DeviceAddress) -> Self {
        Self {
            transport,
            address,
            activity_led: None,
            sent: 0,
            dropped: 0,
        }
    }
}

impl<T: BusTransport, L: OutputPin> BusDispatcher<T, L> {
    /// Toggle `led` on every record sent
    pub fn with_activity_led<L2: OutputPin>(self, led: L2) -> BusDispatcher<T, L2> {
        BusDispatcher {
            transport: self.transport,
            address: self.address,
            activity_led: Some(led),
            sent: self.sent,
            dropped: self.dropped,
        }
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Records sent successfully
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Records the transport refused
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a record; failures are logged and dropped
    pub fn dispatch(&mut self, message: &PeerMessage) {
        if let Some(led) = self.activity_led.as_mut() {
            led.toggle();
        }

        match send_record(&mut self.transport, message) {
            Ok(()) => self.sent = self.sent.wrapping_add(1),
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("bus write failed, record dropped: {}", message);
            }
        }
    }
}

impl<T: BusTransport, L: OutputPin> EventSink for BusDispatcher<T, L> {
    fn on_change(&mut self, event: ChangeEvent) {
        let message = event.to_message(self.address.get());
        self.dispatch(&message);
    }
}
