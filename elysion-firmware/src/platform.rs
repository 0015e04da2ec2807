//! Board-level collaborators that need nothing but the core peripherals

use embassy_rp::gpio::Output;
use elysion_hal::{OutputPin, SystemControl};

/// Resets through the Cortex-M system control block
pub struct Platform;

impl SystemControl for Platform {
    fn reset(&mut self) {
        cortex_m::peripheral::SCB::sys_reset();
    }
}

/// Status LED toggled on every record sent
pub struct ActivityLed(pub Output<'static>);

impl OutputPin for ActivityLed {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
