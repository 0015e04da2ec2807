//! Event sink used by the polling loop
//!
//! Every change goes to the bus. Button changes on boards with indicators
//! also light the board's LED at the button's index while it is held.

use elysion_core::dispatch::BusDispatcher;
use elysion_core::indicator::color_rgb;
use elysion_core::traits::EventSink;
use elysion_core::{ChangeEvent, EventKind};
use elysion_hal::{BusTransport, OutputPin};

use crate::leds::Indicators;

/// Color of a held button's LED
pub const PRESSED_COLOR: u32 = color_rgb(0, 70, 0);

pub struct PanelSink<T, L> {
    dispatcher: BusDispatcher<T, L>,
    indicators: Indicators,
}

impl<T: BusTransport, L: OutputPin> PanelSink<T, L> {
    pub fn new(dispatcher: BusDispatcher<T, L>, indicators: Indicators) -> Self {
        Self {
            dispatcher,
            indicators,
        }
    }
}

impl<T: BusTransport, L: OutputPin> EventSink for PanelSink<T, L> {
    fn on_change(&mut self, event: ChangeEvent) {
        self.dispatcher.on_change(event);

        if event.kind == EventKind::Button {
            let color = if event.value != 0 { PRESSED_COLOR } else { 0 };
            self.indicators
                .set_led_color(event.board, usize::from(event.input), color);
            self.indicators.show_leds(event.board);
        }
    }
}
