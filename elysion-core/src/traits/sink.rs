//! Event sink trait

use crate::event::ChangeEvent;

/// Receiver of change events
///
/// Called synchronously from the main loop; the engine does not move on to
/// the next input until `on_change` returns.
pub trait EventSink {
    fn on_change(&mut self, event: ChangeEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_change(&mut self, event: ChangeEvent) {
        (**self).on_change(event)
    }
}
