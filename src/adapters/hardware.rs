//! Hardware adapter. Bridges the relay output driver to [`RelayPort`].
//!
//! Owns the [`RelayPins`] driver and translates logical relay states into
//! output levels, honouring the board's relay polarity.  On non-espidf
//! targets the driver runs over simulated pins.

use embedded_hal::digital::OutputPin;

use crate::app::ports::RelayPort;
use crate::drivers::relay_pins::RelayPins;
use crate::relay::RelayState;

/// Concrete adapter that puts the relay outputs behind [`RelayPort`].
pub struct HardwareAdapter<P> {
    pins: RelayPins<P>,
    active_low: bool,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(pins: RelayPins<P>, active_low: bool) -> Self {
        Self { pins, active_low }
    }

    /// Output level for a logical state.
    fn level(&self, state: RelayState) -> bool {
        state.is_on() != self.active_low
    }

    pub fn pins(&self) -> &RelayPins<P> {
        &self.pins
    }
}

impl<P: OutputPin> RelayPort for HardwareAdapter<P> {
    fn drive(&mut self, index: usize, pin: i32, state: RelayState) {
        let high = self.level(state);
        self.pins.set(index, pin, high);
    }
}
