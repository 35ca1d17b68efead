//! Relay output driver.
//!
//! Eight push-pull outputs driven through the `embedded-hal`
//! [`OutputPin`] trait.  This driver deals in levels only; polarity and
//! relay semantics live in the hardware adapter.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `esp-idf-hal` `PinDriver`s built from [`pins::RELAY_GPIOS`](crate::pins::RELAY_GPIOS).
//! On host/test: [`SimPin`]s that only remember their level.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::pins::RELAY_COUNT;

pub struct RelayPins<P> {
    pins: heapless::Vec<P, RELAY_COUNT>,
}

impl<P: OutputPin> RelayPins<P> {
    pub fn new(pins: [P; RELAY_COUNT]) -> Self {
        Self {
            pins: pins.into_iter().collect(),
        }
    }

    /// Set output `index` (wired to `gpio`, used for logging).  A failed
    /// write is logged; the caller's state is not rolled back.
    pub fn set(&mut self, index: usize, gpio: i32, high: bool) {
        let Some(pin) = self.pins.get_mut(index) else {
            warn!("RelayPins: no output at index {} (GPIO {})", index, gpio);
            return;
        };
        let result = if high { pin.set_high() } else { pin.set_low() };
        if let Err(e) = result {
            warn!("RelayPins: GPIO {} write failed: {:?}", gpio, e);
        }
    }

    pub fn pin(&self, index: usize) -> &P {
        &self.pins[index]
    }
}

// ── ESP-IDF outputs ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub type EspRelayPin = esp_idf_hal::gpio::PinDriver<
    'static,
    esp_idf_hal::gpio::AnyOutputPin,
    esp_idf_hal::gpio::Output,
>;

#[cfg(target_os = "espidf")]
impl RelayPins<EspRelayPin> {
    /// Configure every GPIO in `gpios` as a push-pull output.
    ///
    /// Levels are left as the driver initialises them; the application
    /// drives every output right after construction.
    pub fn from_gpios(
        gpios: &[i32; RELAY_COUNT],
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};

        let mut pins = heapless::Vec::new();
        for &gpio in gpios {
            // SAFETY: each GPIO appears once in RELAY_GPIOS and no other
            // driver in the firmware claims these pins.
            let pin = unsafe { AnyOutputPin::new(gpio) };
            let driver = PinDriver::output(pin)?;
            // Capacity equals the slice length.
            let _ = pins.push(driver);
        }
        log::info!("RelayPins: {} outputs configured", pins.len());
        Ok(Self { pins })
    }
}

// ── Simulation ────────────────────────────────────────────────

/// In-memory output pin for host builds.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
}

#[cfg(not(target_os = "espidf"))]
impl SimPin {
    pub fn is_high(&self) -> bool {
        self.high
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}
