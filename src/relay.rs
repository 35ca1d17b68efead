//! Relay-state model.
//!
//! [`RelayBank`] owns the eight [`RelaySlot`]s.  The in-memory state is
//! the only thing ever reported: outputs are written, never read back, so
//! every state change goes through [`RelayBank::apply`] or
//! [`RelayBank::drive_all`], which write the pin and the slot together.

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, RelayPort};
use crate::pins::{RELAY_COUNT, RELAY_GPIOS, RELAY_NAMES};

// ───────────────────────────────────────────────────────────────
// Relay state
// ───────────────────────────────────────────────────────────────

/// Logical state of one relay.  Serialises as `"ON"` / `"OFF"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayState {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl RelayState {
    /// Parse the wire form.  Only the exact strings `"ON"` and `"OFF"`
    /// are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ON" => Some(Self::On),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted power-up state.  Serialises as `"on"` / `"off"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultState {
    On,
    Off,
}

impl DefaultState {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Single-byte NVS encoding.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::On),
            0 => Some(Self::Off),
            _ => None,
        }
    }

    pub fn relay_state(self) -> RelayState {
        match self {
            Self::On => RelayState::On,
            Self::Off => RelayState::Off,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Slots and bank
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySlot {
    pub name: &'static str,
    pub pin: i32,
    pub state: RelayState,
}

/// A resolved update: slot indices paired with their new state.
///
/// Built by [`RelayBank::resolve`] from a request body; entries that do
/// not name a relay, or carry a value other than `"ON"`/`"OFF"`, are
/// counted and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayUpdate {
    pub changes: heapless::Vec<(usize, RelayState), RELAY_COUNT>,
    /// Keys that do not name a relay.
    pub unknown_keys: usize,
    /// Known relays whose value was not `"ON"`/`"OFF"`.
    pub rejected_values: usize,
}

pub struct RelayBank {
    slots: [RelaySlot; RELAY_COUNT],
}

impl RelayBank {
    /// Board layout from [`crate::pins`], every slot at `initial`.
    ///
    /// Nothing is written to hardware here; call [`drive_all`](Self::drive_all)
    /// once the outputs are configured.
    pub fn new(initial: RelayState) -> Self {
        let slots = core::array::from_fn(|i| RelaySlot {
            name: RELAY_NAMES[i],
            pin: RELAY_GPIOS[i],
            state: initial,
        });
        Self { slots }
    }

    pub fn slots(&self) -> &[RelaySlot; RELAY_COUNT] {
        &self.slots
    }

    /// States in slot order.
    pub fn states(&self) -> [RelayState; RELAY_COUNT] {
        core::array::from_fn(|i| self.slots[i].state)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    pub fn state(&self, name: &str) -> Option<RelayState> {
        self.index_of(name).map(|i| self.slots[i].state)
    }

    /// Write every slot's current state to its output.
    pub fn drive_all(&self, out: &mut impl RelayPort) {
        for (i, slot) in self.slots.iter().enumerate() {
            out.drive(i, slot.pin, slot.state);
        }
    }

    /// Match a JSON object against the bank.
    ///
    /// Keys are visited in slot order, so a body naming the same relay
    /// twice resolves to the last value the parser kept.
    pub fn resolve(&self, body: &Map<String, Value>) -> RelayUpdate {
        let mut update = RelayUpdate::default();

        for (index, slot) in self.slots.iter().enumerate() {
            let Some(value) = body.get(slot.name) else {
                continue;
            };
            match value.as_str().and_then(RelayState::parse) {
                Some(state) => {
                    // Capacity equals the slot count and each slot is visited once.
                    let _ = update.changes.push((index, state));
                }
                None => {
                    warn!("Relay: ignoring {} = {} (expected \"ON\" or \"OFF\")", slot.name, value);
                    update.rejected_values += 1;
                }
            }
        }

        update.unknown_keys = body
            .keys()
            .filter(|k| self.index_of(k).is_none())
            .count();
        update
    }

    /// Apply a resolved update: set each named slot and drive its pin.
    ///
    /// Pins are written even when the state is unchanged, so repeating
    /// an update is harmless.  Returns the number of slots written.
    pub fn apply(
        &mut self,
        update: &RelayUpdate,
        out: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> usize {
        for &(index, state) in &update.changes {
            let slot = &mut self.slots[index];
            let previous = slot.state;
            slot.state = state;
            out.drive(index, slot.pin, state);
            sink.emit(&AppEvent::RelaySwitched {
                name: slot.name,
                pin: slot.pin,
                from: previous,
                to: state,
            });
        }
        update.changes.len()
    }
}
