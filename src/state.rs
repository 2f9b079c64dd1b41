//! # State of the system
//! This module describes the state of the system and the operations that can be performed on it.
//!
//! There is no global: the control loop owns one [`SystemState`] and lends it to the menu while a
//! session runs.
use crate::clock::ClockTime;
use crate::menu::MenuCursor;
use heapless::Vec;

/// Number of alarms the device keeps
pub const ALARM_COUNT: usize = 3;

/// One of the three alarms. The order is fixed and is the order shown in the menu.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmSlot {
    /// Alarm 1
    First,
    /// Alarm 2
    Second,
    /// Alarm 3
    Third,
}

impl AlarmSlot {
    /// All slots in menu order
    pub const ALL: [Self; ALARM_COUNT] = [Self::First, Self::Second, Self::Third];

    /// Position in the registry, 0-2
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }

    /// The number the user sees, 1-3
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

/// An alarm time and whether it already went off.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// Set when the alarm has rung. Only editing the alarm clears it, so every alarm rings at
    /// most once per power cycle.
    pub triggered: bool,
}

impl Alarm {
    /// Create a new, not yet triggered alarm
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            triggered: false,
        }
    }
}

/// The three alarms and the global enable flag.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmRegistry {
    /// The alarms, indexed by [`AlarmSlot::index`]
    alarms: [Alarm; ALARM_COUNT],
    /// Once cleared, no alarm rings again until reboot
    enabled: bool,
}

impl AlarmRegistry {
    /// Create a registry with the given alarm times, enabled.
    pub const fn new(alarms: [Alarm; ALARM_COUNT]) -> Self {
        Self {
            alarms,
            enabled: true,
        }
    }

    /// The alarms that ring right now.
    ///
    /// An alarm is due when alarms are enabled, it has not rung yet and hour and minute match
    /// `now` exactly. There is no catch-up: a minute the loop never looks at is a minute missed.
    pub fn due_alarms(&self, now: ClockTime) -> Vec<AlarmSlot, ALARM_COUNT> {
        if !self.enabled {
            return Vec::new();
        }
        AlarmSlot::ALL
            .into_iter()
            .filter(|slot| {
                let alarm = self.alarms[slot.index()];
                !alarm.triggered && alarm.hour == now.hour && alarm.minute == now.minute
            })
            .collect()
    }

    /// Set a new time for one alarm. Values wrap into range and the triggered latch is cleared,
    /// so an alarm set to the current minute rings right away.
    pub fn set_alarm(&mut self, slot: AlarmSlot, hour: u8, minute: u8) {
        self.alarms[slot.index()] = Alarm::new(hour % 24, minute % 60);
        info!(
            "Alarm {} set to {:02}:{:02}",
            slot.number(),
            hour % 24,
            minute % 60
        );
    }

    /// Latch an alarm after it rang
    pub const fn mark_triggered(&mut self, slot: AlarmSlot) {
        self.alarms[slot.index()].triggered = true;
    }

    /// Turn all alarms off. There is no way back short of a reboot.
    pub fn disable_all(&mut self) {
        self.enabled = false;
        info!("All alarms disabled");
    }

    /// Are alarms enabled
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look at one alarm
    pub const fn alarm(&self, slot: AlarmSlot) -> Alarm {
        self.alarms[slot.index()]
    }
}

impl Default for AlarmRegistry {
    /// The alarms the device boots with: 00:01, 00:03 and 01:01.
    fn default() -> Self {
        Self::new([Alarm::new(0, 1), Alarm::new(0, 3), Alarm::new(1, 1)])
    }
}

/// All mutable state the control loop carries between iterations.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemState {
    /// The alarms
    pub alarms: AlarmRegistry,
    /// Where the menu cursor was left, so the next session starts there
    pub menu: MenuCursor,
}

impl SystemState {
    /// Create a new `SystemState` with the given alarms and the cursor on the first entry
    pub fn new(alarms: AlarmRegistry) -> Self {
        Self {
            alarms,
            menu: MenuCursor::default(),
        }
    }
}
