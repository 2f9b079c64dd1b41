//! # Menu
//! The settings menu as a state machine.
//!
//! The engine itself never waits and never draws. It is fed one debounced button at a time and
//! answers with a [`MenuEffect`]; [`MenuEngine::screen`] says what the screen should show next.
//! Writing the clock and showing confirmations is left to the control loop, which owns the
//! clock and the display.
//!
//! ```text
//! Idle --Ok--> Browsing --Ok--> EditingHour --Ok--> EditingMinute --Ok--> Idle (commit)
//!                 |  ^ Up/Down       ^ Up/Down           ^ Up/Down
//!                 |  Ok on "Disable alarms" --> Idle
//!                 +--Cancel, from any menu state --> Idle
//! ```
use crate::buttons::Button;
use crate::clock::ClockTime;
use crate::state::{AlarmSlot, SystemState};
use crate::utility::string_utils::{Line, StringUtils};

/// Number of entries in the menu
pub const MENU_LEN: u8 = 5;

/// What an entry of the menu does
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Set the wall clock
    SetTime,
    /// Set one of the alarms
    SetAlarm(AlarmSlot),
    /// Turn all alarms off
    DisableAlarms,
}

/// The menu entries in the order they are browsed
pub const MENU_ENTRIES: [MenuAction; MENU_LEN as usize] = [
    MenuAction::SetTime,
    MenuAction::SetAlarm(AlarmSlot::First),
    MenuAction::SetAlarm(AlarmSlot::Second),
    MenuAction::SetAlarm(AlarmSlot::Third),
    MenuAction::DisableAlarms,
];

impl MenuAction {
    /// The text shown while the cursor is on this entry
    pub const fn label(self) -> &'static str {
        match self {
            Self::SetTime => "1 - Set time",
            Self::SetAlarm(AlarmSlot::First) => "2 - Set alarm 1",
            Self::SetAlarm(AlarmSlot::Second) => "3 - Set alarm 2",
            Self::SetAlarm(AlarmSlot::Third) => "4 - Set alarm 3",
            Self::DisableAlarms => "5 - Disable alarms",
        }
    }
}

/// Position in the menu. Always a valid entry, moves wrap around.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuCursor(u8);

impl MenuCursor {
    /// Cursor on the entry at `index`, wrapped into range
    pub const fn new(index: u8) -> Self {
        Self(index % MENU_LEN)
    }

    /// 0-4
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The entry under the cursor
    pub const fn action(self) -> MenuAction {
        MENU_ENTRIES[self.0 as usize]
    }

    /// One entry forward, from the last entry back to the first
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % MENU_LEN)
    }

    /// One entry back, from the first entry to the last
    #[must_use]
    pub const fn previous(self) -> Self {
        Self((self.0 + MENU_LEN - 1) % MENU_LEN)
    }
}

/// What an hour/minute editor writes to when it is committed
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditTarget {
    /// The wall clock
    Clock,
    /// One of the alarms
    Alarm(AlarmSlot),
}

/// Where the menu is
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    /// Not in the menu, the main screen is showing
    #[default]
    Idle,
    /// Looking at the entry under the cursor
    Browsing,
    /// Choosing the hour. `minute` is carried along untouched for the next step.
    EditingHour {
        /// What gets written on commit
        target: EditTarget,
        /// Hour being edited
        hour: u8,
        /// Minute the minute editor will start from
        minute: u8,
    },
    /// Choosing the minute, the hour is already chosen
    EditingMinute {
        /// What gets written on commit
        target: EditTarget,
        /// Hour chosen in the previous step
        hour: u8,
        /// Minute being edited
        minute: u8,
    },
}

/// What the control loop has to do after a button was handled
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEffect {
    /// Still in the menu, redraw
    Stay,
    /// Left the menu without changing anything
    Exit,
    /// Left the menu, the clock has to be set to this time
    SetClock {
        /// 0-23
        hour: u8,
        /// 0-59
        minute: u8,
    },
    /// Left the menu, the alarm has been written
    AlarmSet(AlarmSlot),
    /// Left the menu, all alarms are off
    AlarmsDisabled,
}

impl MenuEffect {
    /// The message to show for a while after the menu closes, if any
    pub const fn confirmation(self) -> Option<&'static str> {
        match self {
            Self::SetClock { .. } => Some("Time is set"),
            Self::AlarmSet(_) => Some("Alarm is set"),
            Self::AlarmsDisabled => Some("Alarms disabled"),
            Self::Stay | Self::Exit => None,
        }
    }

    /// Did the menu close
    pub const fn is_exit(self) -> bool {
        !matches!(self, Self::Stay)
    }
}

/// The menu state machine
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuEngine {
    /// Current state
    state: MenuState,
}

impl MenuEngine {
    /// Create a new `MenuEngine`, idle
    pub const fn new() -> Self {
        Self {
            state: MenuState::Idle,
        }
    }

    /// The current state
    pub const fn state(&self) -> MenuState {
        self.state
    }

    /// Is the menu closed
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, MenuState::Idle)
    }

    /// Open the menu on the entry the cursor was last left on
    pub fn enter(&mut self) {
        if self.is_idle() {
            info!("Entering menu");
            self.state = MenuState::Browsing;
        }
    }

    /// Handle one debounced button press.
    ///
    /// `now` is the clock as last read; the clock editor starts from it, an alarm editor starts
    /// from the alarm's current setting. Alarm changes are written to `system` right here, a new
    /// clock time is handed back as [`MenuEffect::SetClock`].
    pub fn handle(&mut self, button: Button, system: &mut SystemState, now: ClockTime) -> MenuEffect {
        if button == Button::Cancel {
            if !self.is_idle() {
                info!("Leaving menu");
            }
            self.state = MenuState::Idle;
            return MenuEffect::Exit;
        }

        match self.state {
            MenuState::Idle => {
                if button == Button::Ok {
                    self.enter();
                }
                MenuEffect::Stay
            }
            MenuState::Browsing => self.browse(button, system, now),
            MenuState::EditingHour {
                target,
                hour,
                minute,
            } => {
                self.state = match button {
                    Button::Up => MenuState::EditingHour {
                        target,
                        hour: increment(hour, 24),
                        minute,
                    },
                    Button::Down => MenuState::EditingHour {
                        target,
                        hour: decrement(hour, 24),
                        minute,
                    },
                    _ => MenuState::EditingMinute {
                        target,
                        hour,
                        minute,
                    },
                };
                MenuEffect::Stay
            }
            MenuState::EditingMinute {
                target,
                hour,
                minute,
            } => match button {
                Button::Up => {
                    self.state = MenuState::EditingMinute {
                        target,
                        hour,
                        minute: increment(minute, 60),
                    };
                    MenuEffect::Stay
                }
                Button::Down => {
                    self.state = MenuState::EditingMinute {
                        target,
                        hour,
                        minute: decrement(minute, 60),
                    };
                    MenuEffect::Stay
                }
                _ => {
                    self.state = MenuState::Idle;
                    commit(target, hour, minute, system)
                }
            },
        }
    }

    /// Handle a button while browsing the entries
    fn browse(&mut self, button: Button, system: &mut SystemState, now: ClockTime) -> MenuEffect {
        match button {
            Button::Up => {
                system.menu = system.menu.next();
                MenuEffect::Stay
            }
            Button::Down => {
                system.menu = system.menu.previous();
                MenuEffect::Stay
            }
            _ => match system.menu.action() {
                MenuAction::SetTime => {
                    self.state = MenuState::EditingHour {
                        target: EditTarget::Clock,
                        hour: now.hour,
                        minute: now.minute,
                    };
                    MenuEffect::Stay
                }
                MenuAction::SetAlarm(slot) => {
                    let alarm = system.alarms.alarm(slot);
                    self.state = MenuState::EditingHour {
                        target: EditTarget::Alarm(slot),
                        hour: alarm.hour,
                        minute: alarm.minute,
                    };
                    MenuEffect::Stay
                }
                MenuAction::DisableAlarms => {
                    system.alarms.disable_all();
                    self.state = MenuState::Idle;
                    MenuEffect::AlarmsDisabled
                }
            },
        }
    }

    /// The line to show for the current state, `None` when the menu is closed
    pub fn screen(&self, system: &SystemState) -> Option<Line> {
        match self.state {
            MenuState::Idle => None,
            MenuState::Browsing => Some(StringUtils::line(system.menu.action().label())),
            MenuState::EditingHour { hour, .. } => Some(StringUtils::prompt_to_str("hour", hour)),
            MenuState::EditingMinute { minute, .. } => {
                Some(StringUtils::prompt_to_str("minute", minute))
            }
        }
    }
}

/// Write a finished edit
fn commit(target: EditTarget, hour: u8, minute: u8, system: &mut SystemState) -> MenuEffect {
    match target {
        EditTarget::Clock => MenuEffect::SetClock { hour, minute },
        EditTarget::Alarm(slot) => {
            system.alarms.set_alarm(slot, hour, minute);
            MenuEffect::AlarmSet(slot)
        }
    }
}

/// `value + 1`, wrapping to 0 at `modulus`
const fn increment(value: u8, modulus: u8) -> u8 {
    (value + 1) % modulus
}

/// `value - 1`, wrapping to `modulus - 1` below 0
const fn decrement(value: u8, modulus: u8) -> u8 {
    (value + modulus - 1) % modulus
}
