//! # StringUtils
//! This module contains utility functions around string handling that are used in the project.
use crate::clock::ClockTime;
use core::fmt::Write;
use heapless::String;

/// Long enough for every line the device prints
pub const LINE_CAPACITY: usize = 24;

/// One line of screen text
pub type Line = String<LINE_CAPACITY>;

pub struct StringUtils;

impl StringUtils {
    /// This function converts a `ClockTime` to the live time string
    /// The output string will be in the format "DD:HH:MM:SS", every field zero padded,
    /// one example being `"07:23:05:09"`
    pub fn clock_to_str(time: ClockTime) -> String<11> {
        let mut s: String<11> = String::new();
        // 11 characters always fit, the fields are all below 100
        let _ = write!(
            s,
            "{:02}:{:02}:{:02}:{:02}",
            time.day % 100,
            time.hour % 100,
            time.minute % 100,
            time.second % 100
        );
        s
    }

    /// This function builds an editor prompt like `"Enter hour = 7"`
    pub fn prompt_to_str(field: &str, value: u8) -> Line {
        let mut s = Line::new();
        let _ = write!(s, "Enter {field} = {value}");
        s
    }

    /// Copy a fixed text into a screen line, cutting it off if it is too long
    pub fn line(text: &str) -> Line {
        let mut s = Line::new();
        for c in text.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        s
    }
}
