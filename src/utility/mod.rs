//! Helpers that do not belong to a single component.
pub mod string_utils;
