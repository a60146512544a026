//! Reusable UI components

pub mod header;
pub mod keypad;
