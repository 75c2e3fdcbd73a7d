pub mod config;
pub mod keypad;
