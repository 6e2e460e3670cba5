pub mod common;
pub mod config;
pub mod pomodoro;
pub mod stopwatch;
pub mod timer;
