pub mod action;
pub mod config;
pub mod demo;
pub mod judging;
pub mod style;
pub mod testing;

pub use crate::config::Config;
