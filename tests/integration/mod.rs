//! Integration tests across the monitor, propagator and configuration layer

pub mod config_tests;
pub mod monitor_tests;
pub mod propagator_tests;
