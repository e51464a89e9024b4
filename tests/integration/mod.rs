//! Integration test modules.

mod os_signal_test;
mod persistence_test;
