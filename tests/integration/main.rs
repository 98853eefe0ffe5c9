//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one path of the HCI
//! layer against a recording environment.  Everything runs on the host
//! with no controller or UART attached.

mod command_tests;
mod data_tests;
mod h4_tests;
mod host_tests;
mod mock_io;
mod transmit_tests;
