//! Turns process interrupts into context cancellation

mod monitor;

pub use monitor::{ShutdownHandle, ShutdownMonitor, FORCED_EXIT_CODE};
