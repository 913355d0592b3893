//! Commands shipped with the `subcmdutil` binary

mod echo;
mod sleep;

pub use echo::EchoCommand;
pub use sleep::{SleepCommand, SleepConfig};
