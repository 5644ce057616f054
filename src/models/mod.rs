mod license;
mod log_entry;
mod stats;

pub use license::*;
pub use log_entry::*;
pub use stats::*;
