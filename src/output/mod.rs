//! Console, progress, and statistics output.

pub mod console;
pub mod reporter;
pub mod stats;

pub use console::{clear_terminal, print_banner, print_error, print_info, print_warning};
pub use reporter::Reporter;
pub use stats::print_run_stats;
