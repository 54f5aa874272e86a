//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - The crawl progress line
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_success, print_warning,
};
pub use progress::{create_spinner, progress_message, ProgressLine};
pub use stats::{print_global_stats, print_source_stats, print_summary};
