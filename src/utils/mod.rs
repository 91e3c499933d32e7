pub mod logging;

pub use logging::{log_startup, print_final_stats, truncate_text};
