pub mod config;
pub mod daemon;
pub mod error;
pub mod scan;
pub mod shutdown;
pub mod watch;

// Re-export commonly used types
pub use config::Config;
pub use error::{ScanError, WatchError};
pub use scan::{MagicScanner, ScanOutcome};
pub use shutdown::Shutdown;
pub use watch::{FileTracker, PollReport, WatchEvent, WatchTable};
