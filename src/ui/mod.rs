pub mod output;
pub mod progress;
pub mod session;
pub mod signals;

pub use output::{OutputFormatter, OutputMode};
pub use progress::ProgressManager;
pub use session::{CompressionSession, StatusLog};
pub use signals::GracefulShutdown;
