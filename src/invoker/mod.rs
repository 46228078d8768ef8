pub mod ghostscript;
pub mod preset;
pub mod report;

pub use ghostscript::{suggest_output_path, CompressionJob, GhostscriptInvoker};
pub use preset::Preset;
pub use report::CompressionReport;
