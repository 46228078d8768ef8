pub mod executable_locator;

pub use executable_locator::{locate_ghostscript, ExecutableLocator};
