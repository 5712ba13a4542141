//! SDK system resources (`sys` scope).
//!
//! The SDK ships its resource catalogue as a generated script rather than a
//! declarative file. Reading it is split in two so the heuristic part can be
//! swapped out without touching the index:
//!
//! - `loader` locates and reads the script and turns entries into index items
//! - `scanner` is the structural, best-effort scan of the script text

mod loader;
mod scanner;

pub use loader::{load_script, load_sdk, locate_script};
pub use scanner::{SdkEntry, id_placeholder, scan_sdk_script};
