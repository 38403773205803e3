//! Read-only host observation.

pub mod pkg;
pub mod probe;

pub use pkg::PackageManager;
pub use probe::{HostProbe, Identity, LiveProbe, PathState};
