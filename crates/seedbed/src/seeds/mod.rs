//! Seed files: discovery, parsing, path resolution, and scaffolding

pub mod creator;
pub mod definitions;
pub mod loader;
pub mod paths;

pub use creator::*;
pub use definitions::*;
pub use loader::*;
pub use paths::*;
