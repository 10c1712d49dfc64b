pub mod registry;

pub use registry::{LIBRARY_SUFFIX, LibraryRegistry};
