//! The archive model: root discovery, path confinement, and the resolution
//! of queries to candidate files.

pub mod discovery;
pub mod resolver;
pub mod validate;

pub use discovery::{discover_roots, ArchiveRoot};
pub use resolver::{enumerate_namespaces, find_resource_files};
pub use validate::validate_path;
