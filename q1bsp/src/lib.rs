pub mod atlas;
pub mod bsp;
pub mod config;
pub mod error;
pub mod import;
pub mod meshes;
pub mod prelude;
pub mod vertex;

#[cfg(test)]
mod test_map;

pub use config::{ImportConfig, VertexSharing};
pub use error::{BspError, ImportWarning};
pub use import::{import_bytes, import_file, ImportResult};
