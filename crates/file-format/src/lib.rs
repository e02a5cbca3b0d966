pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod nodes;
pub mod save;

pub use errors::{LoadError, SaveError};
pub use load::{load_into, load_scene};
pub use metadata::ProjectMetadata;
pub use nodes::{NodeGeometry, NodeRecord};
pub use save::{save_scene, FORMAT_ID, FORMAT_VERSION};
