use modeler_kernel::store::ShapeStore;
use serde::Serialize;
use tracing::info;

use crate::errors::SaveError;
use crate::metadata::ProjectMetadata;
use crate::nodes::NodeRecord;

/// Format identifier written into every scene file.
pub const FORMAT_ID: &str = "modeler-scene";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct SceneFile<'a> {
    /// Format identifier.
    pub format: &'a str,
    /// Format version number.
    pub version: u32,
    /// Project metadata.
    pub project: &'a ProjectMetadata,
    /// Every shape of the store, in arena order.
    pub nodes: Vec<NodeRecord>,
}

/// Serialize a scene to a pretty-printed JSON string.
pub fn save_scene(store: &ShapeStore, metadata: &ProjectMetadata) -> Result<String, SaveError> {
    let nodes: Vec<NodeRecord> = store
        .shapes()
        .map(|(_, shape)| NodeRecord::from_shape(shape))
        .collect();
    let file = SceneFile {
        format: FORMAT_ID,
        version: FORMAT_VERSION,
        project: metadata,
        nodes,
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| SaveError::SerializeError(e.to_string()))?;
    info!(nodes = file.nodes.len(), "scene saved");
    Ok(json)
}
