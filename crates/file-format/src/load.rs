use modeler_kernel::shapes::Shape;
use modeler_kernel::store::ShapeStore;
use serde::Deserialize;
use tracing::info;

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::nodes::NodeRecord;
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFileRaw {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub nodes: Vec<NodeRecord>,
}

/// Deserialize a scene from a JSON string.
///
/// Validates the format identifier and version, migrates older files and
/// rebuilds every shape. Returns the shapes in file order and the project
/// metadata.
pub fn load_scene(json: &str) -> Result<(Vec<Shape>, ProjectMetadata), LoadError> {
    let raw: SceneFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let nodes = if raw.version < FORMAT_VERSION {
        crate::migrate::migrate(raw.nodes, raw.version, FORMAT_VERSION)?
    } else {
        raw.nodes
    };

    let shapes = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            node.to_shape()
                .map_err(|source| LoadError::InvalidShape { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((shapes, raw.project))
}

/// Load a scene and add its shapes to `store`, creating their control
/// points. Nothing is added unless every node is valid.
pub fn load_into(json: &str, store: &mut ShapeStore) -> Result<ProjectMetadata, LoadError> {
    let (shapes, project) = load_scene(json)?;
    let count = shapes.len();
    for shape in shapes {
        store.insert(shape);
    }
    info!(nodes = count, project = %project.name, "scene loaded");
    Ok(project)
}
