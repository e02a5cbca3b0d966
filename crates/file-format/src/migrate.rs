use crate::errors::LoadError;
use crate::nodes::NodeRecord;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations are applied sequentially: v1→v2, v2→v3, etc.
/// Version 1 is the only version so far, so no migrations exist yet.
pub fn migrate(
    nodes: Vec<NodeRecord>,
    from_version: u32,
    to_version: u32,
) -> Result<Vec<NodeRecord>, LoadError> {
    if from_version != to_version {
        return Err(LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason: format!("no migration path from v{} to v{}", from_version, to_version),
        });
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::NodeGeometry;

    #[test]
    fn same_version_is_identity() {
        let nodes = vec![NodeRecord::new(NodeGeometry::Point {
            position: [0.0, 0.0, 0.0],
        })];
        assert_eq!(migrate(nodes.clone(), 1, 1).unwrap(), nodes);
    }

    #[test]
    fn unknown_path_fails() {
        let err = migrate(Vec::new(), 0, 1).unwrap_err();
        assert!(matches!(err, LoadError::MigrationFailed { from: 0, to: 1, .. }));
    }
}
