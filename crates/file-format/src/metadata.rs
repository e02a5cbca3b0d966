use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project metadata stored alongside the scene nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Human-readable project name.
    pub name: String,
    /// When the project was first created.
    pub created: DateTime<Utc>,
    /// When the project was last modified.
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    /// Create metadata with the given name and current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Mark the project as modified now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// File name, without extension, for a save taken at `modified`:
    /// `scene_YYYY-MM-DD HH-MM-SS`.
    pub fn file_stem(&self) -> String {
        format!("scene_{}", self.modified.format("%Y-%m-%d %H-%M-%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_stem_uses_modified_time() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let meta = ProjectMetadata {
            name: "demo".to_string(),
            created: stamp,
            modified: stamp,
        };
        assert_eq!(meta.file_stem(), "scene_2024-03-09 14-05-07");
    }

    #[test]
    fn touch_moves_modified_forward() {
        let mut meta = ProjectMetadata::new("demo");
        let before = meta.modified;
        meta.touch();
        assert!(meta.modified >= before);
        assert_eq!(meta.created, before);
    }
}
