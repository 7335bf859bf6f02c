use crate::error::{ExportError, ExportResult};
use crate::types::*;
use std::path::Path;

impl GraphDocument {
    /// Pretty JSON with two-space indentation. Non-ASCII text is written
    /// literally.
    pub fn to_json_pretty(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize the whole document, then replace `path` in a single write
    pub fn save_to_json(&self, path: &Path) -> ExportResult<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| ExportError::io(path, e))?;
        Ok(())
    }

    pub fn load_from_json(path: &Path) -> ExportResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_layout() {
        let document = GraphDocument {
            nodes: vec![NodeRecord {
                id: "A".to_string(),
                latitude: 25.03,
                longitude: 121.56,
            }],
            edges: vec![],
        };
        let expected = "{\n  \"nodes\": [\n    {\n      \"id\": \"A\",\n      \"latitude\": 25.03,\n      \"longitude\": 121.56\n    }\n  ],\n  \"edges\": []\n}";
        assert_eq!(document.to_json_pretty().unwrap(), expected);
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let document = GraphDocument {
            nodes: vec![NodeRecord {
                id: "臺北車站".to_string(),
                latitude: 25.0478,
                longitude: 121.517,
            }],
            edges: vec![],
        };
        let json = document.to_json_pretty().unwrap();
        assert!(json.contains("\"id\": \"臺北車站\""));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let path = std::env::temp_dir()
            .join("roadnet_missing_dir_for_test")
            .join("nested")
            .join("out.json");
        let err = GraphDocument::default().save_to_json(&path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
