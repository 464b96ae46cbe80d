// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;

use crate::node::Node;
use crate::parser;
use crate::JcfError;

/// Export a JCF tree to JSON.
///
/// Scalars become strings, blocks become objects (keys in document order)
/// and lists become arrays of objects. Values are exported raw; `$name$`
/// references are kept as written.
///
/// # Examples
/// ```no_run
/// use jcf::{parse, export};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = parse("Server: {\n    Port: 8080\n}\n")?;
/// println!("{}", export::export_node_to_json(&root)?);
/// # Ok(())
/// # }
/// ```
pub fn export_node_to_json(node: &Node) -> Result<String, JcfError> {
    serde_json::to_string_pretty(node).map_err(|e| JcfError::ExportError {
        message: format!("Failed to serialize to JSON: {}", e),
        hint: None,
        code: Some(601),
    })
}

/// Build a JCF tree from JSON produced by [`export_node_to_json`] (or any
/// JSON of the same shape: string leaves, objects, arrays of objects).
pub fn import_node_from_json(json: &str) -> Result<Node, JcfError> {
    let node: Node = serde_json::from_str(json).map_err(|e| JcfError::ExportError {
        message: format!("JSON does not describe a JCF tree: {}", e),
        hint: Some("Only strings, objects and arrays of objects are supported".into()),
        code: Some(602),
    })?;
    // Keys and values coming from JSON never went through the parser.
    node.check_writable().map_err(|e| JcfError::ExportError {
        message: format!("JSON holds something JCF cannot: {}", e),
        hint: Some("Keys must not contain . # $ : or brackets; values must be one line without brackets".into()),
        code: Some(603),
    })?;
    Ok(node)
}

/// Export a JCF file directly to JSON.
///
/// # Errors
/// Returns error if the file can't be read or is malformed.
pub fn export_jcf_file<P: AsRef<Path>>(path: P) -> Result<String, JcfError> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|e| JcfError::FileError {
        message: format!("Failed to read file: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: None,
        code: Some(301),
    })?;

    let root = parser::parse(&input)?;
    export_node_to_json(&root)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Name: srv\nServer: {\n    Port: 8080\n    Root: /var/$Name$\n}\nRoutes: [\n    { Path: / }\n    { Path: /about }\n]\n";

    #[test]
    fn test_export_shape() {
        let root = parser::parse(SAMPLE).unwrap();
        let json = export_node_to_json(&root).expect("Failed to export to JSON");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["Name"], "srv");
        assert_eq!(v["Server"]["Port"], "8080");
        assert_eq!(v["Server"]["Root"], "/var/$Name$");
        assert!(v["Routes"].is_array());
        assert_eq!(v["Routes"][1]["Path"], "/about");
    }

    #[test]
    fn test_export_keeps_document_order() {
        let root = parser::parse("Z: 1\nA: 2\nM: 3\n").unwrap();
        let json = export_node_to_json(&root).unwrap();
        let z = json.find("\"Z\"").unwrap();
        let a = json.find("\"A\"").unwrap();
        let m = json.find("\"M\"").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_import_back() {
        let root = parser::parse(SAMPLE).unwrap();
        let json = export_node_to_json(&root).unwrap();
        let imported = import_node_from_json(&json).expect("Failed to import JSON");
        assert_eq!(imported, root);
        assert_eq!(imported.root().get_scalar("Server.Root").unwrap(), "/var/srv");
    }

    #[test]
    fn test_import_rejects_other_json() {
        let err = import_node_from_json(r#"{"Port": 8080}"#).unwrap_err();
        assert_eq!(err.code(), Some(602));

        let err = import_node_from_json(r#"{"A.B": "x"}"#).unwrap_err();
        assert_eq!(err.code(), Some(603));

        let err = import_node_from_json(r#"{"L": [{"bad#key": "x"}]}"#).unwrap_err();
        assert_eq!(err.code(), Some(603));

        let err = import_node_from_json(r#"{"A": "{oops"}"#).unwrap_err();
        assert_eq!(err.code(), Some(603));
    }

    #[test]
    fn test_export_jcf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.jcf");
        fs::write(&path, SAMPLE).unwrap();

        let json = export_jcf_file(&path).expect("Failed to export file");
        assert!(json.contains("\"Routes\""));

        assert!(export_jcf_file(dir.path().join("missing.jcf")).is_err());
    }
}
