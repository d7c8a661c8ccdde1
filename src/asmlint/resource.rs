//! Resources handed to the checks and the metadata read from them.

use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

/// Source file annotation written by kustomize readers.
pub const PATH_ANNOTATION: &str = "config.kubernetes.io/path";
/// Position-in-file annotation written by kustomize readers.
pub const INDEX_ANNOTATION: &str = "config.kubernetes.io/index";
pub const INTERNAL_PATH_ANNOTATION: &str = "internal.config.kubernetes.io/path";
pub const INTERNAL_INDEX_ANNOTATION: &str = "internal.config.kubernetes.io/index";

/// One configuration document of the batch.
///
/// The tree is owned by the pipeline; checks only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    tree: Value,
    /// Where the document came from, used when no path annotation is present.
    source: Option<String>,
    /// Position in the input stream, used when no index annotation is present.
    position: usize,
}

impl Resource {
    pub fn new(tree: Value) -> Self {
        Self {
            tree,
            source: None,
            position: 0,
        }
    }

    /// Record where the document was read from.
    pub fn with_origin(mut self, source: impl Into<String>, position: usize) -> Self {
        self.source = Some(source.into());
        self.position = position;
        self
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Render the whole resource back to YAML for diagnostics.
    pub fn dump(&self) -> String {
        serde_yaml::to_string(&self.tree).unwrap_or_else(|e| format!("<unprintable: {}>", e))
    }

    /// Read the identifying metadata of the resource.
    pub fn meta(&self) -> Result<ResourceMeta, HeaderError> {
        let fail = |reason: &str| HeaderError {
            path: self.source.clone().unwrap_or_default(),
            index: self.position.to_string(),
            reason: reason.to_string(),
        };

        if !self.tree.is_mapping() {
            return Err(fail("document is not a mapping"));
        }
        let api_version = self
            .tree
            .get("apiVersion")
            .ok_or_else(|| fail("apiVersion is missing"))?
            .as_str()
            .ok_or_else(|| fail("apiVersion is not a string"))?;
        let kind = self
            .tree
            .get("kind")
            .ok_or_else(|| fail("kind is missing"))?
            .as_str()
            .ok_or_else(|| fail("kind is not a string"))?;

        let metadata = self.tree.get("metadata");
        let name = metadata
            .and_then(|m| m.get("name"))
            .and_then(scalar_text)
            .unwrap_or_default();
        let annotations = metadata.and_then(|m| m.get("annotations"));
        let annotation = |keys: [&str; 2]| {
            keys.iter()
                .find_map(|k| annotations.and_then(|a| a.get(*k)).and_then(scalar_text))
        };

        let path = annotation([PATH_ANNOTATION, INTERNAL_PATH_ANNOTATION])
            .or_else(|| self.source.clone())
            .unwrap_or_default();
        let index = annotation([INDEX_ANNOTATION, INTERNAL_INDEX_ANNOTATION])
            .unwrap_or_else(|| self.position.to_string());

        Ok(ResourceMeta {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name,
            path,
            index,
        })
    }
}

impl From<Value> for Resource {
    fn from(tree: Value) -> Self {
        Self::new(tree)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Identifying metadata of a resource.
///
/// `Display` renders the locator embedded in every finding:
/// `KIND NAME (PATH [INDEX])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    /// Source locator (file path annotation).
    pub path: String,
    /// Index of the document within its source.
    pub index: String,
}

impl fmt::Display for ResourceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} [{}])", self.kind, self.name, self.path, self.index)
    }
}

/// The resource header could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unable to read metadata of resource ({path} [{index}]): {reason}")]
pub struct HeaderError {
    pub path: String,
    pub index: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(yaml: &str) -> Resource {
        Resource::new(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_meta_reads_annotations() {
        let r = resource(
            r#"
apiVersion: container.cnrm.cloud.google.com/v1beta1
kind: ContainerCluster
metadata:
  name: asm-cluster
  annotations:
    config.kubernetes.io/path: cluster.yaml
    config.kubernetes.io/index: '2'
"#,
        );
        let meta = r.meta().unwrap();
        assert_eq!(meta.kind, "ContainerCluster");
        assert_eq!(meta.name, "asm-cluster");
        assert_eq!(meta.path, "cluster.yaml");
        assert_eq!(meta.index, "2");
        assert_eq!(
            meta.to_string(),
            "ContainerCluster asm-cluster (cluster.yaml [2])"
        );
    }

    #[test]
    fn test_meta_internal_annotations() {
        let r = resource(
            r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: cm
  annotations:
    internal.config.kubernetes.io/path: base/cm.yaml
    internal.config.kubernetes.io/index: 0
"#,
        );
        let meta = r.meta().unwrap();
        assert_eq!(meta.path, "base/cm.yaml");
        assert_eq!(meta.index, "0");
    }

    #[test]
    fn test_meta_falls_back_to_origin() {
        let r = resource("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\n")
            .with_origin("stdin", 3);
        let meta = r.meta().unwrap();
        assert_eq!(meta.path, "stdin");
        assert_eq!(meta.index, "3");
    }

    #[test]
    fn test_meta_missing_kind() {
        let r = resource("apiVersion: v1\nmetadata:\n  name: cm\n");
        let err = r.meta().unwrap_err();
        assert!(err.to_string().contains("kind is missing"));
    }

    #[test]
    fn test_meta_not_a_mapping() {
        let r = resource("- a\n- b\n");
        let err = r.meta().unwrap_err();
        assert_eq!(err.reason, "document is not a mapping");
    }

    #[test]
    fn test_meta_without_name() {
        let r = resource("apiVersion: v1\nkind: Namespace\n");
        assert_eq!(r.meta().unwrap().name, "");
    }
}
