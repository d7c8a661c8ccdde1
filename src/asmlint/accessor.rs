//! Field access on resource trees.
//!
//! Every error carries the dotted field path and the resource locator so a
//! finding built from it points straight at the offending declaration.

use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;
use thiserror::Error;

use crate::asmlint::resource::{Resource, ResourceMeta};

/// Leading token, optionally followed by whitespace and a `#` comment.
static VALUE_WITH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)(\s+#.*)?").unwrap());

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("{path} missing in {locator}")]
    Missing { path: String, locator: String },

    #[error("{path} cannot be traversed in {locator}: {dump}")]
    MalformedTree {
        path: String,
        locator: String,
        dump: String,
    },

    #[error("unknown format of {path}: {value} in {locator}")]
    MalformedValue {
        path: String,
        value: String,
        locator: String,
    },
}

impl FieldError {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Render a field path the way it appears in messages.
pub fn dotted(path: &[&str]) -> String {
    path.join(".")
}

/// Return the node at `path`.
///
/// An absent key, or an explicit `null`, at any depth is `Missing`. Stepping
/// into a scalar or a sequence is `MalformedTree`.
pub fn lookup<'a>(
    resource: &'a Resource,
    meta: &ResourceMeta,
    path: &[&str],
) -> Result<&'a Value, FieldError> {
    let mut node = resource.tree();
    for key in path {
        let mapping = match node {
            Value::Mapping(m) => m,
            _ => {
                return Err(FieldError::MalformedTree {
                    path: dotted(path),
                    locator: meta.to_string(),
                    dump: resource.dump(),
                });
            }
        };
        node = match mapping.get(*key) {
            Some(Value::Null) | None => {
                return Err(FieldError::Missing {
                    path: dotted(path),
                    locator: meta.to_string(),
                });
            }
            Some(child) => child,
        };
    }
    Ok(node)
}

/// Textual value of a scalar node with any trailing inline comment removed.
pub fn scalar_value(node: &Value, meta: &ResourceMeta, path: &[&str]) -> Result<String, FieldError> {
    let malformed = |value: String| FieldError::MalformedValue {
        path: dotted(path),
        value,
        locator: meta.to_string(),
    };

    let text = match node {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            let rendered = serde_yaml::to_string(other).unwrap_or_default();
            return Err(malformed(rendered.trim().to_string()));
        }
    };

    VALUE_WITH_COMMENT
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| malformed(text.clone()))
}

/// `lookup` followed by `scalar_value`.
pub fn lookup_value(
    resource: &Resource,
    meta: &ResourceMeta,
    path: &[&str],
) -> Result<String, FieldError> {
    let node = lookup(resource, meta, path)?;
    scalar_value(node, meta, path)
}

/// Like `lookup_value`, but an absent field is `Ok(None)`.
pub fn lookup_optional(
    resource: &Resource,
    meta: &ResourceMeta,
    path: &[&str],
) -> Result<Option<String>, FieldError> {
    match lookup_value(resource, meta, path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_missing() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(yaml: &str) -> (Resource, ResourceMeta) {
        let r = Resource::new(serde_yaml::from_str(yaml).unwrap()).with_origin("test.yaml", 0);
        let meta = r.meta().unwrap();
        (r, meta)
    }

    const CLUSTER: &str = r#"
apiVersion: container.cnrm.cloud.google.com/v1beta1
kind: ContainerCluster
metadata:
  name: demo
spec:
  loggingService: "logging.googleapis.com/kubernetes  # managed by platform"
  initialNodeCount: 3
  releaseChannel:
    channel: REGULAR
  labels: {}
  nodeConfig: e2-standard-4
  workloadIdentity:
    identityNamespace: ~
  blank: "   "
"#;

    #[test]
    fn test_lookup_nested() {
        let (r, meta) = fixture(CLUSTER);
        let v = lookup_value(&r, &meta, &["spec", "releaseChannel", "channel"]).unwrap();
        assert_eq!(v, "REGULAR");
    }

    #[test]
    fn test_lookup_missing() {
        let (r, meta) = fixture(CLUSTER);
        let err = lookup(&r, &meta, &["spec", "labels", "mesh_id"]).unwrap_err();
        assert!(err.is_missing());
        assert_eq!(
            err.to_string(),
            "spec.labels.mesh_id missing in ContainerCluster demo (test.yaml [0])"
        );
    }

    #[test]
    fn test_lookup_null_is_missing() {
        let (r, meta) = fixture(CLUSTER);
        let err = lookup(&r, &meta, &["spec", "workloadIdentity", "identityNamespace"]).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_lookup_into_scalar_is_malformed() {
        let (r, meta) = fixture(CLUSTER);
        let err = lookup(&r, &meta, &["spec", "nodeConfig", "machineType"]).unwrap_err();
        match &err {
            FieldError::MalformedTree { path, dump, .. } => {
                assert_eq!(path, "spec.nodeConfig.machineType");
                assert!(dump.contains("kind: ContainerCluster"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_scalar_strips_comment() {
        let (r, meta) = fixture(CLUSTER);
        let v = lookup_value(&r, &meta, &["spec", "loggingService"]).unwrap();
        assert_eq!(v, "logging.googleapis.com/kubernetes");
    }

    #[test]
    fn test_scalar_number() {
        let (r, meta) = fixture(CLUSTER);
        let v = lookup_value(&r, &meta, &["spec", "initialNodeCount"]).unwrap();
        assert_eq!(v, "3");
    }

    #[test]
    fn test_scalar_blank_is_malformed() {
        let (r, meta) = fixture(CLUSTER);
        let err = lookup_value(&r, &meta, &["spec", "blank"]).unwrap_err();
        assert!(err.to_string().starts_with("unknown format of spec.blank"));
    }

    #[test]
    fn test_scalar_mapping_is_malformed() {
        let (r, meta) = fixture(CLUSTER);
        let err = lookup_value(&r, &meta, &["spec", "releaseChannel"]).unwrap_err();
        assert!(matches!(err, FieldError::MalformedValue { .. }));
    }

    #[test]
    fn test_lookup_optional() {
        let (r, meta) = fixture(CLUSTER);
        assert_eq!(lookup_optional(&r, &meta, &["spec", "nodeCount"]).unwrap(), None);
        assert_eq!(
            lookup_optional(&r, &meta, &["spec", "initialNodeCount"]).unwrap(),
            Some("3".to_string())
        );
        assert!(lookup_optional(&r, &meta, &["spec", "blank"]).is_err());
    }
}
