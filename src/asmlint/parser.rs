//! Reading the resource batch.
//!
//! Two input shapes are accepted: a KRM `ResourceList` (as handed to a
//! kustomize function) and a plain multi-document YAML stream.

use serde::Deserialize;
use serde_yaml::Value;

use crate::asmlint::resource::Resource;
use crate::error::{AsmError, Result};

const RESOURCE_LIST_KIND: &str = "ResourceList";
const RESOURCE_LIST_API_GROUP: &str = "config.kubernetes.io";

/// Parse a YAML string into the resources it declares.
///
/// `source` is recorded as the fallback path of every resource; the
/// fallback index is the position of the document (or list item).
pub fn parse_resources(content: &str, source: &str) -> Result<Vec<Resource>> {
    let mut documents = Vec::new();
    for (position, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = Value::deserialize(document)
            .map_err(|e| AsmError::Parse(format!("document {}: {}", position, e)))?;
        if value.is_null() {
            continue;
        }
        documents.push((position, value));
    }

    if let [(_, only)] = documents.as_slice() {
        if let Some(items) = resource_list_items(only)? {
            log::debug!("reading {} items from ResourceList", items.len());
            return Ok(items
                .iter()
                .enumerate()
                .map(|(i, item)| Resource::new(item.clone()).with_origin(source, i))
                .collect());
        }
    }

    log::debug!("reading {} documents from {}", documents.len(), source);
    Ok(documents
        .into_iter()
        .map(|(position, value)| Resource::new(value).with_origin(source, position))
        .collect())
}

/// Items of a `ResourceList` wrapper, or `None` for any other document.
fn resource_list_items(value: &Value) -> Result<Option<&[Value]>> {
    let kind = value.get("kind").and_then(Value::as_str);
    let api_version = value.get("apiVersion").and_then(Value::as_str);
    let is_list = kind == Some(RESOURCE_LIST_KIND)
        && api_version.is_some_and(|v| v.starts_with(RESOURCE_LIST_API_GROUP));
    if !is_list {
        return Ok(None);
    }

    match value.get("items") {
        Some(Value::Sequence(items)) => Ok(Some(items.as_slice())),
        None | Some(Value::Null) => Ok(Some(&[])),
        Some(_) => Err(AsmError::Parse(
            "ResourceList items must be a sequence".to_string(),
        )),
    }
}
