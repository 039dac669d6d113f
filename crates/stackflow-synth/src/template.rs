//! Deployment template representation
//!
//! Templates follow the CloudFormation shape: a sorted map of logical id to
//! typed resource, plus optional exported outputs. Sorted maps keep the
//! serialized form deterministic.

use crate::error::{Result, SynthError};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// One resource entry in a template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(rename = "Properties")]
    pub properties: Value,
}

impl TemplateResource {
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
        }
    }
}

/// An exported output of a stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateOutput {
    #[serde(rename = "Value")]
    pub value: Value,

    #[serde(rename = "Export", skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    #[serde(rename = "Name")]
    pub name: String,
}

impl TemplateOutput {
    /// Output exported under the given name for cross-stack consumption
    pub fn exported(value: Value, export_name: impl Into<String>) -> Self {
        Self {
            value,
            export: Some(Export {
                name: export_name.into(),
            }),
        }
    }
}

/// A synthesized deployment template for one stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: String,

    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, TemplateResource>,

    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, TemplateOutput>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            format_version: "2010-09-09".to_string(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource; logical ids must be unique within the template
    pub fn add_resource(
        &mut self,
        stack: &str,
        logical_id: String,
        resource: TemplateResource,
    ) -> Result<()> {
        if self.resources.contains_key(&logical_id) {
            return Err(SynthError::DuplicateLogicalId {
                stack: stack.to_string(),
                logical_id,
            });
        }
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    pub fn resource(&self, logical_id: &str) -> Option<&TemplateResource> {
        self.resources.get(logical_id)
    }

    /// Pretty-printed JSON; stable across synth runs for the same topology
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Derive a template logical id from a declared name.
///
/// Logical ids are alphanumeric only: separators are dropped and the
/// character following one is uppercased, as is the first character.
pub fn logical_id(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        } else {
            upper_next = true;
        }
    }
    out
}

/// `{"Ref": id}` intrinsic
pub(crate) fn r#ref(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attr]}` intrinsic
pub(crate) fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::ImportValue": name}` intrinsic
pub(crate) fn import_value(export_name: &str) -> Value {
    json!({ "Fn::ImportValue": export_name })
}
