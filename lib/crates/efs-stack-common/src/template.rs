//! CloudFormation template model.
//!
//! Maps are `BTreeMap`s so the rendered template is byte-stable for a given
//! topology.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::intrinsic;
use crate::types::RemovalPolicy;

pub const FORMAT_VERSION: &str = "2010-09-09";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("duplicate logical id '{0}'")]
    DuplicateLogicalId(String),
}

/// A complete CloudFormation template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,
    pub resources: BTreeMap<String, Resource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

/// A template parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A template output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One resource entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn new(resource_type: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            properties: Map::new(),
            depends_on: Vec::new(),
            update_replace_policy: None,
            deletion_policy: None,
        }
    }

    /// Set a property, replacing any previous value.
    #[must_use]
    pub fn property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Add an explicit ordering dependency.
    #[must_use]
    pub fn depends_on(mut self, logical_id: &str) -> Self {
        if !self.depends_on.iter().any(|d| d == logical_id) {
            self.depends_on.push(logical_id.to_string());
        }
        self
    }

    #[must_use]
    pub fn removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.update_replace_policy = Some(policy.cfn_value().to_string());
        self.deletion_policy = Some(policy.cfn_value().to_string());
        self
    }

    /// Every logical id this resource points at, implicit or explicit.
    #[must_use]
    pub fn references(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        for value in self.properties.values() {
            ids.extend(intrinsic::referenced_ids(value));
        }
        ids.extend(self.depends_on.iter().cloned());
        ids
    }
}

impl Template {
    #[must_use]
    pub fn new(description: Option<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            description,
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Insert a resource, rejecting duplicate logical ids.
    pub fn add_resource(&mut self, logical_id: &str, resource: Resource) -> Result<(), TemplateError> {
        if self.resources.contains_key(logical_id) {
            return Err(TemplateError::DuplicateLogicalId(logical_id.to_string()));
        }
        self.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    pub fn add_parameter(&mut self, name: &str, parameter: Parameter) -> Result<(), TemplateError> {
        if self.parameters.contains_key(name) || self.resources.contains_key(name) {
            return Err(TemplateError::DuplicateLogicalId(name.to_string()));
        }
        self.parameters.insert(name.to_string(), parameter);
        Ok(())
    }

    pub fn add_output(&mut self, name: &str, output: Output) {
        self.outputs.insert(name.to_string(), output);
    }

    /// Logical ids of resources of the given CloudFormation type.
    pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
            .map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn count_of(&self, resource_type: &str) -> usize {
        self.resources_of_type(resource_type).count()
    }
}
