//! Cloud assembly manifest: the index an external engine reads to find the
//! synthesized template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_VERSION: &str = "36.0.0";
pub const STACK_ARTIFACT_TYPE: &str = "aws:cloudformation:stack";
/// Environment-agnostic target; account and region are chosen at deploy time.
pub const UNKNOWN_ENVIRONMENT: &str = "aws://unknown-account/unknown-region";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub version: String,
    pub artifacts: BTreeMap<String, Artifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub environment: String,
    pub properties: ArtifactProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactProperties {
    pub template_file: String,
}

/// File name of the template for `stack`.
#[must_use]
pub fn template_file_name(stack: &str) -> String {
    format!("{stack}.template.json")
}

impl Manifest {
    /// Manifest listing the single stack artifact.
    #[must_use]
    pub fn for_stack(stack: &str) -> Self {
        let artifact = Artifact {
            artifact_type: STACK_ARTIFACT_TYPE.to_string(),
            environment: UNKNOWN_ENVIRONMENT.to_string(),
            properties: ArtifactProperties {
                template_file: template_file_name(stack),
            },
        };
        Self {
            version: MANIFEST_VERSION.to_string(),
            artifacts: BTreeMap::from([(stack.to_string(), artifact)]),
        }
    }
}
