//! Dependency ordering of synthesized resources.
//!
//! An edge runs from a resource to everything it names through `Ref`,
//! `Fn::GetAtt`, or `DependsOn`. The plan groups resources into waves: each
//! wave depends only on earlier waves, so an engine may create a wave's
//! members in parallel.

use std::collections::{BTreeMap, BTreeSet};

use efs_stack_common::Template;
use serde::Serialize;

use crate::domain::error::TopologyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedResource {
    pub logical_id: String,
    pub resource_type: String,
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub waves: Vec<Vec<PlannedResource>>,
}

impl Plan {
    /// Logical ids in apply order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.waves
            .iter()
            .flatten()
            .map(|r| r.logical_id.as_str())
            .collect()
    }

    /// Wave index of `logical_id`.
    #[must_use]
    pub fn wave_of(&self, logical_id: &str) -> Option<usize> {
        self.waves
            .iter()
            .position(|w| w.iter().any(|r| r.logical_id == logical_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.waves.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

/// Resource-to-resource edges; references to parameters are dropped.
fn edges(template: &Template) -> BTreeMap<&str, BTreeSet<String>> {
    template
        .resources
        .iter()
        .map(|(id, resource)| {
            let deps: BTreeSet<String> = resource
                .references()
                .into_iter()
                .filter(|d| template.resources.contains_key(d) && d != id)
                .collect();
            (id.as_str(), deps)
        })
        .collect()
}

/// Group the template's resources into dependency waves, leaves first.
///
/// # Errors
///
/// Returns `DependencyCycle` naming the resources that could not be placed.
pub fn apply_order(template: &Template) -> Result<Plan, TopologyError> {
    let mut pending = edges(template);
    let mut placed: BTreeSet<String> = BTreeSet::new();
    let mut waves = Vec::new();

    while !pending.is_empty() {
        let ready: Vec<&str> = pending
            .iter()
            .filter(|(_, deps)| deps.iter().all(|d| placed.contains(d)))
            .map(|(id, _)| *id)
            .collect();
        if ready.is_empty() {
            let stuck: Vec<&str> = pending.keys().copied().collect();
            return Err(TopologyError::DependencyCycle(stuck.join(", ")));
        }

        let mut wave = Vec::with_capacity(ready.len());
        for id in ready {
            let deps = pending.remove(id).unwrap_or_default();
            wave.push(PlannedResource {
                logical_id: id.to_string(),
                resource_type: template.resources[id].resource_type.clone(),
                depends_on: deps.into_iter().collect(),
            });
        }
        placed.extend(wave.iter().map(|r| r.logical_id.clone()));
        waves.push(wave);
    }

    tracing::debug!(waves = waves.len(), "apply order computed");
    Ok(Plan { waves })
}
