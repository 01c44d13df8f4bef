//! Construct paths and the logical ids derived from them.

use sha2::{Digest, Sha256};

/// Path component elided from the human-readable part of a logical id.
const ELIDED_COMPONENT: &str = "Resource";

/// Hierarchical name of a declared resource, e.g. `Vpc/PublicSubnet1/Subnet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructPath(Vec<String>);

impl ConstructPath {
    #[must_use]
    pub fn new(components: &[&str]) -> Self {
        Self(components.iter().map(|c| (*c).to_string()).collect())
    }

    /// A path one level below this one.
    #[must_use]
    pub fn child(&self, component: &str) -> Self {
        let mut parts = self.0.clone();
        parts.push(component.to_string());
        Self(parts)
    }

    /// `Name` tag value: `<stack>/<path>`.
    #[must_use]
    pub fn tag_name(&self, stack: &str) -> String {
        format!("{stack}/{self}")
    }

    /// CloudFormation logical id.
    ///
    /// Alphanumeric characters of every component except `Resource`, then the
    /// first 8 upper-case hex digits of the SHA-256 of the full path.
    #[must_use]
    pub fn logical_id(&self) -> String {
        let human: String = self
            .0
            .iter()
            .filter(|c| c.as_str() != ELIDED_COMPONENT)
            .flat_map(|c| c.chars().filter(char::is_ascii_alphanumeric))
            .collect();
        let digest = Sha256::digest(self.to_string().as_bytes());
        let suffix: String = digest
            .iter()
            .take(4)
            .map(|b| format!("{b:02X}"))
            .collect();
        format!("{human}{suffix}")
    }
}

impl std::fmt::Display for ConstructPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
