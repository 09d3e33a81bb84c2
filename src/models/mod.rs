//! Core data models for the connector

use serde::{Deserialize, Serialize};

/// Observable entity types handled by this connector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntityType {
    #[serde(rename = "IPv4-Addr")]
    Ipv4Addr,
    #[serde(rename = "Domain-Name")]
    DomainName,
    #[serde(rename = "X509-Certificate")]
    X509Certificate,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Ipv4Addr => write!(f, "IPv4-Addr"),
            EntityType::DomainName => write!(f, "Domain-Name"),
            EntityType::X509Certificate => write!(f, "X509-Certificate"),
            EntityType::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            _ if s.eq_ignore_ascii_case("IPv4-Addr") => Ok(EntityType::Ipv4Addr),
            _ if s.eq_ignore_ascii_case("Domain-Name") => Ok(EntityType::DomainName),
            _ if s.eq_ignore_ascii_case("X509-Certificate") => Ok(EntityType::X509Certificate),
            _ => Err(format!("unsupported observable type: {}", s)),
        }
    }
}

/// Traffic light protocol for sharing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Tlp {
    White,  // Public
    Green,  // Community
    Amber,  // Limited
    Red,    // Restricted
}

impl std::fmt::Display for Tlp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tlp::White => write!(f, "TLP:WHITE"),
            Tlp::Green => write!(f, "TLP:GREEN"),
            Tlp::Amber => write!(f, "TLP:AMBER"),
            Tlp::Red => write!(f, "TLP:RED"),
        }
    }
}

impl std::str::FromStr for Tlp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TLP:WHITE" | "TLP:CLEAR" => Ok(Tlp::White),
            "TLP:GREEN" => Ok(Tlp::Green),
            "TLP:AMBER" => Ok(Tlp::Amber),
            "TLP:RED" => Ok(Tlp::Red),
            _ => Err(format!("unknown TLP marking: {}", s)),
        }
    }
}

/// A hash attached to an observable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hash {
    pub algorithm: String,
    pub hash: String,
}

/// A marking definition attached to an observable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkingDefinition {
    pub definition_type: String,
    pub definition: String,
}

/// An observable as read from the platform. Read-only to this connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observable {
    pub id: String,
    pub entity_type: EntityType,
    #[serde(rename = "observable_value")]
    pub value: String,
    #[serde(default)]
    pub hashes: Option<Vec<Hash>>,
    #[serde(default, rename = "objectMarking")]
    pub object_marking: Option<Vec<MarkingDefinition>>,
}

impl Observable {
    /// The observable's SHA-256 hash, if one is attached
    pub fn sha256(&self) -> Option<&str> {
        self.hashes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|h| h.algorithm.eq_ignore_ascii_case("SHA-256"))
            .map(|h| h.hash.as_str())
    }

    pub fn markings(&self) -> &[MarkingDefinition] {
        self.object_marking.as_deref().unwrap_or_default()
    }
}

/// Check every TLP marking against the configured ceiling.
///
/// Non-TLP markings are ignored. A TLP marking that cannot be parsed fails
/// closed and blocks the observable.
pub fn check_max_tlp(markings: &[MarkingDefinition], max_tlp: Tlp) -> bool {
    markings
        .iter()
        .filter(|m| m.definition_type.eq_ignore_ascii_case("TLP"))
        .all(|m| match m.definition.parse::<Tlp>() {
            Ok(tlp) => tlp <= max_tlp,
            Err(_) => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tlp_marking(definition: &str) -> MarkingDefinition {
        MarkingDefinition {
            definition_type: "TLP".to_string(),
            definition: definition.to_string(),
        }
    }

    #[test]
    fn tlp_ordering() {
        assert!(Tlp::White < Tlp::Green);
        assert!(Tlp::Green < Tlp::Amber);
        assert!(Tlp::Amber < Tlp::Red);
    }

    #[test]
    fn tlp_parses_clear_as_white() {
        assert_eq!("TLP:CLEAR".parse::<Tlp>(), Ok(Tlp::White));
        assert_eq!("tlp:green".parse::<Tlp>(), Ok(Tlp::Green));
        assert!("TLP:ULTRAVIOLET".parse::<Tlp>().is_err());
    }

    #[test]
    fn check_max_tlp_allows_at_or_below_ceiling() {
        let markings = vec![tlp_marking("TLP:GREEN"), tlp_marking("TLP:AMBER")];
        assert!(check_max_tlp(&markings, Tlp::Amber));
        assert!(!check_max_tlp(&markings, Tlp::Green));
    }

    #[test]
    fn check_max_tlp_ignores_non_tlp_markings() {
        let markings = vec![MarkingDefinition {
            definition_type: "statement".to_string(),
            definition: "Copyright 2026".to_string(),
        }];
        assert!(check_max_tlp(&markings, Tlp::White));
    }

    #[test]
    fn check_max_tlp_fails_closed_on_unknown_tlp() {
        let markings = vec![tlp_marking("TLP:AMBER+STRICT")];
        assert!(!check_max_tlp(&markings, Tlp::Red));
    }

    #[test]
    fn check_max_tlp_passes_unmarked_observables() {
        assert!(check_max_tlp(&[], Tlp::White));
    }

    #[test]
    fn entity_type_deserializes_platform_names() {
        assert_eq!(
            serde_json::from_value::<EntityType>(json!("IPv4-Addr")).unwrap(),
            EntityType::Ipv4Addr
        );
        assert_eq!(
            serde_json::from_value::<EntityType>(json!("StixFile")).unwrap(),
            EntityType::Other
        );
    }

    #[test]
    fn entity_type_from_str_rejects_unknown() {
        assert!("Email-Addr".parse::<EntityType>().is_err());
        assert_eq!(
            "x509-certificate".parse::<EntityType>(),
            Ok(EntityType::X509Certificate)
        );
    }

    #[test]
    fn observable_sha256_lookup() {
        let observable: Observable = serde_json::from_value(json!({
            "id": "x509-certificate--d3f1",
            "entity_type": "X509-Certificate",
            "observable_value": "CN=example.com",
            "hashes": [
                { "algorithm": "SHA-1", "hash": "aa" },
                { "algorithm": "SHA-256", "hash": "bb" }
            ]
        }))
        .unwrap();

        assert_eq!(observable.sha256(), Some("bb"));
        assert!(observable.markings().is_empty());
    }
}
