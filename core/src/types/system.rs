//! System references.
//!
//! Some responses point at systems that may no longer exist. The
//! [`SystemReference`] trait lets callers treat a fully-described reference
//! and an ID-only placeholder the same way.

use serde::{Deserialize, Serialize};

use super::ids::SystemId;

wire_enum! {
    /// Connection state of an enrolled system.
    pub enum SystemState {
        Disabled,
        Connected,
        Disconnected,
    }
}

wire_enum! {
    /// Lifetime class of a system, inherited from its enrolment key.
    pub enum SystemType {
        GeneralPurpose,
        Ephemeral,
    }
}

/// Common view over system reference models.
pub trait SystemReference {
    /// Last IP address the system connected from.
    fn connected_from(&self) -> Option<&str>;

    fn id(&self) -> &SystemId;

    /// Local hostname of the system, if known.
    fn machine_name(&self) -> Option<&str>;

    /// Name given to the system, if one was provided.
    fn name(&self) -> Option<&str>;

    fn platform_type(&self) -> Option<&str>;

    fn state(&self) -> SystemState;

    /// Name to show a user: the given name, then the hostname, then the ID.
    fn display_name(&self) -> &str {
        self.name()
            .or_else(|| self.machine_name())
            .unwrap_or_else(|| self.id().as_str())
    }
}

/// A reference to a system the API knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemReferenceModel {
    pub id: SystemId,
    pub connected_from: Option<String>,
    pub machine_name: Option<String>,
    pub name: Option<String>,
    pub platform_type: Option<String>,
    pub state: SystemState,
}

impl SystemReference for SystemReferenceModel {
    fn connected_from(&self) -> Option<&str> {
        self.connected_from.as_deref()
    }

    fn id(&self) -> &SystemId {
        &self.id
    }

    fn machine_name(&self) -> Option<&str> {
        self.machine_name.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn platform_type(&self) -> Option<&str> {
        self.platform_type.as_deref()
    }

    fn state(&self) -> SystemState {
        self.state
    }
}

/// A system known only by ID, e.g. one that has since been removed.
/// Reports itself as disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderSystemReference {
    pub id: SystemId,
}

impl SystemReference for PlaceholderSystemReference {
    fn connected_from(&self) -> Option<&str> {
        None
    }

    fn id(&self) -> &SystemId {
        &self.id
    }

    fn machine_name(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn platform_type(&self) -> Option<&str> {
        None
    }

    fn state(&self) -> SystemState {
        SystemState::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_mix_behind_the_trait() {
        let known: SystemReferenceModel = serde_json::from_str(
            r#"{"id":"Ab3xZ","connectedFrom":"203.0.113.9","machineName":"build-01",
                "name":null,"platformType":"Linux","state":"Connected"}"#,
        )
        .unwrap();
        let gone = PlaceholderSystemReference {
            id: SystemId::new("Qq7Rt"),
        };

        let refs: Vec<&dyn SystemReference> = vec![&known, &gone];
        let names: Vec<&str> = refs.iter().map(|r| r.display_name()).collect();
        assert_eq!(names, ["build-01", "Qq7Rt"]);
        assert_eq!(refs[0].state(), SystemState::Connected);
        assert_eq!(refs[0].connected_from(), Some("203.0.113.9"));
        assert_eq!(refs[1].state(), SystemState::Disabled);
        assert_eq!(refs[1].platform_type(), None);
    }

    #[test]
    fn given_name_wins_over_hostname() {
        let model = SystemReferenceModel {
            id: SystemId::new("Ab3xZ"),
            connected_from: None,
            machine_name: Some("build-01".to_string()),
            name: Some("CI runner".to_string()),
            platform_type: None,
            state: SystemState::Disconnected,
        };
        assert_eq!(model.display_name(), "CI runner");
    }
}
