// ── Provisioning policies ──
//
// The fixed choices a run applies to every item: which template to
// attach, which interface to create, which tags to add, and how the
// migration swaps interfaces.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use zbxprov_api::{InterfaceSpec, InterfaceType, SnmpDetails, Tag};

/// Interface shape applied to every device; only the address varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceTemplate {
    pub interface_type: InterfaceType,
    pub port: String,
    pub snmp: Option<SnmpDetails>,
}

impl InterfaceTemplate {
    /// Zabbix agent interface on port 10050.
    pub fn agent() -> Self {
        Self {
            interface_type: InterfaceType::Agent,
            port: InterfaceType::Agent.default_port().into(),
            snmp: None,
        }
    }

    /// SNMPv2c interface on port 161.
    pub fn snmp_v2(community: impl Into<String>) -> Self {
        Self {
            interface_type: InterfaceType::Snmp,
            port: InterfaceType::Snmp.default_port().into(),
            snmp: Some(SnmpDetails {
                version: 2,
                community: community.into(),
                bulk: None,
            }),
        }
    }

    /// Main, IP-addressed interface for `ip`.
    pub fn spec_for(&self, ip: &str) -> InterfaceSpec {
        let details = if self.interface_type == InterfaceType::Snmp {
            self.snmp.clone()
        } else {
            None
        };
        InterfaceSpec::main_by_ip(self.interface_type, ip, self.port.clone()).with_details(details)
    }
}

/// Settings for the setup flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPolicy {
    /// Technical template name tried first (exact match).
    pub template: Option<String>,
    /// Visible-name fragment tried when the exact match finds nothing.
    pub template_search: Option<String>,
    /// Interface created on every new host.
    pub interface: InterfaceTemplate,
    /// Tags added after the per-group `network_type` tag.
    pub tags: Vec<Tag>,
}

impl Default for SetupPolicy {
    fn default() -> Self {
        Self {
            template: Some("ICMP Ping".into()),
            template_search: Some("ICMP".into()),
            interface: InterfaceTemplate::agent(),
            tags: vec![Tag {
                tag: "environment".into(),
                value: "lab".into(),
            }],
        }
    }
}

impl SetupPolicy {
    /// Same policy with template attachment turned off.
    pub fn without_template(mut self) -> Self {
        self.template = None;
        self.template_search = None;
        self
    }
}

/// Order of the two mutations that swap a host's interface.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SwapOrder {
    /// Create the replacement, then delete the old interface. A failed
    /// create leaves the host as it was.
    #[default]
    CreateFirst,
    /// Delete, then create. A failed create leaves the host without an
    /// interface.
    DeleteFirst,
}

/// Settings for the interface migration flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPolicy {
    pub interface: InterfaceTemplate,
    pub order: SwapOrder,
}

impl Default for MigrationPolicy {
    fn default() -> Self {
        Self {
            interface: InterfaceTemplate::snmp_v2("public"),
            order: SwapOrder::default(),
        }
    }
}
