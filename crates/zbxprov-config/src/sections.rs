// ── Policy and inventory sections ──
//
// Every field is optional: the built-in policies supply the defaults and
// a section only overrides what it names.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use zbxprov_core::{
    CoreError, DeviceGroup, InterfaceTemplate, InterfaceType, Inventory, MigrationPolicy,
    SetupPolicy, SnmpDetails, SwapOrder, Tag,
};

use crate::ConfigError;

/// Interface shape as written in TOML:
/// `{ type = "snmp", port = "161", snmp_version = 2, community = "public" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterfaceSection {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmp_version: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
}

impl InterfaceSection {
    /// Apply this section over `base`. Changing the type resets the port
    /// to that type's default unless a port is given too.
    fn apply(&self, base: InterfaceTemplate) -> Result<InterfaceTemplate, ConfigError> {
        let mut template = base;

        if let Some(ref kind) = self.kind {
            let parsed = InterfaceType::from_str(kind).map_err(|_| ConfigError::Validation {
                field: "interface.type".into(),
                reason: format!("expected agent, snmp, ipmi or jmx, got '{kind}'"),
            })?;
            if parsed != template.interface_type {
                template.interface_type = parsed;
                template.port = parsed.default_port().into();
            }
        }

        if let Some(ref port) = self.port {
            let valid = port.parse::<u16>().is_ok_and(|p| p > 0);
            if !valid {
                return Err(ConfigError::Validation {
                    field: "interface.port".into(),
                    reason: format!("expected a port number, got '{port}'"),
                });
            }
            template.port.clone_from(port);
        }

        if template.interface_type == InterfaceType::Snmp {
            let mut details = template.snmp.take().unwrap_or_else(|| SnmpDetails {
                version: 2,
                community: "public".into(),
                bulk: None,
            });
            if let Some(version) = self.snmp_version {
                if !(1..=3).contains(&version) {
                    return Err(ConfigError::Validation {
                        field: "interface.snmp_version".into(),
                        reason: format!("expected 1, 2 or 3, got {version}"),
                    });
                }
                details.version = version;
            }
            if let Some(ref community) = self.community {
                details.community.clone_from(community);
            }
            template.snmp = Some(details);
        }

        Ok(template)
    }
}

/// `[setup]`: template, interface and tags for new hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SetupSection {
    /// Exact technical template name; empty disables the exact lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Visible-name fragment for the fallback search; empty disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<InterfaceSection>,
    /// Fixed tags; replaces the default `environment = "lab"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<IndexMap<String, String>>,
}

impl SetupSection {
    pub fn to_policy(&self) -> Result<SetupPolicy, ConfigError> {
        let mut policy = SetupPolicy::default();

        if let Some(ref template) = self.template {
            policy.template = non_empty(template);
        }
        if let Some(ref search) = self.template_search {
            policy.template_search = non_empty(search);
        }
        if let Some(ref interface) = self.interface {
            policy.interface = interface.apply(policy.interface)?;
        }
        if let Some(ref tags) = self.tags {
            policy.tags = tags
                .iter()
                .map(|(tag, value)| Tag {
                    tag: tag.clone(),
                    value: value.clone(),
                })
                .collect();
        }

        Ok(policy)
    }
}

/// `[migrate]`: target interface and swap order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MigrateSection {
    /// "create-first" or "delete-first".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<InterfaceSection>,
}

impl MigrateSection {
    pub fn to_policy(&self) -> Result<MigrationPolicy, ConfigError> {
        let mut policy = MigrationPolicy::default();

        if let Some(ref order) = self.order {
            policy.order = SwapOrder::from_str(order).map_err(|_| ConfigError::Validation {
                field: "migrate.order".into(),
                reason: format!("expected 'create-first' or 'delete-first', got '{order}'"),
            })?;
        }
        if let Some(ref interface) = self.interface {
            policy.interface = interface.apply(policy.interface)?;
        }

        Ok(policy)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ── Inventory ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct InventoryFile {
    #[serde(default)]
    inventory: Vec<DeviceGroup>,
}

/// Read the `[[inventory]]` tables of a standalone inventory file.
pub fn load_inventory_file(path: &Path) -> Result<Vec<DeviceGroup>, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let file: InventoryFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.inventory)
}

/// Validate raw groups into an [`Inventory`].
pub fn build_inventory(groups: Vec<DeviceGroup>) -> Result<Inventory, ConfigError> {
    Inventory::new(groups).map_err(|e| ConfigError::Validation {
        field: "inventory".into(),
        reason: match e {
            CoreError::Config { message } => message,
            other => other.to_string(),
        },
    })
}
