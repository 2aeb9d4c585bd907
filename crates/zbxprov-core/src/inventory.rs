// ── Inventory model ──
//
// Ordered groups of devices to provision. Order is preserved end to end
// so reports and progress lines follow the configuration file.

use std::collections::HashSet;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One monitored device: technical host name plus the address its
/// interface points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub address: IpAddr,
}

/// A host group and the devices that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroup {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<Device>,
}

/// Validated inventory: unique group names, unique device names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    groups: Vec<DeviceGroup>,
}

impl Inventory {
    pub fn new(groups: Vec<DeviceGroup>) -> Result<Self, CoreError> {
        let mut group_names = HashSet::new();
        let mut device_names = HashSet::new();

        for group in &groups {
            if group.name.trim().is_empty() {
                return Err(invalid("host group name cannot be empty"));
            }
            if !group_names.insert(group.name.as_str()) {
                return Err(invalid(format!("duplicate host group '{}'", group.name)));
            }
            for device in &group.hosts {
                validate_host_name(&device.name)?;
                if !device_names.insert(device.name.as_str()) {
                    return Err(invalid(format!("duplicate host '{}'", device.name)));
                }
            }
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[DeviceGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn device_count(&self) -> usize {
        self.groups.iter().map(|g| g.hosts.len()).sum()
    }

    /// Every device name, in inventory order.
    pub fn device_names(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.hosts.iter().map(|d| d.name.clone()))
            .collect()
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Config {
        message: message.into(),
    }
}

/// Technical host names: letters, digits, space, dot, dash, underscore.
fn validate_host_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(invalid("host name cannot be empty"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '-' | '_')))
    {
        return Err(invalid(format!(
            "host name '{name}' contains unsupported character {bad:?}"
        )));
    }
    Ok(())
}

/// Visible name derived from a technical name: separators become spaces,
/// then every word is title-cased (`core-1` → `Core 1`).
///
/// A letter is upper-cased when it follows a non-letter and lower-cased
/// otherwise, so `edge_RTR-2b` becomes `Edge Rtr 2B`.
pub fn display_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_letter = false;

    for ch in name.chars() {
        let ch = if matches!(ch, '-' | '_') { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }

    out
}

/// Value of the `network_type` tag: the group name's first word, lowercased.
pub fn network_type(group_name: &str) -> String {
    group_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
