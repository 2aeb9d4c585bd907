// Zabbix API object shapes
//
// Read shapes tolerate the frontend's habit of returning numbers as
// strings ("type": "1"). Write shapes serialize the numeric forms the
// API documents.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Interface type ──────────────────────────────────────────────────

/// Host interface protocol type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(try_from = "NumericCode", into = "u8")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum InterfaceType {
    Agent,
    Snmp,
    Ipmi,
    Jmx,
}

impl InterfaceType {
    /// Numeric code used on the wire.
    pub const fn code(self) -> u8 {
        match self {
            Self::Agent => 1,
            Self::Snmp => 2,
            Self::Ipmi => 3,
            Self::Jmx => 4,
        }
    }

    /// Port the frontend suggests for this interface type.
    pub const fn default_port(self) -> &'static str {
        match self {
            Self::Agent => "10050",
            Self::Snmp => "161",
            Self::Ipmi => "623",
            Self::Jmx => "12345",
        }
    }
}

impl From<InterfaceType> for u8 {
    fn from(value: InterfaceType) -> Self {
        value.code()
    }
}

impl TryFrom<NumericCode> for InterfaceType {
    type Error = String;

    fn try_from(value: NumericCode) -> Result<Self, Self::Error> {
        match value.as_u64()? {
            1 => Ok(Self::Agent),
            2 => Ok(Self::Snmp),
            3 => Ok(Self::Ipmi),
            4 => Ok(Self::Jmx),
            other => Err(format!("unknown interface type {other}")),
        }
    }
}

/// A number the API may send either as a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericCode {
    Number(u64),
    Text(String),
}

impl NumericCode {
    fn as_u64(&self) -> Result<u64, String> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("expected a numeric code, got {s:?}")),
        }
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code = NumericCode::deserialize(deserializer)?;
    code.as_u64()
        .map(|n| n != 0)
        .map_err(serde::de::Error::custom)
}

// ── Read shapes ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostGroup {
    #[serde(rename = "groupid")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "templateid")]
    pub id: String,
    /// Technical name.
    pub host: String,
    /// Visible name.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    #[serde(rename = "hostid")]
    pub id: String,
    /// Technical name (the unique key).
    pub host: String,
    /// Visible name.
    #[serde(default)]
    pub name: String,
    /// Present only when requested with `selectInterfaces`.
    #[serde(default)]
    pub interfaces: Vec<HostInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInterface {
    #[serde(rename = "interfaceid")]
    pub id: String,
    #[serde(rename = "type")]
    pub interface_type: InterfaceType,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub dns: String,
    #[serde(default)]
    pub port: String,
    #[serde(default, deserialize_with = "flag")]
    pub main: bool,
}

// ── Write shapes ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRef {
    pub groupid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRef {
    pub templateid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub value: String,
}

/// SNMP-specific interface settings (`details` object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpDetails {
    pub version: u8,
    pub community: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk: Option<u8>,
}

/// One interface as sent in `host.create` / `hostinterface.create`.
///
/// Always addressed by IP (`useip = 1`); `dns` is sent empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceSpec {
    #[serde(rename = "type")]
    pub interface_type: InterfaceType,
    pub main: u8,
    pub useip: u8,
    pub ip: String,
    pub dns: String,
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<SnmpDetails>,
}

impl InterfaceSpec {
    /// A main, IP-addressed interface.
    pub fn main_by_ip(
        interface_type: InterfaceType,
        ip: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            interface_type,
            main: 1,
            useip: 1,
            ip: ip.into(),
            dns: String::new(),
            port: port.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<SnmpDetails>) -> Self {
        self.details = details;
        self
    }
}

/// `hostinterface.create` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceCreate {
    pub hostid: String,
    #[serde(flatten)]
    pub spec: InterfaceSpec,
}

/// `host.create` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCreate {
    pub host: String,
    pub name: String,
    pub groups: Vec<GroupRef>,
    pub interfaces: Vec<InterfaceSpec>,
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateRef>,
}

// ── Create/delete results ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedGroups {
    pub groupids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedHosts {
    pub hostids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedInterfaces {
    pub interfaceids: Vec<String>,
}
