// zbxprov-api: Async JSON-RPC client for the Zabbix API

pub mod auth;
pub mod client;
pub mod error;
pub mod methods;
pub mod models;
pub mod transport;

pub use auth::{AuthStyle, Credentials};
pub use client::ZabbixClient;
pub use error::Error;
pub use models::{
    CreatedGroups, CreatedHosts, CreatedInterfaces, GroupRef, Host, HostCreate, HostGroup,
    HostInterface, InterfaceCreate, InterfaceSpec, InterfaceType, SnmpDetails, Tag, Template,
    TemplateRef,
};
pub use transport::{TlsMode, TransportConfig};
