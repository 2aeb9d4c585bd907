//! Reconciliation pipeline between `zbxprov-api` and the CLI.
//!
//! This crate owns the inventory model and the two provisioning flows:
//!
//! - **[`Session`]**: authenticated handle around a [`ZabbixClient`].
//!   [`Session::connect`] is the fatal first step of every flow;
//!   [`Session::close`] ends password sessions.
//!
//! - **Setup** ([`setup`]): the ordered steps *resolve template →
//!   reconcile groups → reconcile hosts*, each returning its own report
//!   so callers and tests can target steps independently.
//!
//! - **Migration** ([`migrate`]): replaces each host's first interface
//!   with one of the target type, in a configurable [`SwapOrder`].
//!
//! - **Reports** ([`report`]): every inventory item ends as an
//!   [`ItemReport`] with an [`Outcome`]; API rejections of one item are
//!   recorded, while transport faults end the flow as a [`CoreError`].
//!
//! [`ZabbixClient`]: zbxprov_api::ZabbixClient

pub mod config;
pub mod error;
pub mod inventory;
pub mod migrate;
pub mod policy;
pub mod report;
pub mod session;
pub mod setup;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ConnectionConfig, TlsVerification};
pub use error::CoreError;
pub use inventory::{Device, DeviceGroup, Inventory, display_name, network_type};
pub use migrate::{MigrationOptions, MigrationReport};
pub use policy::{InterfaceTemplate, MigrationPolicy, SetupPolicy, SwapOrder};
pub use report::{EntityKind, ItemReport, Outcome, StepReport};
pub use session::Session;
pub use setup::{SetupOptions, SetupReport, TemplateResolution};

pub use zbxprov_api::{AuthStyle, InterfaceType, SnmpDetails, Tag};
