//! Clap derive structures for the `zbxprov` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use zbxprov_core::SwapOrder;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zbxprov -- provision Zabbix monitoring from an inventory
#[derive(Debug, Parser)]
#[command(
    name = "zbxprov",
    version,
    about = "Provision Zabbix hosts, host groups and interfaces from an inventory",
    long_about = "Creates host groups and hosts in a Zabbix server through its JSON-RPC API,\n\
        idempotently, and migrates existing hosts between interface types\n\
        (agent to SNMP by default).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Frontend profile to use
    #[arg(long, short = 'p', env = "ZBXPROV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Frontend or API endpoint URL (overrides profile)
    #[arg(long, short = 'u', env = "ZBXPROV_URL", global = true)]
    pub url: Option<String>,

    /// Username for user.login (overrides profile)
    #[arg(long, env = "ZBXPROV_USERNAME", global = true)]
    pub username: Option<String>,

    /// Pre-issued API token; skips login
    #[arg(long, env = "ZBXPROV_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ZBXPROV_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZBXPROV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, env = "ZBXPROV_COLOR", default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ZBXPROV_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ZBXPROV_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one name per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create missing host groups and hosts from the inventory
    Setup(SetupArgs),

    /// Replace hosts' first interface with one of the target type
    Migrate(MigrateArgs),

    /// Show the configured inventory
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Print the remote API version (no login)
    Version,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Setup / Migrate ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InventorySource {
    /// Inventory file with [[inventory]] tables (replaces the config's)
    #[arg(long, short = 'i', env = "ZBXPROV_INVENTORY")]
    pub inventory: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    #[command(flatten)]
    pub source: InventorySource,

    /// Look up only; report what would be created
    #[arg(long)]
    pub dry_run: bool,

    /// Create hosts without attaching a template
    #[arg(long)]
    pub no_template: bool,
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Host to migrate (repeatable; defaults to every inventory device)
    #[arg(long = "host", short = 'H', value_name = "NAME")]
    pub hosts: Vec<String>,

    #[command(flatten)]
    pub source: InventorySource,

    /// Order of the create and delete calls
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Look up only; report what would be replaced
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    /// Create the new interface, then delete the old one
    CreateFirst,
    /// Delete the old interface, then create the new one
    DeleteFirst,
}

impl From<OrderArg> for SwapOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::CreateFirst => Self::CreateFirst,
            OrderArg::DeleteFirst => Self::DeleteFirst,
        }
    }
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub source: InventorySource,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the effective configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Set a profile value
    Set {
        /// Key (url, username, password_env, api_token_env, auth_style, insecure, timeout, ca_cert)
        key: String,
        /// Value
        value: String,
    },

    /// Store a password (or API token) in the system keyring
    SetPassword {
        /// Profile to store it for (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,

        /// Store an API token instead of a password
        #[arg(long)]
        token: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
