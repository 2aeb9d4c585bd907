//! Command dispatch: bridges CLI args -> core pipelines -> output formatting.

pub mod config_cmd;
pub mod inventory;
pub mod migrate;
pub mod setup;
pub mod util;
pub mod version;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a frontend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Setup(args) => setup::handle(&args, cfg, global).await,
        Command::Migrate(args) => migrate::handle(args, cfg, global).await,
        Command::Inventory(args) => inventory::handle(&args, cfg, global),
        Command::Version => version::handle(cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
