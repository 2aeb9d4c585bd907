//! `version`: remote API version, no login.

use serde::Serialize;

use zbxprov_core::session::api_version;

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct VersionInfo {
    endpoint: String,
    api_version: String,
}

pub async fn handle(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let endpoint = config::resolve_endpoint(global, cfg)?;
    let version = api_version(endpoint.url.clone(), &endpoint.tls, endpoint.timeout).await?;

    let info = VersionInfo {
        endpoint: endpoint.url.to_string(),
        api_version: version,
    };
    let out = output::render_single(
        global.output,
        &info,
        |i| format!("Zabbix API {} at {}", i.api_version, i.endpoint),
        |i| i.api_version.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
