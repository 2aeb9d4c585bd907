//! `inventory`: show the devices setup would provision.

use serde::Serialize;
use tabled::Tabled;

use zbxprov_core::{Inventory, display_name, network_type};

use crate::cli::{GlobalOpts, InventoryArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// One device as setup would create it.
#[derive(Debug, Clone, Serialize, Tabled)]
struct DeviceRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Visible name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "network_type")]
    network_type: String,
}

fn rows(inventory: &Inventory) -> Vec<DeviceRow> {
    inventory
        .groups()
        .iter()
        .flat_map(|group| {
            group.hosts.iter().map(move |device| DeviceRow {
                group: group.name.clone(),
                host: device.name.clone(),
                name: display_name(&device.name),
                address: device.address.to_string(),
                network_type: network_type(&group.name),
            })
        })
        .collect()
}

pub fn handle(args: &InventoryArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let inventory = config::resolve_inventory(&args.source, cfg)?;

    if inventory.is_empty() {
        if !global.quiet {
            eprintln!("Inventory is empty. Add [[inventory]] tables to the config or pass --inventory.");
        }
        return Ok(());
    }

    let rows = rows(&inventory);
    let out = output::render_list(global.output, &rows, DeviceRow::clone, |r| r.host.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
