//! `migrate`: swap each host's first interface for the target type.

use zbxprov_core::{MigrationOptions, Session};

use crate::cli::{GlobalOpts, MigrateArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: MigrateArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let mut policy = cfg.migrate.to_policy()?;
    if let Some(order) = args.order {
        policy.order = order.into();
    }

    // Explicit --host names win; otherwise every inventory device.
    let names = if args.hosts.is_empty() {
        config::resolve_inventory(&args.source, cfg)?.device_names()
    } else {
        args.hosts
    };

    let connection = config::resolve_connection(global, cfg)?;
    let progress = util::progress(global);

    progress.step(&format!("Connecting to {}", connection.url));
    let session = Session::connect(&connection).await?;

    progress.step(&format!(
        "Migrating {} hosts to {} interfaces ({})",
        names.len(),
        policy.interface.interface_type,
        policy.order
    ));
    let result = session
        .migrate_interfaces(
            &names,
            &policy,
            MigrationOptions {
                dry_run: args.dry_run,
            },
            |item| progress.item(item),
        )
        .await;

    // Log out even when the bulk lookup failed.
    session.close().await;
    let report = result?;

    let items: Vec<_> = report.hosts.items().iter().collect();
    let out = output::render_report(global.output, &report, &items)?;
    output::print_output(&out, global.quiet);

    if args.dry_run {
        progress.done("Dry run complete; no interface was changed.");
    } else {
        progress.done(&format!(
            "Done! Hosts now use {} interfaces.",
            report.target.to_string().to_uppercase()
        ));
    }
    util::warn_failures(&progress, report.failures());
    Ok(())
}
