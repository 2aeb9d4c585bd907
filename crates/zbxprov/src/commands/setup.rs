//! `setup`: create missing host groups and hosts.

use zbxprov_core::{
    CoreError, Inventory, Session, SetupOptions, SetupPolicy, SetupReport, TemplateResolution,
};

use crate::cli::{GlobalOpts, SetupArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Progress};

use super::util;

pub async fn handle(args: &SetupArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let inventory = config::resolve_inventory(&args.source, cfg)?;
    let mut policy = cfg.setup.to_policy()?;
    if args.no_template {
        policy = policy.without_template();
    }
    let options = SetupOptions {
        dry_run: args.dry_run,
    };

    let connection = config::resolve_connection(global, cfg)?;
    let frontend = util::frontend_url(&connection.url);
    let progress = util::progress(global);

    progress.step(&format!("Connecting to {}", connection.url));
    let session = Session::connect(&connection).await?;

    let result = run_steps(&session, &inventory, &policy, options, &progress).await;

    // Log out even when a step hit a transport fault.
    session.close().await;
    let report = result?;

    let items: Vec<_> = report.items().collect();
    let out = output::render_report(global.output, &report, &items)?;
    output::print_output(&out, global.quiet);

    if args.dry_run {
        progress.done("Dry run complete; nothing was created.");
    } else {
        progress.done("Done! Hosts configured in Zabbix.");
    }
    progress.note(&format!("Access Zabbix at: {frontend}"));
    util::warn_failures(&progress, report.failures());
    Ok(())
}

async fn run_steps(
    session: &Session,
    inventory: &Inventory,
    policy: &SetupPolicy,
    options: SetupOptions,
    progress: &Progress,
) -> Result<SetupReport, CoreError> {
    progress.step("Looking up template");
    let template = session.resolve_template(policy).await?;
    progress.note(&describe_template(&template));

    progress.step(&format!(
        "Reconciling {} host groups",
        inventory.groups().len()
    ));
    let groups = session
        .reconcile_groups(inventory, options, |item| progress.item(item))
        .await?;

    progress.step(&format!("Reconciling {} hosts", inventory.device_count()));
    let hosts = session
        .reconcile_hosts(
            inventory,
            &groups.slots,
            &template,
            policy,
            options,
            |item| progress.item(item),
        )
        .await?;

    Ok(SetupReport {
        template,
        groups: groups.report,
        hosts,
    })
}

fn describe_template(template: &TemplateResolution) -> String {
    match template {
        TemplateResolution::Disabled => "template attachment disabled".into(),
        TemplateResolution::Found { name, exact: true, .. } => format!("using template '{name}'"),
        TemplateResolution::Found { name, .. } => {
            format!("using template '{name}' (matched by search)")
        }
        TemplateResolution::NotFound => "no template found; hosts created without one".into(),
        TemplateResolution::Failed { reason } => {
            format!("template lookup failed ({reason}); hosts created without one")
        }
    }
}
