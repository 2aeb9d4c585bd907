// ── Interface migration ──
//
// Replace each host's first interface with one of the target type at the
// same address. Hosts are fetched in one bulk lookup; every host after
// that is handled on its own and API failures are recorded per host. A
// transport fault ends the run.

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use zbxprov_api::{Host, HostInterface, InterfaceCreate, InterfaceType};

use crate::error::{CoreError, item_failure};
use crate::policy::{MigrationPolicy, SwapOrder};
use crate::report::{EntityKind, ItemReport, Outcome, StepReport};
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Look up only; report what would be swapped.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub target: InterfaceType,
    pub order: SwapOrder,
    pub hosts: StepReport,
}

impl MigrationReport {
    pub fn failures(&self) -> usize {
        self.hosts.failures()
    }
}

impl Session {
    /// Migrate the first interface of every named host to the policy's
    /// interface type.
    ///
    /// Returns `Err` when the bulk host lookup fails or the frontend stops
    /// answering; names that match no host are reported as skipped.
    pub async fn migrate_interfaces(
        &self,
        names: &[String],
        policy: &MigrationPolicy,
        options: MigrationOptions,
        mut on_item: impl FnMut(&ItemReport),
    ) -> Result<MigrationReport, CoreError> {
        let target = policy.interface.interface_type;
        let mut report = MigrationReport {
            target,
            order: policy.order,
            hosts: StepReport::default(),
        };

        let wanted: IndexSet<&str> = names.iter().map(String::as_str).collect();
        if wanted.is_empty() {
            // An empty host filter matches every host; never send one.
            debug!("no hosts to migrate");
            return Ok(report);
        }

        let lookup: Vec<&str> = wanted.iter().copied().collect();
        let found = self.client().hosts_by_name(&lookup, true).await?;
        info!(requested = lookup.len(), found = found.len(), "hosts fetched");

        for name in wanted {
            let outcome = match found.iter().find(|h| h.host == name) {
                None => Outcome::Skipped {
                    reason: "host not found".into(),
                },
                Some(host) => self.migrate_host(host, policy, options).await?,
            };
            let item = ItemReport::new(EntityKind::Host, name, outcome);
            on_item(&item);
            report.hosts.push(item);
        }

        info!(
            hosts = report.hosts.len(),
            replaced = report.hosts.changes(),
            failed = report.failures(),
            "interface migration finished"
        );
        Ok(report)
    }

    async fn migrate_host(
        &self,
        host: &Host,
        policy: &MigrationPolicy,
        options: MigrationOptions,
    ) -> Result<Outcome, CoreError> {
        let Some(current) = host.interfaces.first() else {
            return Ok(Outcome::Skipped {
                reason: "host has no interfaces".into(),
            });
        };

        let target = policy.interface.interface_type;
        if current.interface_type == target {
            return Ok(Outcome::Unchanged {
                detail: format!("already {target} on {}", current.ip),
            });
        }
        if current.ip.is_empty() {
            return Ok(Outcome::Skipped {
                reason: format!("interface {} has no IP address", current.id),
            });
        }

        if options.dry_run {
            return Ok(Outcome::Planned {
                detail: format!(
                    "replace {} interface {} with {target} on {}:{}",
                    current.interface_type, current.id, current.ip, policy.interface.port
                ),
            });
        }

        let create = InterfaceCreate {
            hostid: host.id.clone(),
            spec: policy.interface.spec_for(&current.ip),
        };

        match policy.order {
            SwapOrder::CreateFirst => self.create_then_delete(current, &create).await,
            SwapOrder::DeleteFirst => self.delete_then_create(host, current, &create).await,
        }
    }

    async fn create_then_delete(
        &self,
        current: &HostInterface,
        create: &InterfaceCreate,
    ) -> Result<Outcome, CoreError> {
        let new_id = match self.client().create_interface(create).await {
            Ok(id) => id,
            Err(e) => {
                return Ok(Outcome::Failed {
                    reason: format!(
                        "create failed, interface {} kept: {}",
                        current.id,
                        item_failure(e)?
                    ),
                });
            }
        };

        if let Err(e) = self.client().delete_interfaces(&[current.id.as_str()]).await {
            warn!(interface = %current.id, error = %e, "old interface not removed");
            return Ok(Outcome::Failed {
                reason: format!(
                    "interface {new_id} created but {} not deleted: {}",
                    current.id,
                    item_failure(e)?
                ),
            });
        }

        Ok(Outcome::Replaced {
            old_id: current.id.clone(),
            new_id,
            address: current.ip.clone(),
        })
    }

    async fn delete_then_create(
        &self,
        host: &Host,
        current: &HostInterface,
        create: &InterfaceCreate,
    ) -> Result<Outcome, CoreError> {
        if let Err(e) = self.client().delete_interfaces(&[current.id.as_str()]).await {
            return Ok(Outcome::Failed {
                reason: format!("delete failed: {}", item_failure(e)?),
            });
        }

        match self.client().create_interface(create).await {
            Ok(new_id) => Ok(Outcome::Replaced {
                old_id: current.id.clone(),
                new_id,
                address: current.ip.clone(),
            }),
            Err(e) => {
                error!(
                    host = %host.host,
                    interface = %current.id,
                    error = %e,
                    "interface deleted but not recreated; host has no interface"
                );
                Ok(Outcome::Failed {
                    reason: format!(
                        "interface {} deleted but create failed; host has no interface: {}",
                        current.id,
                        item_failure(e)?
                    ),
                })
            }
        }
    }
}
