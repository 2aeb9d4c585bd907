// ── Setup pipeline ──
//
// resolve template → reconcile groups → reconcile hosts. Each step is a
// public method returning its own report so it can be driven and tested
// on its own; `run_setup` chains them. Lookups always happen; creates are
// skipped in dry-run mode. API rejections are recorded per item; transport
// faults end the run.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use zbxprov_api::{GroupRef, HostCreate, Tag, Template, TemplateRef};

use crate::error::{CoreError, item_failure};
use crate::inventory::{Device, DeviceGroup, Inventory, display_name, network_type};
use crate::policy::SetupPolicy;
use crate::report::{EntityKind, ItemReport, Outcome, StepReport};
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupOptions {
    /// Look up only; report what would be created.
    pub dry_run: bool,
}

/// Result of the template step. Only `Found` attaches a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TemplateResolution {
    Disabled,
    Found {
        id: String,
        name: String,
        /// False when found by the fallback substring search.
        exact: bool,
    },
    NotFound,
    Failed {
        reason: String,
    },
}

impl TemplateResolution {
    pub fn template_id(&self) -> Option<&str> {
        match self {
            Self::Found { id, .. } => Some(id),
            _ => None,
        }
    }

    fn found(template: Template, exact: bool) -> Self {
        Self::Found {
            id: template.id,
            name: template.host,
            exact,
        }
    }
}

/// A group the host step can place devices into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSlot {
    Id(String),
    /// Dry run: the group would be created.
    Planned,
}

/// Output of the group step: the report plus the usable groups by name.
/// Groups that failed are absent from `slots`.
#[derive(Debug, Clone, Default)]
pub struct GroupStep {
    pub report: StepReport,
    pub slots: IndexMap<String, GroupSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    pub template: TemplateResolution,
    pub groups: StepReport,
    pub hosts: StepReport,
}

impl SetupReport {
    pub fn items(&self) -> impl Iterator<Item = &ItemReport> {
        self.groups.items().iter().chain(self.hosts.items())
    }

    pub fn failures(&self) -> usize {
        self.groups.failures() + self.hosts.failures()
    }
}

impl Session {
    /// Find the template to attach: exact technical name first, then a
    /// visible-name substring search. API failures are tolerated; a
    /// transport fault is returned as an error.
    pub async fn resolve_template(
        &self,
        policy: &SetupPolicy,
    ) -> Result<TemplateResolution, CoreError> {
        if policy.template.is_none() && policy.template_search.is_none() {
            return Ok(TemplateResolution::Disabled);
        }

        let mut first_error = None;

        if let Some(exact) = policy.template.as_deref() {
            match self.client().templates_by_host(exact).await {
                Ok(found) => {
                    if let Some(template) = found.into_iter().next() {
                        info!(template = exact, "template found");
                        return Ok(TemplateResolution::found(template, true));
                    }
                }
                Err(e) => {
                    let reason = item_failure(e)?;
                    warn!(template = exact, error = %reason, "template lookup failed");
                    first_error = Some(reason);
                }
            }
        }

        if let Some(fragment) = policy.template_search.as_deref() {
            match self.client().templates_search_name(fragment).await {
                Ok(found) => {
                    if let Some(template) = found.into_iter().next() {
                        info!(template = %template.host, "template found by search");
                        return Ok(TemplateResolution::found(template, false));
                    }
                }
                Err(e) => {
                    let reason = item_failure(e)?;
                    warn!(fragment, error = %reason, "template search failed");
                    first_error.get_or_insert(reason);
                }
            }
        }

        Ok(match first_error {
            Some(reason) => TemplateResolution::Failed { reason },
            None => {
                warn!("no template found; hosts will be created without one");
                TemplateResolution::NotFound
            }
        })
    }

    /// Look up each group by exact name and create the missing ones.
    pub async fn reconcile_groups(
        &self,
        inventory: &Inventory,
        options: SetupOptions,
        mut on_item: impl FnMut(&ItemReport),
    ) -> Result<GroupStep, CoreError> {
        let mut step = GroupStep::default();

        for group in inventory.groups() {
            let (outcome, slot) = self.reconcile_group(&group.name, options).await?;
            if let Some(slot) = slot {
                step.slots.insert(group.name.clone(), slot);
            }
            let item = ItemReport::new(EntityKind::HostGroup, &group.name, outcome);
            on_item(&item);
            step.report.push(item);
        }

        info!(
            groups = step.report.len(),
            failed = step.report.failures(),
            "host groups reconciled"
        );
        Ok(step)
    }

    async fn reconcile_group(
        &self,
        name: &str,
        options: SetupOptions,
    ) -> Result<(Outcome, Option<GroupSlot>), CoreError> {
        let found = match self.client().host_groups_by_name(name).await {
            Ok(found) => found,
            Err(e) => {
                let reason = format!("lookup failed: {}", item_failure(e)?);
                return Ok((Outcome::Failed { reason }, None));
            }
        };

        if let Some(group) = found.into_iter().next() {
            let slot = GroupSlot::Id(group.id.clone());
            return Ok((Outcome::Existing { id: group.id }, Some(slot)));
        }
        if options.dry_run {
            return Ok((
                Outcome::Planned {
                    detail: "create host group".into(),
                },
                Some(GroupSlot::Planned),
            ));
        }
        Ok(match self.client().create_host_group(name).await {
            Ok(id) => (Outcome::Created { id: id.clone() }, Some(GroupSlot::Id(id))),
            Err(e) => (
                Outcome::Failed {
                    reason: item_failure(e)?,
                },
                None,
            ),
        })
    }

    /// Look up each device by exact technical name and create the missing
    /// ones in their group. Devices whose group is unavailable are skipped
    /// without any call.
    pub async fn reconcile_hosts(
        &self,
        inventory: &Inventory,
        groups: &IndexMap<String, GroupSlot>,
        template: &TemplateResolution,
        policy: &SetupPolicy,
        options: SetupOptions,
        mut on_item: impl FnMut(&ItemReport),
    ) -> Result<StepReport, CoreError> {
        let mut report = StepReport::default();

        for group in inventory.groups() {
            let slot = groups.get(&group.name);
            for device in &group.hosts {
                let outcome = match slot {
                    None => Outcome::Skipped {
                        reason: format!("host group '{}' unavailable", group.name),
                    },
                    Some(slot) => {
                        self.reconcile_host(group, device, slot, template, policy, options)
                            .await?
                    }
                };
                let item = ItemReport::new(EntityKind::Host, &device.name, outcome);
                on_item(&item);
                report.push(item);
            }
        }

        info!(
            hosts = report.len(),
            created = report.changes(),
            failed = report.failures(),
            "hosts reconciled"
        );
        Ok(report)
    }

    async fn reconcile_host(
        &self,
        group: &DeviceGroup,
        device: &Device,
        slot: &GroupSlot,
        template: &TemplateResolution,
        policy: &SetupPolicy,
        options: SetupOptions,
    ) -> Result<Outcome, CoreError> {
        let found = match self.client().hosts_by_name(&[&device.name], false).await {
            Ok(found) => found,
            Err(e) => {
                return Ok(Outcome::Failed {
                    reason: format!("lookup failed: {}", item_failure(e)?),
                });
            }
        };

        if let Some(host) = found.into_iter().next() {
            return Ok(Outcome::Existing { id: host.id });
        }

        let group_id = match slot {
            GroupSlot::Id(id) if !options.dry_run => id,
            _ => {
                return Ok(Outcome::Planned {
                    detail: format!("create host on {}", device.address),
                });
            }
        };

        let payload = host_payload(group, device, group_id, template.template_id(), policy);
        Ok(match self.client().create_host(&payload).await {
            Ok(id) => Outcome::Created { id },
            Err(e) => Outcome::Failed {
                reason: item_failure(e)?,
            },
        })
    }

    /// Run every setup step in order. Stops at the first transport fault.
    pub async fn run_setup(
        &self,
        inventory: &Inventory,
        policy: &SetupPolicy,
        options: SetupOptions,
        mut on_item: impl FnMut(&ItemReport),
    ) -> Result<SetupReport, CoreError> {
        let template = self.resolve_template(policy).await?;
        let groups = self
            .reconcile_groups(inventory, options, &mut on_item)
            .await?;
        let hosts = self
            .reconcile_hosts(
                inventory,
                &groups.slots,
                &template,
                policy,
                options,
                &mut on_item,
            )
            .await?;

        Ok(SetupReport {
            template,
            groups: groups.report,
            hosts,
        })
    }
}

/// `host.create` payload for one device.
pub fn host_payload(
    group: &DeviceGroup,
    device: &Device,
    group_id: &str,
    template_id: Option<&str>,
    policy: &SetupPolicy,
) -> HostCreate {
    let mut tags = vec![Tag {
        tag: "network_type".into(),
        value: network_type(&group.name),
    }];
    tags.extend(policy.tags.iter().cloned());

    HostCreate {
        host: device.name.clone(),
        name: display_name(&device.name),
        groups: vec![GroupRef {
            groupid: group_id.to_owned(),
        }],
        interfaces: vec![policy.interface.spec_for(&device.address.to_string())],
        tags,
        templates: template_id
            .map(|id| TemplateRef {
                templateid: id.to_owned(),
            })
            .into_iter()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn host_payload_matches_create_shape() {
        let group = DeviceGroup {
            name: "Core Routers".into(),
            hosts: vec![],
        };
        let device = Device {
            name: "core-1".into(),
            address: "172.30.0.11".parse().unwrap(),
        };

        let payload = host_payload(&group, &device, "22", Some("10564"), &SetupPolicy::default());

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "host": "core-1",
                "name": "Core 1",
                "groups": [{ "groupid": "22" }],
                "interfaces": [{
                    "type": 1,
                    "main": 1,
                    "useip": 1,
                    "ip": "172.30.0.11",
                    "dns": "",
                    "port": "10050"
                }],
                "tags": [
                    { "tag": "network_type", "value": "core" },
                    { "tag": "environment", "value": "lab" }
                ],
                "templates": [{ "templateid": "10564" }]
            })
        );
    }

    #[test]
    fn host_payload_without_template() {
        let group = DeviceGroup {
            name: "Access Routers".into(),
            hosts: vec![],
        };
        let device = Device {
            name: "access-2".into(),
            address: "172.30.0.32".parse().unwrap(),
        };

        let payload = host_payload(&group, &device, "24", None, &SetupPolicy::default());

        assert!(payload.templates.is_empty());
        assert_eq!(payload.tags[0].value, "access");
    }
}
