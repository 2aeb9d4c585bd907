// Host group endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::models::{CreatedGroups, HostGroup};

impl ZabbixClient {
    /// Host groups whose name equals `name` exactly.
    ///
    /// `hostgroup.get` with `filter.name`
    pub async fn host_groups_by_name(&self, name: &str) -> Result<Vec<HostGroup>, Error> {
        debug!(name, "looking up host group");
        self.call(
            "hostgroup.get",
            &json!({
                "output": ["groupid", "name"],
                "filter": { "name": [name] },
            }),
        )
        .await
    }

    /// Create a host group and return its id.
    ///
    /// `hostgroup.create` with `{"name": ...}`
    pub async fn create_host_group(&self, name: &str) -> Result<String, Error> {
        debug!(name, "creating host group");
        let created: CreatedGroups = self
            .call("hostgroup.create", &json!({ "name": name }))
            .await?;
        first_id("hostgroup.create", created.groupids)
    }
}

/// The single id of a one-object create call.
pub(crate) fn first_id(method: &str, ids: Vec<String>) -> Result<String, Error> {
    ids.into_iter()
        .next()
        .ok_or_else(|| Error::Deserialization {
            message: format!("{method}: no id returned"),
            body: String::new(),
        })
}
