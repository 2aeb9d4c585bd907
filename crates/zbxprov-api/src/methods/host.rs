// Host endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::methods::hostgroup::first_id;
use crate::models::{CreatedHosts, Host, HostCreate};

impl ZabbixClient {
    /// Hosts whose technical name is one of `names`.
    ///
    /// `host.get` with `filter.host`; adds `selectInterfaces` when
    /// `with_interfaces` is set.
    pub async fn hosts_by_name(
        &self,
        names: &[&str],
        with_interfaces: bool,
    ) -> Result<Vec<Host>, Error> {
        debug!(count = names.len(), with_interfaces, "looking up hosts");
        let mut params = json!({
            "output": ["hostid", "host", "name"],
            "filter": { "host": names },
        });
        if with_interfaces {
            params["selectInterfaces"] = json!(["interfaceid", "type", "main", "ip", "dns", "port"]);
        }
        self.call("host.get", &params).await
    }

    /// Create a host and return its id.
    ///
    /// `host.create`
    pub async fn create_host(&self, host: &HostCreate) -> Result<String, Error> {
        debug!(host = %host.host, "creating host");
        let created: CreatedHosts = self.call("host.create", host).await?;
        first_id("host.create", created.hostids)
    }
}
