// Host interface endpoints

use tracing::debug;

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::methods::hostgroup::first_id;
use crate::models::{CreatedInterfaces, InterfaceCreate};

impl ZabbixClient {
    /// Create an interface on an existing host and return its id.
    ///
    /// `hostinterface.create`
    pub async fn create_interface(&self, interface: &InterfaceCreate) -> Result<String, Error> {
        debug!(hostid = %interface.hostid, ip = %interface.spec.ip, "creating interface");
        let created: CreatedInterfaces = self.call("hostinterface.create", interface).await?;
        first_id("hostinterface.create", created.interfaceids)
    }

    /// Delete interfaces by id, returning the ids the server removed.
    ///
    /// `hostinterface.delete` takes a bare array of ids as `params`.
    pub async fn delete_interfaces(&self, ids: &[&str]) -> Result<Vec<String>, Error> {
        debug!(?ids, "deleting interfaces");
        let deleted: CreatedInterfaces = self.call("hostinterface.delete", &ids).await?;
        Ok(deleted.interfaceids)
    }
}
