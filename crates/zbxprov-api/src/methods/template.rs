// Template lookups

use serde_json::json;
use tracing::debug;

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::models::Template;

const TEMPLATE_OUTPUT: [&str; 3] = ["templateid", "host", "name"];

impl ZabbixClient {
    /// Templates whose technical name equals `host` exactly.
    ///
    /// `template.get` with `filter.host`
    pub async fn templates_by_host(&self, host: &str) -> Result<Vec<Template>, Error> {
        debug!(host, "looking up template by exact name");
        self.call(
            "template.get",
            &json!({
                "output": TEMPLATE_OUTPUT,
                "filter": { "host": host },
            }),
        )
        .await
    }

    /// Templates whose visible name contains `fragment`.
    ///
    /// `template.get` with `search.name` (case-insensitive substring match)
    pub async fn templates_search_name(&self, fragment: &str) -> Result<Vec<Template>, Error> {
        debug!(fragment, "searching templates by name");
        self.call(
            "template.get",
            &json!({
                "output": TEMPLATE_OUTPUT,
                "search": { "name": fragment },
            }),
        )
        .await
    }
}
