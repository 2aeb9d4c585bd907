#![allow(clippy::unwrap_used, dead_code)]
// In-memory Zabbix frontend for pipeline tests.
//
// Answers the JSON-RPC methods the pipeline uses from a mutable store and
// records every method name, so tests can assert both end state and the
// exact calls issued.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use zbxprov_api::{AuthStyle, ZabbixClient};
use zbxprov_core::{AuthCredentials, Device, DeviceGroup, Inventory, Session};

const ENDPOINT: &str = "/api_jsonrpc.php";
pub const TOKEN: &str = "fake-session-token";
pub const STALL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeInterface {
    pub id: String,
    pub kind: u8,
    pub ip: String,
    pub port: String,
    pub details: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct FakeHost {
    pub id: String,
    pub host: String,
    pub name: String,
    pub groupids: Vec<String>,
    pub templateids: Vec<String>,
    pub tags: Value,
    pub interfaces: Vec<FakeInterface>,
}

#[derive(Debug, Default)]
pub struct State {
    next_id: u64,
    pub groups: Vec<(String, String)>,
    pub templates: Vec<(String, String, String)>,
    pub hosts: Vec<FakeHost>,
    pub calls: Vec<String>,
    pub reject_login: bool,
    pub failing: HashSet<String>,
    pub failing_once: HashSet<String>,
    pub stalled: HashSet<String>,
}

impl State {
    fn id(&mut self) -> String {
        self.next_id += 1;
        (10_000 + self.next_id).to_string()
    }
}

/// Handle shared between the test and the mock server.
#[derive(Clone, Default)]
pub struct FakeZabbix {
    state: Arc<Mutex<State>>,
}

impl FakeZabbix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(self, host: &str, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.id();
            state.templates.push((id, host.into(), name.into()));
        }
        self
    }

    pub fn with_group(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.id();
            state.groups.push((id, name.into()));
        }
        self
    }

    /// Existing host with one interface per `(type, ip, port)` entry.
    pub fn with_host(self, host: &str, interfaces: &[(u8, &str, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.id();
            let interfaces = interfaces
                .iter()
                .map(|(kind, ip, port)| FakeInterface {
                    id: state.id(),
                    kind: *kind,
                    ip: (*ip).into(),
                    port: (*port).into(),
                    details: None,
                })
                .collect();
            state.hosts.push(FakeHost {
                id,
                host: host.into(),
                name: host.into(),
                groupids: vec![],
                templateids: vec![],
                tags: json!([]),
                interfaces,
            });
        }
        self
    }

    pub fn rejecting_login(self) -> Self {
        self.state.lock().unwrap().reject_login = true;
        self
    }

    /// Make every call to `method` answer with an API error.
    pub fn failing(self, method: &str) -> Self {
        self.state.lock().unwrap().failing.insert(method.into());
        self
    }

    /// Fail only the next call to `method`.
    pub fn failing_once(self, method: &str) -> Self {
        self.state.lock().unwrap().failing_once.insert(method.into());
        self
    }

    /// Answer `method` only after [`STALL`], past any test client timeout.
    pub fn stalling(self, method: &str) -> Self {
        self.state.lock().unwrap().stalled.insert(method.into());
        self
    }

    fn is_stalled(&self, method: &str) -> bool {
        self.state.lock().unwrap().stalled.contains(method)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| *c == method).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn group_count(&self) -> usize {
        self.state.lock().unwrap().groups.len()
    }

    pub fn host_count(&self) -> usize {
        self.state.lock().unwrap().hosts.len()
    }

    pub fn host(&self, name: &str) -> Option<FakeHost> {
        self.state
            .lock()
            .unwrap()
            .hosts
            .iter()
            .find(|h| h.host == name)
            .cloned()
    }

    /// Start a mock server answering every POST from this fake.
    pub async fn serve(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }

    fn handle(&self, method: &str, params: &Value, auth: Option<&str>) -> Result<Value, String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method.to_owned());

        if state.failing.contains(method) || state.failing_once.remove(method) {
            return Err(format!("{method} rejected by test"));
        }

        let anonymous = matches!(method, "user.login" | "apiinfo.version");
        if anonymous && auth.is_some() {
            return Err("You should not provide \"auth\" for this method.".into());
        }
        if !anonymous && auth != Some(TOKEN) {
            return Err("Not authorised.".into());
        }

        match method {
            "apiinfo.version" => Ok(json!("6.0.25")),
            "user.login" => {
                if state.reject_login {
                    Err("Incorrect user name or password or account is temporarily blocked."
                        .into())
                } else {
                    Ok(json!(TOKEN))
                }
            }
            "user.logout" => Ok(json!(true)),
            "template.get" => {
                let exact = names(&params["filter"]["host"]);
                let fragment = params["search"]["name"].as_str().map(str::to_lowercase);
                let found: Vec<Value> = state
                    .templates
                    .iter()
                    .filter(|(_, host, name)| {
                        exact.contains(host)
                            || fragment
                                .as_ref()
                                .is_some_and(|f| name.to_lowercase().contains(f))
                    })
                    .map(|(id, host, name)| json!({ "templateid": id, "host": host, "name": name }))
                    .collect();
                Ok(json!(found))
            }
            "hostgroup.get" => {
                let wanted = names(&params["filter"]["name"]);
                let found: Vec<Value> = state
                    .groups
                    .iter()
                    .filter(|(_, name)| wanted.contains(name))
                    .map(|(id, name)| json!({ "groupid": id, "name": name }))
                    .collect();
                Ok(json!(found))
            }
            "hostgroup.create" => {
                let name = params["name"].as_str().unwrap_or_default().to_owned();
                if state.groups.iter().any(|(_, n)| *n == name) {
                    return Err(format!("Host group \"{name}\" already exists."));
                }
                let id = state.id();
                state.groups.push((id.clone(), name));
                Ok(json!({ "groupids": [id] }))
            }
            "host.get" => {
                let wanted = names(&params["filter"]["host"]);
                let with_interfaces = params.get("selectInterfaces").is_some();
                let found: Vec<Value> = state
                    .hosts
                    .iter()
                    .filter(|h| wanted.contains(&h.host))
                    .map(|h| {
                        let mut v = json!({ "hostid": h.id, "host": h.host, "name": h.name });
                        if with_interfaces {
                            v["interfaces"] = h
                                .interfaces
                                .iter()
                                .map(|i| {
                                    json!({
                                        "interfaceid": i.id,
                                        "type": i.kind.to_string(),
                                        "main": "1",
                                        "ip": i.ip,
                                        "dns": "",
                                        "port": i.port,
                                    })
                                })
                                .collect();
                        }
                        v
                    })
                    .collect();
                Ok(json!(found))
            }
            "host.create" => {
                let host = params["host"].as_str().unwrap_or_default().to_owned();
                if state.hosts.iter().any(|h| h.host == host) {
                    return Err(format!("Host with the same name \"{host}\" already exists."));
                }
                let id = state.id();
                let interfaces = params["interfaces"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .iter()
                    .map(|i| interface_from(&mut state, i))
                    .collect();
                state.hosts.push(FakeHost {
                    id: id.clone(),
                    host,
                    name: params["name"].as_str().unwrap_or_default().to_owned(),
                    groupids: ids(&params["groups"], "groupid"),
                    templateids: ids(&params["templates"], "templateid"),
                    tags: params["tags"].clone(),
                    interfaces,
                });
                Ok(json!({ "hostids": [id] }))
            }
            "hostinterface.create" => {
                let hostid = params["hostid"].as_str().unwrap_or_default().to_owned();
                let interface = interface_from(&mut state, params);
                let id = interface.id.clone();
                let host = state
                    .hosts
                    .iter_mut()
                    .find(|h| h.id == hostid)
                    .ok_or_else(|| "No permissions to referred object or it does not exist!".to_owned())?;
                host.interfaces.push(interface);
                Ok(json!({ "interfaceids": [id] }))
            }
            "hostinterface.delete" => {
                let doomed = names(params);
                for host in &mut state.hosts {
                    host.interfaces.retain(|i| !doomed.contains(&i.id));
                }
                Ok(json!({ "interfaceids": doomed }))
            }
            other => Err(format!("unexpected method {other}")),
        }
    }
}

impl Respond for FakeZabbix {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let method = body["method"].as_str().unwrap_or_default();
        let auth = body["auth"]
            .as_str()
            .or_else(|| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
            });

        let envelope = match self.handle(method, &body["params"], auth) {
            Ok(result) => json!({ "jsonrpc": "2.0", "result": result, "id": body["id"] }),
            Err(data) => json!({
                "jsonrpc": "2.0",
                "error": { "code": -32602, "message": "Invalid params.", "data": data },
                "id": body["id"],
            }),
        };
        let response = ResponseTemplate::new(200).set_body_json(envelope);
        if self.is_stalled(method) {
            response.set_delay(STALL)
        } else {
            response
        }
    }
}

/// String or array-of-strings filter value, as a list.
fn names(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        _ => vec![],
    }
}

fn ids(value: &Value, key: &str) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v[key].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

fn interface_from(state: &mut State, value: &Value) -> FakeInterface {
    FakeInterface {
        id: state.id(),
        kind: value["type"]
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .unwrap_or_default(),
        ip: value["ip"].as_str().unwrap_or_default().to_owned(),
        port: value["port"].as_str().unwrap_or_default().to_owned(),
        details: value.get("details").cloned(),
    }
}

// ── Pipeline helpers ────────────────────────────────────────────────

pub fn client_for(server: &MockServer) -> ZabbixClient {
    let endpoint = Url::parse(&format!("{}{ENDPOINT}", server.uri())).unwrap();
    ZabbixClient::with_client(reqwest::Client::new(), endpoint, AuthStyle::Body)
}

/// Client that gives up long before a stalled answer arrives.
pub fn impatient_client_for(server: &MockServer) -> ZabbixClient {
    let endpoint = Url::parse(&format!("{}{ENDPOINT}", server.uri())).unwrap();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    ZabbixClient::with_client(http, endpoint, AuthStyle::Body)
}

pub fn password() -> AuthCredentials {
    AuthCredentials::Password {
        username: "Admin".into(),
        password: "zabbix".to_string().into(),
    }
}

pub async fn session(server: &MockServer) -> Session {
    Session::authenticate(client_for(server), &password())
        .await
        .unwrap()
}

pub fn device(name: &str, address: &str) -> Device {
    Device {
        name: name.into(),
        address: address.parse().unwrap(),
    }
}

/// The lab inventory: three groups of routers.
pub fn lab_inventory() -> Inventory {
    Inventory::new(vec![
        DeviceGroup {
            name: "Core Routers".into(),
            hosts: vec![device("core-1", "172.30.0.11"), device("core-2", "172.30.0.12")],
        },
        DeviceGroup {
            name: "Distribution Routers".into(),
            hosts: vec![device("dist-1", "172.30.0.21")],
        },
        DeviceGroup {
            name: "Access Routers".into(),
            hosts: vec![device("access-1", "172.30.0.31")],
        },
    ])
    .unwrap()
}
