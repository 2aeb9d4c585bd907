#![allow(clippy::unwrap_used)]
// Integration tests for `ZabbixClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zbxprov_api::{
    AuthStyle, Credentials, Error, HostCreate, InterfaceCreate, InterfaceSpec, InterfaceType,
    ZabbixClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

const ENDPOINT: &str = "/api_jsonrpc.php";

async fn setup_with(style: AuthStyle) -> (MockServer, ZabbixClient) {
    let server = MockServer::start().await;
    let endpoint = Url::parse(&format!("{}{ENDPOINT}", server.uri())).unwrap();
    let client = ZabbixClient::with_client(reqwest::Client::new(), endpoint, style);
    (server, client)
}

async fn setup() -> (MockServer, ZabbixClient) {
    setup_with(AuthStyle::Body).await
}

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": 1
    }))
}

fn rpc_error(code: i64, message: &str, data: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message, "data": data },
        "id": 1
    }))
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(json!({ "method": "user.login" })))
        .respond_with(ok(json!(token)))
        .mount(server)
        .await;
}

async fn login(client: &ZabbixClient) {
    let secret: secrecy::SecretString = "zabbix".to_string().into();
    client.login("Admin", &secret).await.unwrap();
}

async fn recorded_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}

// ── Envelope ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_exact_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "method": "user.login",
            "params": { "username": "Admin", "password": "zabbix" },
            "id": 1
        })))
        .respond_with(ok(json!("0424bd59b807674191e7d77572075f33")))
        .expect(1)
        .mount(&server)
        .await;

    login(&client).await;
    assert!(client.has_session());
}

#[tokio::test]
async fn test_token_attached_after_login() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-123").await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "hostgroup.get", "auth": "tok-123", "id": 1 })))
        .respond_with(ok(json!([{ "groupid": "22", "name": "Core Routers" }])))
        .expect(1)
        .mount(&server)
        .await;

    login(&client).await;
    let groups = client.host_groups_by_name("Core Routers").await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "22");
}

#[tokio::test]
async fn test_header_style_moves_token_out_of_envelope() {
    let (server, client) = setup_with(AuthStyle::Header).await;
    mount_login(&server, "tok-456").await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer tok-456"))
        .and(body_partial_json(json!({ "method": "host.get" })))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    login(&client).await;
    client.hosts_by_name(&["core-1"], false).await.unwrap();

    let bodies = recorded_bodies(&server).await;
    assert!(bodies.iter().all(|b| b.get("auth").is_none()));
}

#[tokio::test]
async fn test_api_version_never_carries_token() {
    let (server, client) = setup().await;
    mount_login(&server, "tok-789").await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "apiinfo.version" })))
        .respond_with(ok(json!("6.0.25")))
        .mount(&server)
        .await;

    login(&client).await;
    let version = client.api_version().await.unwrap();
    assert_eq!(version, "6.0.25");

    let bodies = recorded_bodies(&server).await;
    let version_call = bodies
        .iter()
        .find(|b| b["method"] == "apiinfo.version")
        .unwrap();
    assert!(version_call.get("auth").is_none());
}

#[tokio::test]
async fn test_api_token_credentials_skip_login() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "template.get", "auth": "static-token" })))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::ApiToken("static-token".to_string().into());
    client.authenticate(&creds).await.unwrap();
    client.templates_by_host("ICMP Ping").await.unwrap();

    let bodies = recorded_bodies(&server).await;
    assert!(bodies.iter().all(|b| b["method"] != "user.login"));
}

// ── Authentication failures ─────────────────────────────────────────

#[tokio::test]
async fn test_login_error_object_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(rpc_error(
            -32602,
            "Invalid params.",
            "Incorrect user name or password or account is temporarily blocked.",
        ))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("Admin", &secret).await;

    match result {
        Err(Error::Authentication { message, body }) => {
            assert!(message.contains("Incorrect user name"), "got: {message}");
            assert!(body.contains("-32602"), "raw body kept: {body}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_login_without_result_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1 })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "zabbix".to_string().into();
    let result = client.login("Admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (server, client) = setup().await;
    mount_login(&server, "tok").await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "user.logout", "auth": "tok" })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    login(&client).await;
    client.logout().await.unwrap();
    assert!(!client.has_session());
}

// ── Object methods ──────────────────────────────────────────────────

#[tokio::test]
async fn test_hosts_by_name_with_interfaces() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "host.get",
            "params": { "filter": { "host": ["core-1", "core-2"] } }
        })))
        .respond_with(ok(json!([{
            "hostid": "10501",
            "host": "core-1",
            "name": "Core 1",
            "interfaces": [{
                "interfaceid": "31",
                "type": "1",
                "main": "1",
                "ip": "172.30.0.11",
                "dns": "",
                "port": "10050"
            }]
        }])))
        .mount(&server)
        .await;

    let hosts = client
        .hosts_by_name(&["core-1", "core-2"], true)
        .await
        .unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].host, "core-1");
    assert_eq!(hosts[0].interfaces[0].interface_type, InterfaceType::Agent);

    let bodies = recorded_bodies(&server).await;
    assert!(bodies[0]["params"].get("selectInterfaces").is_some());
}

#[tokio::test]
async fn test_create_host_returns_first_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "host.create",
            "params": { "host": "core-1", "name": "Core 1" }
        })))
        .respond_with(ok(json!({ "hostids": ["10501"] })))
        .mount(&server)
        .await;

    let host = HostCreate {
        host: "core-1".into(),
        name: "Core 1".into(),
        groups: vec![],
        interfaces: vec![InterfaceSpec::main_by_ip(
            InterfaceType::Agent,
            "172.30.0.11",
            "10050",
        )],
        tags: vec![],
        templates: vec![],
    };
    let id = client.create_host(&host).await.unwrap();
    assert_eq!(id, "10501");
}

#[tokio::test]
async fn test_delete_interfaces_sends_array_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "hostinterface.delete",
            "params": ["31"]
        })))
        .respond_with(ok(json!({ "interfaceids": ["31"] })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client.delete_interfaces(&["31"]).await.unwrap();
    assert_eq!(deleted, vec!["31".to_string()]);
}

#[tokio::test]
async fn test_create_interface() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "hostinterface.create",
            "params": { "hostid": "10501", "type": 2, "port": "161", "ip": "172.30.0.11" }
        })))
        .respond_with(ok(json!({ "interfaceids": ["44"] })))
        .mount(&server)
        .await;

    let iface = InterfaceCreate {
        hostid: "10501".into(),
        spec: InterfaceSpec::main_by_ip(InterfaceType::Snmp, "172.30.0.11", "161"),
    };
    assert_eq!(client.create_interface(&iface).await.unwrap(), "44");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_error_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(rpc_error(
            -32602,
            "Invalid params.",
            "Host group \"Core Routers\" already exists.",
        ))
        .mount(&server)
        .await;

    let err = client.create_host_group("Core Routers").await.unwrap_err();

    assert_eq!(err.api_code(), Some(-32602));
    match err {
        Error::Api { data, .. } => assert!(data.contains("already exists"), "got: {data}"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.hosts_by_name(&["core-1"], false).await.unwrap_err();

    assert!(err.is_transient());
    match err {
        Error::Http { status, .. } => assert_eq!(status, 502),
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.templates_search_name("ICMP").await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
