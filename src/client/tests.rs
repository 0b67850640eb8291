//! Tests for the request orchestrator

use super::*;
use crate::auth::CACHE_AUTH_HEADER;
use crate::codec::FieldValue;
use crate::records::RECORD_ID_FIELD;
use crate::types::ProcessMode;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport answering from a fixed script and recording every request
struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left"))
    }
}

fn ok(body: JsonValue) -> HttpResponse {
    HttpResponse::from_json(200, body)
}

fn config() -> ClientConfig {
    ClientConfig::builder()
        .api_key("key1")
        .base("appBase")
        .api_url("https://api.airtable.test/v0")
        .no_rate_limit()
        .build()
}

fn cached_config() -> ClientConfig {
    ClientConfig::builder()
        .api_key("key1")
        .base("appBase")
        .api_url("https://api.airtable.test/v0")
        .cache("https://cache.test/v0", "mw-token")
        .no_rate_limit()
        .build()
}

fn client(config: &ClientConfig, transport: &Arc<ScriptedTransport>) -> CachingClient {
    CachingClient::with_transport(config, transport.clone()).unwrap()
}

fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn query<'a>(request: &'a HttpRequest, name: &str) -> Vec<&'a str> {
    request
        .query
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn rows(n: usize) -> JsonValue {
    JsonValue::Array((0..n).map(|i| json!({ "n": i })).collect())
}

fn echo(n: usize, offset: usize) -> JsonValue {
    let records: Vec<JsonValue> = (0..n)
        .map(|i| json!({"id": format!("rec{}", offset + i), "fields": {"n": offset + i}}))
        .collect();
    json!({ "records": records })
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_requires_api_key() {
    let config = ClientConfig::builder().base("appBase").build();
    let transport = ScriptedTransport::new(vec![]);
    let err = CachingClient::with_transport(&config, transport).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "api_key"));
}

#[test]
fn test_has_cache() {
    let transport = ScriptedTransport::new(vec![]);
    assert!(!client(&config(), &transport).has_cache());
    assert!(client(&cached_config(), &transport).has_cache());
}

#[test]
fn test_webhooks_need_personal_token() {
    let transport = ScriptedTransport::new(vec![]);
    let err = client(&config(), &transport).webhooks().unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "personal_token"));
}

#[test]
fn test_join_segments_encodes() {
    let root = Url::parse("https://api.airtable.test/v0").unwrap();
    let url = join_segments(&root, &["appBase", "My Table"]).unwrap();
    assert_eq!(url.as_str(), "https://api.airtable.test/v0/appBase/My%20Table");

    let trailing = Url::parse("https://api.airtable.test/v0/").unwrap();
    let url = join_segments(&trailing, &["appBase", "T"]).unwrap();
    assert_eq!(url.as_str(), "https://api.airtable.test/v0/appBase/T");
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_fetch_follows_offsets() {
    let transport = ScriptedTransport::new(vec![
        ok(json!({"records": [{"id": "rec1", "fields": {"a": 1}}], "offset": "page2"})),
        ok(json!({"records": [{"id": "rec2", "fields": {"a": 2}}]})),
    ]);
    let client = client(&config(), &transport);

    let records = client
        .fetch("Tasks", &FetchOptions::new().process(ProcessMode::Raw))
        .await
        .unwrap()
        .into_raw()
        .unwrap();

    assert_eq!(records.len(), 2);
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(query(&requests[0], "offset").is_empty());
    assert_eq!(query(&requests[1], "offset"), vec!["page2"]);
    assert_eq!(
        requests[0].url.as_str(),
        "https://api.airtable.test/v0/appBase/Tasks"
    );
}

#[tokio::test]
async fn test_fetch_processed_rows() {
    let transport = ScriptedTransport::new(vec![ok(json!({"records": [
        {"id": "rec1", "fields": {"score": {"specialValue": "Infinity"}, "name": "a"}}
    ]}))]);
    let client = client(&config(), &transport);

    let rows = client
        .fetch("Tasks", &FetchOptions::new().process(ProcessMode::Processed))
        .await
        .unwrap()
        .into_rows()
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["score"], FieldValue::Float(f64::INFINITY));
    assert_eq!(rows[0][RECORD_ID_FIELD], FieldValue::from("rec1"));
}

#[tokio::test]
async fn test_fetch_inherits_client_default() {
    let transport = ScriptedTransport::new(vec![ok(json!({"records": []}))]);
    let client = client(&config(), &transport);
    assert!(!client.processes_by_default());

    let records = client.fetch("Tasks", &FetchOptions::new()).await.unwrap();
    assert_eq!(records, Records::Raw(vec![]));
}

#[tokio::test]
async fn test_fetch_query_options() {
    let transport = ScriptedTransport::new(vec![ok(json!({"records": []}))]);
    let client = client(&config(), &transport);

    let options = FetchOptions::new()
        .view("Grid view")
        .field("Name")
        .field("Status")
        .filter_by_formula("{Status} = 'Done'")
        .max_records(5)
        .page_size(2);
    client.fetch("Tasks", &options).await.unwrap();

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(query(request, "view"), vec!["Grid view"]);
    assert_eq!(query(request, "fields[]"), vec!["Name", "Status"]);
    assert_eq!(query(request, "filterByFormula"), vec!["{Status} = 'Done'"]);
    assert_eq!(query(request, "maxRecords"), vec!["5"]);
    assert_eq!(query(request, "pageSize"), vec!["2"]);
}

#[tokio::test]
async fn test_fetch_via_cache() {
    let transport = ScriptedTransport::new(vec![ok(json!({"records": []}))]);
    let client = client(&cached_config(), &transport);

    client
        .fetch("Tasks", &FetchOptions::new().via_cache())
        .await
        .unwrap();

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.url.as_str(), "https://cache.test/v0/appBase/Tasks");
    assert_eq!(header(request, CACHE_AUTH_HEADER), Some("mw-token"));
    assert_eq!(header(request, "Authorization"), Some("Bearer key1"));
}

#[tokio::test]
async fn test_fetch_without_cache_goes_direct() {
    let transport = ScriptedTransport::new(vec![ok(json!({"records": []}))]);
    let client = client(&config(), &transport);

    client
        .fetch("Tasks", &FetchOptions::new().via_cache())
        .await
        .unwrap();

    let requests = transport.requests();
    let request = &requests[0];
    assert!(request.url.as_str().starts_with("https://api.airtable.test/v0/"));
    assert_eq!(header(request, CACHE_AUTH_HEADER), None);
}

#[tokio::test]
async fn test_fetch_missing_base() {
    let config = ClientConfig::builder()
        .api_key("key1")
        .no_rate_limit()
        .build();
    let transport = ScriptedTransport::new(vec![]);
    let client = client(&config, &transport);

    let err = client.fetch("Tasks", &FetchOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "base"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_base_override() {
    let transport = ScriptedTransport::new(vec![ok(json!({"records": []}))]);
    let client = client(&config(), &transport);

    client
        .fetch("Tasks", &FetchOptions::new().base("appOther"))
        .await
        .unwrap();
    assert_eq!(
        transport.requests()[0].url.as_str(),
        "https://api.airtable.test/v0/appOther/Tasks"
    );
}

#[tokio::test]
async fn test_fetch_failed_page_fails_call() {
    let transport = ScriptedTransport::new(vec![
        ok(json!({"records": [{"id": "rec1", "fields": {}}], "offset": "p2"})),
        HttpResponse::from_json(429, json!({"error": {"type": "RATE_LIMIT", "message": "slow"}})),
    ]);
    let client = client(&config(), &transport);

    let err = client.fetch("Tasks", &FetchOptions::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(429));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_fetch_stream_is_lazy() {
    let transport = ScriptedTransport::new(vec![
        ok(json!({"records": [{"id": "rec1", "fields": {}}], "offset": "p2"})),
        ok(json!({"records": [{"id": "rec2", "fields": {}}]})),
    ]);
    let client = client(&config(), &transport);

    let stream = client.fetch_stream("Tasks", &FetchOptions::new()).unwrap();
    futures::pin_mut!(stream);
    assert!(transport.requests().is_empty());

    let first = stream.try_next().await.unwrap().unwrap();
    assert_eq!(first.id.as_deref(), Some("rec1"));
    assert_eq!(transport.requests().len(), 1);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_create_chunks_by_ten() {
    let transport = ScriptedTransport::new(vec![ok(echo(10, 0)), ok(echo(5, 10))]);
    let client = client(&config(), &transport);

    let created = client
        .create(
            "Tasks",
            rows(15),
            &WriteOptions::new().process(ProcessMode::Processed),
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 15);
    assert_eq!(created[14].id.as_deref(), Some("rec14"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::POST);
    let first = requests[0].body.as_ref().unwrap()["records"].as_array().unwrap();
    let second = requests[1].body.as_ref().unwrap()["records"].as_array().unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 5);
    assert_eq!(first[0], json!({"fields": {"n": 0}}));
    assert_eq!(second[4], json!({"fields": {"n": 14}}));
}

#[tokio::test]
async fn test_create_fails_on_second_chunk() {
    let transport = ScriptedTransport::new(vec![
        ok(echo(10, 0)),
        HttpResponse::from_json(
            422,
            json!({"error": {"type": "INVALID_VALUE_FOR_COLUMN", "message": "bad"}}),
        ),
    ]);
    let client = client(&config(), &transport);

    let err = client
        .create(
            "Tasks",
            rows(15),
            &WriteOptions::new().process(ProcessMode::Processed),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_create_strips_record_id() {
    let transport = ScriptedTransport::new(vec![ok(echo(1, 0))]);
    let client = client(&config(), &transport);

    client
        .create(
            "Tasks",
            json!([{"at_record_id": "recOld", "n": 0}]),
            &WriteOptions::new().process(ProcessMode::Processed),
        )
        .await
        .unwrap();

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body, json!({"records": [{"fields": {"n": 0}}]}));
}

#[tokio::test]
async fn test_create_raw_passes_through() {
    let transport = ScriptedTransport::new(vec![ok(echo(1, 0))]);
    let client = client(&config(), &transport);

    client
        .create(
            "Tasks",
            json!({"records": [{"fields": {"score": {"specialValue": "NaN"}}}]}),
            &WriteOptions::new().process(ProcessMode::Raw),
        )
        .await
        .unwrap();

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(
        body,
        json!({"records": [{"fields": {"score": {"specialValue": "NaN"}}}]})
    );
}

#[tokio::test]
async fn test_create_empty_sends_nothing() {
    let transport = ScriptedTransport::new(vec![]);
    let client = client(&config(), &transport);

    let created = client
        .create_rows("Tasks", &[], None)
        .await
        .unwrap();
    assert!(created.is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_update_uses_patch_and_ids() {
    let transport = ScriptedTransport::new(vec![ok(echo(1, 0))]);
    let client = client(&config(), &transport);

    client
        .update(
            "Tasks",
            json!([{"at_record_id": "rec0", "n": 1, "gone": null}]),
            &WriteOptions::new().process(ProcessMode::Processed),
        )
        .await
        .unwrap();

    let requests = transport.requests();
    let request = &requests[0];
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(
        request.body.clone().unwrap(),
        json!({"records": [{"id": "rec0", "fields": {"n": 1}}]})
    );
}

#[tokio::test]
async fn test_update_keep_none() {
    let transport = ScriptedTransport::new(vec![ok(echo(1, 0))]);
    let client = client(&config(), &transport);

    client
        .update(
            "Tasks",
            json!([{"at_record_id": "rec0", "gone": null}]),
            &WriteOptions::new()
                .process(ProcessMode::Processed)
                .keep_none(true),
        )
        .await
        .unwrap();

    assert_eq!(
        transport.requests()[0].body.clone().unwrap(),
        json!({"records": [{"id": "rec0", "fields": {"gone": null}}]})
    );
}

#[tokio::test]
async fn test_update_missing_id_sends_nothing() {
    let transport = ScriptedTransport::new(vec![]);
    let client = client(&config(), &transport);

    let err = client
        .update(
            "Tasks",
            json!([{"n": 1}]),
            &WriteOptions::new().process(ProcessMode::Processed),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingRecordId { index: 0, .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_delete_repeats_query_param() {
    let deleted: Vec<JsonValue> = (0..12)
        .map(|i| json!({"id": format!("rec{i}"), "deleted": true}))
        .collect();
    let transport = ScriptedTransport::new(vec![
        ok(json!({"records": &deleted[..10]})),
        ok(json!({"records": &deleted[10..]})),
    ]);
    let client = client(&config(), &transport);

    let ids: Vec<String> = (0..12).map(|i| format!("rec{i}")).collect();
    let result = client.delete("Tasks", &ids, None).await.unwrap();

    assert_eq!(result.len(), 12);
    assert!(result.iter().all(|r| r.deleted));
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(query(&requests[0], "records[]").len(), 10);
    assert_eq!(query(&requests[1], "records[]"), vec!["rec10", "rec11"]);
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn test_custom_planner() {
    let transport = ScriptedTransport::new(vec![ok(echo(2, 0)), ok(echo(1, 2))]);
    let client = client(&config(), &transport).with_planner(BatchPlanner::new(2).unwrap());

    let created = client
        .create_records(
            "Tasks",
            vec![WireRecord::default(), WireRecord::default(), WireRecord::default()],
            None,
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 3);
    assert_eq!(transport.requests().len(), 2);
}
