#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use commsbot::app::handler::InteractionHandler;
use commsbot::config::{BroadcastConfig, ModalConfig};
use commsbot::transport::slack::SlackClient;
use commsbot::transport::slack::interaction::SocketEnvelope;

/// A mock Web API that accepts every call the composer makes.
pub async fn slack_api() -> MockServer {
    let server = MockServer::start().await;
    for (api_method, body) in [
        ("views.open", json!({ "ok": true, "view": { "id": "V1", "hash": "H2" } })),
        ("views.update", json!({ "ok": true, "view": { "id": "V1", "hash": "H3" } })),
        (
            "chat.postMessage",
            json!({ "ok": true, "channel": "C1", "ts": "1700000000.000100" }),
        ),
    ] {
        Mock::given(method("POST"))
            .and(path(format!("/api/{api_method}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    server
}

pub fn handler(server: &MockServer) -> InteractionHandler {
    let client = SlackClient::new(
        "xoxb-test",
        "xapp-test",
        &format!("{}/api", server.uri()),
    );
    InteractionHandler::new(
        Arc::new(client),
        ModalConfig::default(),
        BroadcastConfig::default(),
    )
}

/// JSON bodies the mock received for one Web API method, in arrival order.
pub async fn bodies(server: &MockServer, api_method: &str) -> Vec<Value> {
    let wanted = format!("/api/{api_method}");
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == wanted)
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

pub fn interactive(payload: Value) -> SocketEnvelope {
    serde_json::from_value(json!({
        "type": "interactive",
        "envelope_id": "E1",
        "payload": payload
    }))
    .unwrap()
}

pub fn checkbox(checked: bool) -> Value {
    let options = if checked {
        json!([{ "value": "value-0" }])
    } else {
        json!([])
    };
    json!({ "type": "checkboxes", "selected_options": options })
}

pub fn text_input(value: &str) -> Value {
    json!({ "type": "plain_text_input", "value": value })
}

pub fn message_body(text: &str) -> Value {
    json!({
        "type": "rich_text_input",
        "rich_text_value": {
            "type": "rich_text",
            "elements": [{
                "type": "rich_text_section",
                "elements": [{ "type": "text", "text": text }]
            }]
        }
    })
}

pub fn recipients(ids: &[&str]) -> Value {
    json!({ "type": "multi_conversations_select", "selected_conversations": ids })
}

pub fn cta_count(count: &str) -> Value {
    json!({ "type": "static_select", "selected_option": { "value": count } })
}
