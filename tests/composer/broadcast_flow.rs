use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use commsbot::app::handler::Work;
use commsbot::transport::slack::interaction::SocketEnvelope;

use crate::slack_harness::{
    bodies, checkbox, cta_count, handler, interactive, message_body, recipients, slack_api,
    text_input,
};

fn submission(values: Value) -> SocketEnvelope {
    interactive(json!({
        "type": "view_submission",
        "user": { "id": "U1" },
        "view": {
            "id": "V1",
            "hash": "H5",
            "callback_id": "broadcast_composer",
            "state": { "values": values }
        }
    }))
}

fn base_values(text: &str, to: &[&str]) -> Value {
    json!({
        "rich_text_input": { "rich_text_input-action": message_body(text) },
        "multi_conversations_select": { "multi_conversations_select-action": recipients(to) },
        "customize_sender_identity": { "customize_sender_identity-action": checkbox(false) },
        "call_to_action": { "call_to_action-action": checkbox(false) }
    })
}

fn with_everything(mut values: Value, link: &str) -> Value {
    let extra = json!({
        "customize_sender_identity": { "customize_sender_identity-action": checkbox(true) },
        "sender_name": { "plain_text_input-action": text_input("HR Team") },
        "icon_url": { "icon_url-action": text_input("https://example.com/hr.png") },
        "call_to_action": { "call_to_action-action": checkbox(true) },
        "call_to_action_dropdown": { "call_to_action_dropdown-action": cta_count("2") },
        "cta_button_text_1": { "plain_text_input-action": text_input("Read more") },
        "cta_button_link_1": { "plain_text_input-action": text_input(link) },
        "cta_button_text_2": { "plain_text_input-action": text_input("Sign up") },
        "cta_button_link_2": { "plain_text_input-action": text_input("https://example.com/join") }
    });
    let map = values.as_object_mut().unwrap();
    for (key, value) in extra.as_object().unwrap() {
        map.insert(key.clone(), value.clone());
    }
    values
}

#[tokio::test]
async fn submission_fans_out_to_each_recipient() {
    let server = slack_api().await;
    let handler = handler(&server);

    let envelope = submission(with_everything(
        base_values("Open enrollment starts Monday", &["C1", "C2"]),
        "https://example.com/benefits",
    ));
    let (ack, work) = handler.prepare(envelope);
    assert!(ack.is_none());
    handler.execute(work).await;

    let mut posted = bodies(&server, "chat.postMessage").await;
    posted.sort_by_key(|body| body["channel"].as_str().unwrap_or_default().to_string());
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0]["channel"], "C1");
    assert_eq!(posted[1]["channel"], "C2");

    for body in &posted {
        assert_eq!(body["text"], "Open enrollment starts Monday");
        assert_eq!(body["username"], "HR Team");
        assert_eq!(body["icon_url"], "https://example.com/hr.png");

        let blocks = body["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0]["type"], "rich_text");
        assert_eq!(blocks[1]["block_id"], "button_id_1");
        assert_eq!(blocks[1]["elements"][0]["action_id"], "button_action_1");
        assert_eq!(blocks[1]["elements"][0]["url"], "https://example.com/benefits");
        assert_eq!(blocks[2]["elements"][0]["text"]["text"], "Sign up");
    }
}

#[tokio::test]
async fn plain_submission_omits_identity_and_buttons() {
    let server = slack_api().await;
    let handler = handler(&server);

    let (_, work) = handler.prepare(submission(base_values("Lunch is here", &["C9"])));
    handler.execute(work).await;

    let posted = bodies(&server, "chat.postMessage").await;
    assert_eq!(posted.len(), 1);
    assert!(posted[0].get("username").is_none());
    assert!(posted[0].get("icon_url").is_none());
    assert_eq!(posted[0]["blocks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_recipient_list_posts_nothing() {
    let server = slack_api().await;
    let handler = handler(&server);

    let (ack, work) = handler.prepare(submission(base_values("Hello", &[])));
    assert!(ack.is_none());
    handler.execute(work).await;

    assert!(bodies(&server, "chat.postMessage").await.is_empty());
}

#[tokio::test]
async fn bad_link_keeps_the_modal_open() {
    let server = slack_api().await;
    let handler = handler(&server);

    let envelope = submission(with_everything(
        base_values("Hello", &["C1"]),
        "example.com/no-scheme",
    ));
    let (ack, work) = handler.prepare(envelope);

    let ack = ack.unwrap();
    assert_eq!(ack["response_action"], "errors");
    assert!(ack["errors"]["cta_button_link_1"].is_string());
    assert!(ack["errors"].get("cta_button_link_2").is_none());
    assert!(matches!(work, Work::None));

    handler.execute(work).await;
    assert!(bodies(&server, "chat.postMessage").await.is_empty());
}

#[tokio::test]
async fn one_failed_recipient_does_not_block_the_rest() {
    let server = slack_api().await;
    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .and(body_partial_json(json!({ "channel": "C2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "channel_not_found" })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    let handler = handler(&server);

    let (_, work) = handler.prepare(submission(base_values("Hi", &["C1", "C2", "C3"])));
    handler.execute(work).await;

    assert_eq!(bodies(&server, "chat.postMessage").await.len(), 3);
}
