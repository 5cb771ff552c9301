use serde_json::{Value, json};

use crate::slack_harness::{bodies, checkbox, cta_count, handler, interactive, slack_api};

fn block_ids(view: &Value) -> Vec<&str> {
    view["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|block| block["block_id"].as_str())
        .collect()
}

fn block_actions(state: Value, action: Value) -> Value {
    json!({
        "type": "block_actions",
        "user": { "id": "U1" },
        "view": {
            "id": "V1",
            "hash": "H2",
            "callback_id": "broadcast_composer",
            "state": { "values": state }
        },
        "actions": [action]
    })
}

#[tokio::test]
async fn shortcut_opens_base_form() {
    let server = slack_api().await;
    let handler = handler(&server);

    let (ack, work) = handler.prepare(interactive(json!({
        "type": "shortcut",
        "callback_id": "bt_comms_shortcut",
        "trigger_id": "T42",
        "user": { "id": "U1" }
    })));
    assert!(ack.is_none());
    handler.execute(work).await;

    let opened = bodies(&server, "views.open").await;
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0]["trigger_id"], "T42");
    let view = &opened[0]["view"];
    assert_eq!(view["type"], "modal");
    assert_eq!(view["callback_id"], "broadcast_composer");
    assert_eq!(view["title"]["text"], "BT Comms App");
    assert_eq!(
        block_ids(view),
        [
            "rich_text_input",
            "multi_conversations_select",
            "divider_1",
            "customize_sender_identity",
            "call_to_action"
        ]
    );
}

#[tokio::test]
async fn enabling_cta_then_picking_two_buttons() {
    let server = slack_api().await;
    let handler = handler(&server);

    let (_, work) = handler.prepare(interactive(block_actions(
        json!({
            "customize_sender_identity": { "customize_sender_identity-action": checkbox(false) },
            "call_to_action": { "call_to_action-action": checkbox(true) }
        }),
        json!({
            "type": "checkboxes",
            "action_id": "call_to_action-action",
            "block_id": "call_to_action",
            "selected_options": [{ "value": "value-0" }]
        }),
    )));
    handler.execute(work).await;

    let (_, work) = handler.prepare(interactive(block_actions(
        json!({
            "customize_sender_identity": { "customize_sender_identity-action": checkbox(false) },
            "call_to_action": { "call_to_action-action": checkbox(true) },
            "call_to_action_dropdown": { "call_to_action_dropdown-action": cta_count("2") }
        }),
        json!({
            "type": "static_select",
            "action_id": "call_to_action_dropdown-action",
            "block_id": "call_to_action_dropdown",
            "selected_option": { "value": "2" }
        }),
    )));
    handler.execute(work).await;

    let updates = bodies(&server, "views.update").await;
    assert_eq!(updates.len(), 2);
    for update in &updates {
        assert_eq!(update["view_id"], "V1");
        assert_eq!(update["hash"], "H2");
    }

    let first = block_ids(&updates[0]["view"]);
    assert_eq!(first.last(), Some(&"cta_buttons_hint"));
    assert!(first.contains(&"call_to_action_dropdown"));

    let second = block_ids(&updates[1]["view"]);
    assert!(second.ends_with(&[
        "call_to_action_dropdown",
        "cta_buttons_hint",
        "cta_button_header_1",
        "cta_button_text_1",
        "cta_button_link_1",
        "cta_button_header_2",
        "cta_button_text_2",
        "cta_button_link_2",
    ]));
}

#[tokio::test]
async fn identity_toggle_keeps_selected_buttons() {
    let server = slack_api().await;
    let handler = handler(&server);

    let (_, work) = handler.prepare(interactive(block_actions(
        json!({
            "customize_sender_identity": { "customize_sender_identity-action": checkbox(true) },
            "call_to_action": { "call_to_action-action": checkbox(true) },
            "call_to_action_dropdown": { "call_to_action_dropdown-action": cta_count("1") }
        }),
        json!({
            "type": "checkboxes",
            "action_id": "customize_sender_identity-action",
            "block_id": "customize_sender_identity",
            "selected_options": [{ "value": "value-0" }]
        }),
    )));
    handler.execute(work).await;

    let updates = bodies(&server, "views.update").await;
    let ids = block_ids(&updates[0]["view"]);
    let position = |id: &str| ids.iter().position(|candidate| *candidate == id).unwrap();
    assert!(position("sender_name") < position("call_to_action"));
    assert!(position("icon_url") < position("call_to_action"));
    assert!(ids.contains(&"cta_button_link_1"));
    assert!(!ids.contains(&"cta_button_link_2"));
}

#[tokio::test]
async fn unchecking_cta_drops_the_whole_section() {
    let server = slack_api().await;
    let handler = handler(&server);

    let (_, work) = handler.prepare(interactive(block_actions(
        json!({
            "customize_sender_identity": { "customize_sender_identity-action": checkbox(false) },
            "call_to_action": { "call_to_action-action": checkbox(false) },
            "call_to_action_dropdown": { "call_to_action_dropdown-action": cta_count("3") }
        }),
        json!({
            "type": "checkboxes",
            "action_id": "call_to_action-action",
            "block_id": "call_to_action",
            "selected_options": []
        }),
    )));
    handler.execute(work).await;

    let updates = bodies(&server, "views.update").await;
    let ids = block_ids(&updates[0]["view"]);
    assert_eq!(ids.last(), Some(&"call_to_action"));
    assert!(!ids.iter().any(|id| id.starts_with("cta_button")));
}
