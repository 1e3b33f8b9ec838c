//! Chat URL construction through the public API.

mod support;

use emby_client::signature::digest;
use emby_client::types::{Participant, User};
use emby_client::utils::random_string;
use emby_client::{ChatApi, ChatConfig, ChatUrlBuilder, RightKind, RightsSchema};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use support::{SECRET, unflatten};

const NONE: &[Value] = &[];

fn config() -> ChatConfig {
    ChatConfig::new(SECRET, "token", "https://chat.example.com/embed/")
}

fn query_tree(url: &str) -> serde_json::Map<String, Value> {
    let (_, query) = url.split_once('?').expect("query string");
    let pairs: Vec<(String, String)> = query
        .split('&')
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            (
                urlencoding::decode(k).unwrap().into_owned(),
                urlencoding::decode(v).unwrap().into_owned(),
            )
        })
        .collect();
    unflatten(&pairs)
}

#[test]
fn guest_url_has_session_and_verifiable_signature() {
    let config = config();
    let url = ChatUrlBuilder::new(&config)
        .url_with_rng(&mut StdRng::seed_from_u64(11), "room1", &User::guest("Ann"), NONE, &())
        .unwrap();
    assert!(url.starts_with("https://chat.example.com/embed?rnd="));

    let tree = query_tree(&url);
    let session = tree["user"]["session"].as_str().unwrap();
    assert_eq!(session.len(), 40);

    // The session is drawn before the nonce.
    let mut rng = StdRng::seed_from_u64(11);
    assert_eq!(session, random_string(40, &mut rng));
    let nonce = random_string(32, &mut rng);
    assert_eq!(tree["rnd"], json!(nonce));

    let expected = digest(&[SECRET.into(), nonce, "Ann".into(), "room1".into()]);
    assert_eq!(tree["signature"], json!(expected));
}

#[test]
fn demo_style_url_with_rights_and_skin_options() {
    let config = config().with_client_id("client-1");
    let api = ChatApi::new(config).unwrap();
    let url = api
        .url_by_chat_id(
            "https://markuper.com",
            &json!({
                "id": 10001,
                "name": "Howard Lovecraft",
                "rights": {"kick_users": "on", "delete_messages": "my", "send_messages": true}
            }),
            NONE,
            &json!({"skin": "ebac_webinar", "skin_options": {"displayHeader": false, "lang": "ru"}}),
        )
        .unwrap();

    let tree = query_tree(&url);
    assert_eq!(tree["client_id"], json!("client-1"));
    assert_eq!(tree["chat_id"], json!("https://markuper.com"));
    assert_eq!(
        tree["user"]["rights"],
        json!({"kick_users": "1", "delete_messages": "my", "send_messages": "1"})
    );
    assert!(tree["user"].get("session").is_none());
    assert_eq!(tree["skin_options"], json!({"displayHeader": "0", "lang": "ru"}));
    assert!(url.contains("&skin=ebac_webinar&skin_options[displayHeader]=0&skin_options[lang]=ru"));
}

#[test]
fn participants_are_listed_and_signed() {
    let config = config();
    let participants = [Participant::new("2", "Bob"), Participant::bot("3", "Helper")];
    let url = ChatUrlBuilder::new(&config)
        .url("room1", &User::with_id("1").name("Ann"), &participants, &())
        .unwrap();
    let tree = query_tree(&url);
    assert_eq!(tree["recipients"]["0"], json!({"id": "2", "name": "Bob", "is_bot": "0"}));
    assert_eq!(tree["recipients"]["1"]["is_bot"], json!("1"));

    let nonce = tree["rnd"].as_str().unwrap().to_string();
    let expected = digest(&[
        SECRET.into(),
        nonce,
        "1".into(),
        "Ann".into(),
        "2".into(),
        "Bob".into(),
        "3".into(),
        "Helper".into(),
        "room1".into(),
    ]);
    assert_eq!(tree["signature"], json!(expected));
}

#[test]
fn custom_rights_schema_is_honoured() {
    let schema = RightsSchema::from_entries([("send_messages", RightKind::Boolean)]);
    let config = config().with_rights_schema(schema);
    let params = ChatUrlBuilder::new(&config)
        .params_with_rng(
            &mut StdRng::seed_from_u64(3),
            "room1",
            &json!({"id": "1", "rights": {"send_messages": "on", "kick_users": "on"}}),
            NONE,
            &(),
        )
        .unwrap();
    assert_eq!(params["user"]["rights"], json!({"send_messages": "1"}));
}
