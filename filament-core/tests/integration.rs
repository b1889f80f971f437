//! Integration Tests
//!
//! These tests drive the full loop: signals feed effects, effects update
//! mounted components, and events from the DOM or a real WebSocket peer call
//! back into signals.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use filament_core::dom::{DomRenderer, MemoryDocument};
use filament_core::reactive::Signal;
use filament_core::remote::{ConnectionState, RemoteListener, RemoteRenderer};
use filament_core::render::{Callback, Renderer};
use filament_core::{Error, RemoteConfig};

type Peer = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Bind on an ephemeral port and attach one peer.
async fn connect_peer() -> (RemoteRenderer, Peer, String) {
    let config = RemoteConfig::default()
        .with_bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
        .with_connect_timeout(Duration::from_secs(5));
    let listener = RemoteListener::bind(config).await.unwrap();
    let url = format!("ws://{}", listener.local_addr());

    let client_url = url.clone();
    let client = tokio::spawn(async move { connect_async(client_url).await.unwrap().0 });

    let renderer = listener.wait_for_peer().await.unwrap();
    let peer = client.await.unwrap();
    (renderer, peer, url)
}

/// Next text frame from the renderer, as JSON.
async fn next_record(peer: &mut Peer) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), peer.next())
            .await
            .expect("timed out waiting for a record")
            .expect("stream ended")
            .expect("read failed");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Test the counter loop through the DOM backend.
#[test]
fn dom_counter_updates_label() {
    let document = MemoryDocument::new();
    let body = document.create_root("body");
    let renderer = DomRenderer::new(document.clone(), body);
    let counter = Signal::new(0_i64);

    let inc = renderer.new_component("button");
    inc.set_attribute("innerText", "increment").unwrap();
    let c = counter.clone();
    inc.set_attribute("on:click", Callback::new(move || c.set_with(|n| n + 1)))
        .unwrap();

    let dec = renderer.new_component("button");
    dec.set_attribute("innerText", "decrement").unwrap();
    let c = counter.clone();
    dec.set_attribute("on:click", Callback::new(move || c.set_with(|n| n - 1)))
        .unwrap();

    let label = renderer.new_component("span");
    label.set_attribute("innerText", 0).unwrap();
    let (c, l) = (counter.clone(), label.clone());
    counter.effect(move || {
        l.set_attribute("innerText", c.value()).unwrap();
    });

    renderer
        .render(&[inc.clone(), dec.clone(), label.clone()])
        .unwrap();

    let inc_el = inc.handle().unwrap();
    let dec_el = dec.handle().unwrap();
    let label_el = label.handle().unwrap();

    document.dispatch(inc_el, "click");
    document.dispatch(inc_el, "click");
    document.dispatch(dec_el, "click");

    assert_eq!(counter.value(), 1);
    assert_eq!(document.property(label_el, "innerText").unwrap().to_string(), "1");
}

/// Test a list that grows by appending to a mounted parent from an effect.
#[test]
fn dom_list_appends_items_from_effect() {
    let document = MemoryDocument::new();
    let body = document.create_root("body");
    let renderer = Arc::new(DomRenderer::new(document.clone(), body));
    let items: Signal<Vec<String>> = Signal::default();

    let list = renderer.new_component("ul");
    renderer.render(&[list.clone()]).unwrap();

    let (r, l, i) = (renderer.clone(), list.clone(), items.clone());
    items.effect(move || {
        let Some(last) = i.value().last().cloned() else {
            return;
        };
        let item = r.new_component("li");
        item.set_attribute("innerText", last).unwrap();
        r.append(&l, &item).unwrap();
    });

    items.set_with(|v| [v.clone(), vec!["milk".to_string()]].concat());
    items.set_with(|v| [v.clone(), vec!["eggs".to_string()]].concat());

    let texts: Vec<String> = document
        .children(list.handle().unwrap())
        .into_iter()
        .map(|el| document.property(el, "innerText").unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["milk", "eggs"]);
    assert_eq!(list.children().len(), 2);
}

/// Test the full remote loop: create records, a click from the peer, and the
/// resulting update record.
#[tokio::test]
async fn remote_click_round_trip() {
    let (renderer, mut peer, _url) = connect_peer().await;
    let counter = Signal::new(0_i64);

    let dialog = renderer.new_component("dialog");
    dialog.set_attribute("title", "Counter").unwrap();

    let button = renderer.new_component("button");
    button.set_attribute("text", "0").unwrap();
    let c = counter.clone();
    button
        .set_attribute("on:click", Callback::new(move || c.set_with(|n| n + 1)))
        .unwrap();
    dialog.add_child(&button);

    let (c, b) = (counter.clone(), button.clone());
    counter.effect(move || {
        b.set_attribute("text", c.value().to_string()).unwrap();
    });

    renderer.render(&[dialog.clone()]).unwrap();
    assert!(renderer.has_handler(button.id(), "click"));

    assert_eq!(
        next_record(&mut peer).await,
        json!({"method": "create", "id": 1, "type": "dialog",
               "data": {"title": "Counter", "notitlebar": false}})
    );
    assert_eq!(
        next_record(&mut peer).await,
        json!({"method": "action", "id": 1, "type": "dialog", "data": null, "action": "show"})
    );
    assert_eq!(
        next_record(&mut peer).await,
        json!({"method": "create", "id": 2, "type": "button",
               "data": {"dialogId": 1, "text": "0", "label": null}})
    );

    // Junk and unknown events must not stop the reader.
    peer.send(Message::Text("not json".into())).await.unwrap();
    peer.send(Message::Text(r#"{"id":99,"event":"click"}"#.into()))
        .await
        .unwrap();
    peer.send(Message::Text(r#"{"id":2,"event":"click"}"#.into()))
        .await
        .unwrap();

    assert_eq!(
        next_record(&mut peer).await,
        json!({"method": "update", "id": 2, "type": "button", "data": {"text": "1"}})
    );
    assert_eq!(counter.value(), 1);
}

/// Test that a handler runs exactly once per matching event.
#[tokio::test]
async fn remote_handler_runs_once_per_event() {
    let (renderer, mut peer, _url) = connect_peer().await;
    let clicks = Arc::new(AtomicUsize::new(0));

    // Each click is echoed back as a label update so the test can wait on it.
    let button = renderer.new_component("button");
    let (b, clicks_clone) = (button.clone(), clicks.clone());
    button
        .set_attribute(
            "on:click",
            Callback::new(move || {
                let n = clicks_clone.fetch_add(1, Ordering::SeqCst) + 1;
                b.set_attribute("label", n as i64).unwrap();
            }),
        )
        .unwrap();

    renderer.render(&[button.clone()]).unwrap();
    next_record(&mut peer).await;

    for expected in 1..=2_i64 {
        let frame = json!({"id": button.id(), "event": "click"}).to_string();
        peer.send(Message::Text(frame)).await.unwrap();

        assert_eq!(
            next_record(&mut peer).await,
            json!({"method": "update", "id": 1, "type": "button", "data": {"label": expected}})
        );
    }
    assert_eq!(clicks.load(Ordering::SeqCst), 2);
}

/// Test that a second peer is turned away while the first is attached.
#[tokio::test]
async fn second_peer_is_rejected() {
    let (renderer, _peer, url) = connect_peer().await;

    assert!(connect_async(url).await.is_err());
    assert_eq!(renderer.state(), ConnectionState::Connected);
}

/// Test that once the peer leaves, enqueueing fails instead of piling up.
#[tokio::test]
async fn enqueue_after_disconnect_fails_fast() {
    let (renderer, peer, _url) = connect_peer().await;

    let button = renderer.new_component("button");
    renderer.render(&[button.clone()]).unwrap();

    drop(peer);
    renderer.closed().await;
    assert_eq!(renderer.state(), ConnectionState::Closed);

    assert!(matches!(
        button.set_attribute("text", "late"),
        Err(Error::QueueClosed)
    ));
    let other = renderer.new_component("button");
    assert!(matches!(
        renderer.render(&[other]),
        Err(Error::QueueClosed)
    ));
}
