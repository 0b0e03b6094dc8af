//! Framed message exchange over a real localhost socket.

use framewire_common::channel::{BridgeListener, BridgeStream};
use framewire_common::protocol::{BridgeMessage, CallRequest, CallResult, ObjectRegistration};
use serde_json::json;

#[tokio::test]
async fn messages_survive_the_wire() {
    let listener = BridgeListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let mut stream = listener.accept().await.unwrap();

        // Host side: announce an object, then answer the first call.
        stream
            .send(&BridgeMessage::Registration(ObjectRegistration::new(
                "calc",
                ["add"],
            )))
            .await
            .unwrap();

        match stream.recv().await.unwrap() {
            BridgeMessage::CallRequest(request) => {
                assert_eq!(request.object, "calc");
                assert_eq!(request.method, "add");
                stream
                    .send(&BridgeMessage::CallResult(CallResult::success(
                        request.call_id,
                        json!(5),
                    )))
                    .await
                    .unwrap();
            }
            other => panic!("expected a call request, got {:?}", other),
        }
    });

    let mut stream = BridgeStream::connect(&addr.to_string()).await.unwrap();

    let registration = stream.recv().await.unwrap();
    assert_eq!(
        registration,
        BridgeMessage::Registration(ObjectRegistration::new("calc", ["add"]))
    );

    stream
        .send(&BridgeMessage::CallRequest(CallRequest {
            call_id: 1,
            object: "calc".into(),
            method: "add".into(),
            args: json!([2, 3]),
        }))
        .await
        .unwrap();

    let result = stream.recv().await.unwrap();
    assert_eq!(
        result,
        BridgeMessage::CallResult(CallResult::success(1, json!(5)))
    );

    server.await.unwrap();
}

#[tokio::test]
async fn recv_reports_peer_disconnect() {
    let listener = BridgeListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let stream = listener.accept().await.unwrap();
        drop(stream);
    });

    let mut stream = BridgeStream::connect(&addr.to_string()).await.unwrap();
    server.await.unwrap();

    assert!(stream.recv().await.is_err());
}
