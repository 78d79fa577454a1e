//! End-to-end behaviour of `ChannelGatewayClient` through its public API.
//!
//! Each test drives the client against [`FakeGateway`], an in-memory
//! [`Transport`] that behaves like the channel endpoints: it decodes the
//! request body, keeps track of open channels keyed by URL, signs nothing
//! and returns well-formed responses.
//!
//! # Coverage
//!
//! | Test | Behaviour |
//! |------|-----------|
//! | `full_channel_lifecycle` | create control → create data → delete data → delete control |
//! | `tokens_are_not_reused_across_calls` | two creates, two different tokens |
//! | `concurrent_callers_share_one_client` | parallel calls, distinct request ids |
//! | `gateway_rejection_surfaces_as_transport_error` | non-2xx from the fake gateway |

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use mgs_channel_client::api::{
    CreateControlChannelOutput, CreateDataChannelOutput, DeleteChannelOutput,
    MESSAGE_SCHEMA_VERSION,
};
use mgs_channel_client::{
    ChannelGatewayClient, ClientConfig, Credentials, GatewayError, Transport, TransportError,
    V4Signer,
};
use serde_json::Value;

const REGION: &str = "us-east-1";

#[derive(Default)]
struct FakeGateway {
    /// URL → token of every open channel.
    open: Mutex<HashMap<String, String>>,
    request_ids: Mutex<Vec<String>>,
}

impl FakeGateway {
    fn open_channels(&self) -> usize {
        self.open.lock().unwrap().len()
    }
}

impl Transport for FakeGateway {
    fn invoke(
        &self,
        payload: &[u8],
        method: &str,
        url: &str,
        region: &str,
        _signer: &V4Signer,
    ) -> Result<Vec<u8>, TransportError> {
        assert_eq!(region, REGION);
        let request: Value = serde_json::from_slice(payload).expect("client sent JSON");
        let request_id = request["RequestId"].as_str().unwrap_or_default().to_string();
        self.request_ids.lock().unwrap().push(request_id.clone());

        let identifier = url.rsplit('/').next().unwrap_or_default().to_string();
        let mut open = self.open.lock().unwrap();

        let body = match method {
            "POST" => {
                let token = format!("token-{identifier}-{request_id}");
                open.insert(url.to_string(), token.clone());
                if url.contains("/v1/data-channel/") {
                    serde_json::to_vec(&CreateDataChannelOutput {
                        message_schema_version: MESSAGE_SCHEMA_VERSION.into(),
                        token_value: token,
                    })
                } else {
                    serde_json::to_vec(&CreateControlChannelOutput {
                        message_schema_version: MESSAGE_SCHEMA_VERSION.into(),
                        token_value: token,
                    })
                }
            }
            "DELETE" => {
                if open.remove(url).is_none() {
                    return Err(TransportError::Status {
                        status: 404,
                        body: format!("no channel at {url}"),
                    });
                }
                serde_json::to_vec(&DeleteChannelOutput {
                    message_schema_version: MESSAGE_SCHEMA_VERSION.into(),
                    channel_id: identifier,
                })
            }
            other => panic!("unexpected method {other}"),
        };
        Ok(body.expect("fake gateway response serialises"))
    }
}

fn client(gateway: Arc<FakeGateway>) -> ChannelGatewayClient {
    let signer = Arc::new(V4Signer::new(Credentials::new("AKID", "SECRET")));
    ChannelGatewayClient::new(ClientConfig::new(REGION, signer), gateway)
}

#[test]
fn full_channel_lifecycle() {
    let gateway = Arc::new(FakeGateway::default());
    let client = client(Arc::clone(&gateway));

    let control = client
        .create_control_channel(&client.control_channel_input(), "i-12345678")
        .unwrap();
    assert!(control.token_value.starts_with("token-i-12345678-"));

    let data_input = client.data_channel_input("0c1f9a7e-58f4-4f55-9d52-3b9e4f0b2a6c");
    let data = client.create_data_channel(&data_input, "s-12345678").unwrap();
    assert!(data.token_value.starts_with("token-s-12345678-"));
    assert_eq!(gateway.open_channels(), 2);

    let deleted = client
        .delete_data_channel(&client.delete_channel_input(), "s-12345678")
        .unwrap();
    assert_eq!(deleted.channel_id, "s-12345678");

    let deleted = client
        .delete_control_channel(&client.delete_channel_input(), "i-12345678")
        .unwrap();
    assert_eq!(deleted.channel_id, "i-12345678");
    assert_eq!(gateway.open_channels(), 0);
}

#[test]
fn tokens_are_not_reused_across_calls() {
    let gateway = Arc::new(FakeGateway::default());
    let client = client(gateway);

    let first = client
        .create_control_channel(&client.control_channel_input(), "i-1")
        .unwrap();
    let second = client
        .create_control_channel(&client.control_channel_input(), "i-1")
        .unwrap();
    assert_ne!(first.token_value, second.token_value);
}

#[test]
fn concurrent_callers_share_one_client() {
    let gateway = Arc::new(FakeGateway::default());
    let client = client(Arc::clone(&gateway));

    std::thread::scope(|scope| {
        for n in 0..8 {
            let client = &client;
            scope.spawn(move || {
                let session = format!("s-{n:08}");
                let input = client.data_channel_input("0c1f9a7e-58f4-4f55-9d52-3b9e4f0b2a6c");
                let output = client.create_data_channel(&input, &session).unwrap();
                assert!(output.token_value.contains(&session));
            });
        }
    });

    let ids = gateway.request_ids.lock().unwrap();
    assert_eq!(ids.len(), 8);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 8, "request ids must never be reused");
    assert_eq!(gateway.open_channels(), 8);
}

#[test]
fn gateway_rejection_surfaces_as_transport_error() {
    let gateway = Arc::new(FakeGateway::default());
    let client = client(gateway);

    let err = client
        .delete_data_channel(&client.delete_channel_input(), "s-never-opened")
        .unwrap_err();
    match err {
        GatewayError::Transport(TransportError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected transport error, got {other:?}"),
    }
}
