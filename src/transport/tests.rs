use crate::transport::codec::{decode, encode};
use crate::transport::message::{Command, ServerEvent};
use crate::utils::DecodeError;
use serde_json::json;

#[test]
fn test_encode_announce() {
    let cmd = Command::Announce {
        client_id: "UnityClient1".to_string(),
    };
    assert_eq!(
        encode(&cmd).unwrap(),
        r#"{"command":"client_id","client_id":"UnityClient1"}"#
    );
}

#[test]
fn test_encode_message() {
    let cmd = Command::Message {
        client_id: "c1".to_string(),
        data: "hello \"there\"".to_string(),
    };
    assert_eq!(
        encode(&cmd).unwrap(),
        r#"{"command":"message","client_id":"c1","data":"hello \"there\""}"#
    );
}

#[test]
fn test_encode_request_stream() {
    let cmd = Command::RequestStream {
        client_id: "c1".to_string(),
        stream_name: "temp".to_string(),
    };
    assert_eq!(
        encode(&cmd).unwrap(),
        r#"{"command":"request_stream_data","client_id":"c1","stream_name":"temp"}"#
    );
}

#[test]
fn test_encode_producer_commands() {
    let publish = Command::StreamData {
        client_id: "c1".to_string(),
        stream_name: "temp".to_string(),
        data: "21.3".to_string(),
    };
    assert_eq!(
        encode(&publish).unwrap(),
        r#"{"command":"stream_data","client_id":"c1","stream_name":"temp","data":"21.3"}"#
    );

    let whisper = Command::SendToClient {
        client_id: "c1".to_string(),
        target_id: "c2".to_string(),
        data: "psst".to_string(),
    };
    assert_eq!(
        encode(&whisper).unwrap(),
        r#"{"command":"send_to_client","client_id":"c1","target_id":"c2","data":"psst"}"#
    );
}

#[test]
fn test_tag_matches_encoded_command_field() {
    let commands = [
        Command::Broadcast {
            client_id: "c1".to_string(),
            data: "x".to_string(),
        },
        Command::StartStream {
            client_id: "c1".to_string(),
            stream_name: "s".to_string(),
        },
        Command::CloseStream {
            client_id: "c1".to_string(),
            stream_name: "s".to_string(),
        },
    ];

    for cmd in commands {
        let value: serde_json::Value = serde_json::from_str(&encode(&cmd).unwrap()).unwrap();
        assert_eq!(value["command"], cmd.tag());
    }
}

#[test]
fn test_decode_stream_data() {
    let payload = json!({"command": "stream_data", "stream_name": "temp", "data": "21.3"});
    let event = decode(payload.to_string().as_bytes()).unwrap();
    assert_eq!(
        event,
        ServerEvent::StreamData {
            stream_name: "temp".to_string(),
            data: "21.3".to_string(),
        }
    );
}

#[test]
fn test_decode_numeric_data_as_text() {
    let payload = json!({"command": "stream_data", "stream_name": "temp", "data": 21.5});
    match decode(payload.to_string().as_bytes()).unwrap() {
        ServerEvent::StreamData { data, .. } => assert_eq!(data, "21.5"),
        other => panic!("Expected StreamData, got {:?}", other),
    }
}

#[test]
fn test_decode_null_data_is_missing_field() {
    let payload = json!({"command": "stream_data", "stream_name": "temp", "data": null});
    assert_eq!(
        decode(payload.to_string().as_bytes()),
        Err(DecodeError::MissingField {
            command: "stream_data".to_string(),
            field: "data",
        })
    );
}

#[test]
fn test_decode_broadcast_and_request_id() {
    assert_eq!(
        decode(br#"{"command":"broadcast","data":"hi all"}"#).unwrap(),
        ServerEvent::Broadcast {
            data: "hi all".to_string()
        }
    );
    assert_eq!(
        decode(br#"{"command":"REQUEST_ID"}"#).unwrap(),
        ServerEvent::RequestId
    );
    assert_eq!(
        decode(br#"{"command":"SERVER_CLOSING"}"#).unwrap(),
        ServerEvent::ServerClosing
    );
}

#[test]
fn test_decode_relayed_message() {
    let payload = json!({"command": "send_to_client", "client_id": "c2", "target_id": "c1", "data": "yo"});
    assert_eq!(
        decode(payload.to_string().as_bytes()).unwrap(),
        ServerEvent::Relayed {
            sender: Some("c2".to_string()),
            data: "yo".to_string(),
        }
    );
}

#[test]
fn test_decode_malformed() {
    assert!(matches!(decode(b"not json"), Err(DecodeError::Malformed(_))));
    assert!(matches!(decode(b"[1, 2]"), Err(DecodeError::Malformed(_))));
    assert!(matches!(decode(&[0xff, 0xfe]), Err(DecodeError::Malformed(_))));
}

#[test]
fn test_decode_without_command_is_unrecognized() {
    assert_eq!(
        decode(br#"{"foo":"bar"}"#).unwrap(),
        ServerEvent::Unrecognized
    );
}

#[test]
fn test_decode_unknown_command_is_preserved_verbatim() {
    // tags are case-sensitive
    assert_eq!(
        decode(br#"{"command":"request_id"}"#).unwrap(),
        ServerEvent::Unknown {
            raw_command: "request_id".to_string()
        }
    );
    assert_eq!(
        decode(br#"{"command":"Stream_Data","stream_name":"a","data":"1"}"#).unwrap(),
        ServerEvent::Unknown {
            raw_command: "Stream_Data".to_string()
        }
    );
}

#[test]
fn test_decode_missing_required_field() {
    assert_eq!(
        decode(br#"{"command":"broadcast"}"#),
        Err(DecodeError::MissingField {
            command: "broadcast".to_string(),
            field: "data",
        })
    );
}

#[test]
fn test_server_echo_of_outbound_commands() {
    // What the server relays back for each command the client can originate
    let broadcast = Command::Broadcast {
        client_id: "c1".to_string(),
        data: "hello".to_string(),
    };
    assert_eq!(
        decode(encode(&broadcast).unwrap().as_bytes()).unwrap(),
        ServerEvent::Broadcast {
            data: "hello".to_string()
        }
    );

    let publish = Command::StreamData {
        client_id: "c1".to_string(),
        stream_name: "temp".to_string(),
        data: "3.5".to_string(),
    };
    assert_eq!(
        decode(encode(&publish).unwrap().as_bytes()).unwrap(),
        ServerEvent::StreamData {
            stream_name: "temp".to_string(),
            data: "3.5".to_string(),
        }
    );

    let message = Command::Message {
        client_id: "c1".to_string(),
        data: "direct".to_string(),
    };
    assert_eq!(
        decode(encode(&message).unwrap().as_bytes()).unwrap(),
        ServerEvent::Direct {
            data: "direct".to_string()
        }
    );

    let whisper = Command::SendToClient {
        client_id: "c1".to_string(),
        target_id: "c2".to_string(),
        data: "psst".to_string(),
    };
    assert_eq!(
        decode(encode(&whisper).unwrap().as_bytes()).unwrap(),
        ServerEvent::Relayed {
            sender: Some("c1".to_string()),
            data: "psst".to_string(),
        }
    );

    let announce = Command::Announce {
        client_id: "c1".to_string(),
    };
    assert_eq!(
        decode(encode(&announce).unwrap().as_bytes()).unwrap(),
        ServerEvent::Unknown {
            raw_command: "client_id".to_string()
        }
    );
}
