//! Text framing for the subset of Engine.IO / Socket.IO the doorbell needs.
//!
//! Engine.IO prefixes every frame with a digit: `0` open, `1` close, `2` ping,
//! `3` pong, `4` message. A message frame carries a Socket.IO packet, again
//! prefixed with a digit: `0` connect, `1` disconnect, `2` event, `4` connect
//! error.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,
    #[error("unknown packet type {0:?}")]
    UnknownType(char),
    #[error("malformed payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Value),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    /// Upgrade / noop frames; unused over a pure websocket transport.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Value),
    Disconnect,
    Event { name: String, args: Vec<Value> },
    ConnectError(Value),
    /// Acks and binary packets are never sent to this client.
    Other,
}

pub const PONG_FRAME: &str = "3";

pub fn decode(frame: &str) -> Result<EnginePacket, CodecError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let rest = chars.as_str();

    match kind {
        '0' => Ok(EnginePacket::Open(parse_json(rest)?)),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping),
        '3' => Ok(EnginePacket::Pong),
        '4' => Ok(EnginePacket::Message(decode_socket(rest)?)),
        '5' | '6' => Ok(EnginePacket::Other),
        other => Err(CodecError::UnknownType(other)),
    }
}

fn decode_socket(packet: &str) -> Result<SocketPacket, CodecError> {
    let mut chars = packet.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let body = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        '0' => Ok(SocketPacket::Connect(parse_json(body)?)),
        '1' => Ok(SocketPacket::Disconnect),
        '2' => {
            let Value::Array(mut items) = parse_json(body)? else {
                return Err(CodecError::Payload("event is not an array".into()));
            };
            if items.is_empty() {
                return Err(CodecError::Payload("event without a name".into()));
            }
            let Value::String(name) = items.remove(0) else {
                return Err(CodecError::Payload("event name is not a string".into()));
            };
            Ok(SocketPacket::Event { name, args: items })
        }
        '4' => Ok(SocketPacket::ConnectError(parse_json(body)?)),
        '3' | '5' | '6' => Ok(SocketPacket::Other),
        other => Err(CodecError::UnknownType(other)),
    }
}

/// `/admin,` prefix on non-default namespaces.
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        body.split_once(',').map(|(_, rest)| rest).unwrap_or("")
    } else {
        body
    }
}

fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn parse_json(body: &str) -> Result<Value, CodecError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|err| CodecError::Payload(err.to_string()))
}

/// `40{auth}`: join the default namespace.
pub fn encode_connect(auth: &Value) -> String {
    format!("40{auth}")
}

/// `42["name", ...args]`
pub fn encode_event(name: &str, args: &[Value]) -> String {
    let mut items = Vec::with_capacity(args.len() + 1);
    items.push(Value::String(name.to_string()));
    items.extend_from_slice(args);
    format!("42{}", Value::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_open_and_ping() {
        assert_eq!(
            decode(r#"0{"sid":"abc","pingInterval":25000}"#).unwrap(),
            EnginePacket::Open(json!({"sid": "abc", "pingInterval": 25000}))
        );
        assert_eq!(decode("2").unwrap(), EnginePacket::Ping);
        assert_eq!(decode("3").unwrap(), EnginePacket::Pong);
    }

    #[test]
    fn decodes_doorbell_event() {
        assert_eq!(
            decode(r#"42["clipboard_update"]"#).unwrap(),
            EnginePacket::Message(SocketPacket::Event {
                name: "clipboard_update".into(),
                args: vec![],
            })
        );
    }

    #[test]
    fn event_with_namespace_and_ack_id() {
        assert_eq!(
            decode(r#"42/sync,17["pong",{"t":1}]"#).unwrap(),
            EnginePacket::Message(SocketPacket::Event {
                name: "pong".into(),
                args: vec![json!({"t": 1})],
            })
        );
    }

    #[test]
    fn connect_ack_and_error() {
        assert_eq!(
            decode(r#"40{"sid":"s1"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::Connect(json!({"sid": "s1"})))
        );
        assert_eq!(
            decode(r#"44{"message":"invalid app key"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::ConnectError(
                json!({"message": "invalid app key"})
            ))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode(""), Err(CodecError::Empty));
        assert_eq!(decode("9"), Err(CodecError::UnknownType('9')));
        assert!(decode("42{not json").is_err());
    }

    #[test]
    fn encodes_connect_and_event() {
        assert_eq!(
            encode_connect(&json!({"appKey": "k"})),
            r#"40{"appKey":"k"}"#
        );
        assert_eq!(encode_event("ping", &[]), r#"42["ping"]"#);
    }
}
