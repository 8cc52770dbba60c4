//! Push doorbell over Socket.IO (protocol 5) on an Engine.IO 4 websocket.

mod channel;
mod codec;

pub use channel::{PushSettings, SocketIoPushChannel};
pub use codec::{EnginePacket, SocketPacket};
