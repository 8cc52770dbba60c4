pub mod events;
pub mod files;
pub mod http;
pub mod push;
pub mod time;

pub use events::BroadcastSyncEvents;
pub use files::TokioLocalFiles;
pub use http::ReqwestClipboardTransport;
pub use push::SocketIoPushChannel;
pub use time::SystemClock;
