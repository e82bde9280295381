pub mod handler;
pub mod protocol;
pub mod types;

pub use handler::MessageHandler;
pub use protocol::JsonProtocol;
pub use types::*;
