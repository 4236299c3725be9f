//! Portfolio assistant chat client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The assistant widget talks to an external completion endpoint that
//! answers a `{"question": ...}` POST with a stream of `data: <json>` lines.
//! This crate holds everything between the text box and that endpoint:
//! prompt validation, the request lifecycle, incremental stream decoding,
//! and the widget's own UI flags. Rendering is left to the caller, which
//! watches `SessionSnapshot`s.

pub mod config;
pub mod decode;
pub mod session;
pub mod transport;
pub mod types;
pub mod widget;

pub use config::ChatConfig;
pub use session::{SessionSnapshot, StreamingChatSession};
pub use types::{ChatError, Message, Role, SessionStatus, SubmitOutcome};
pub use widget::WidgetState;
