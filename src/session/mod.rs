//! The `session` module is the heart of the client.
//!
//! A [`Session`] owns one transport, the client identity and the single
//! stream subscription. It drives the connection state machine, turns user
//! operations into protocol commands, and routes inbound server events
//! through [`dispatch`] into state updates and [`Notification`]s.

pub mod dispatch;
pub mod engine;
pub mod notification;
pub mod state;
pub mod subscription;

pub use dispatch::{Dispatch, Mutation, dispatch};
pub use engine::{Session, SessionChannels};
pub use notification::{DiagnosticKind, Notification};
pub use state::ConnectionState;
pub use subscription::StreamSubscription;
