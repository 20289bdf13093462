//! # streamlink
//!
//! `streamlink` is a WebSocket client for a simple stream server. A client
//! connects, announces its id, sends free text, and follows one named stream
//! of numeric values at a time. Everything it learns is reported as typed
//! notifications, leaving rendering to whoever embeds it.
//!
//! ## Core Modules
//!
//! - `transport`: the wire protocol, its JSON codec, and the WebSocket transport.
//! - `session`: the connection state machine, stream subscription and event dispatch.
//! - `client`: the client identity and a console front end.
//! - `config`: loading client configuration from files and the environment.
//! - `utils`: shared error types and logging setup.

pub mod client;
pub mod config;
pub mod session;
pub mod transport;
pub mod utils;
