//! The `client` module holds what is specific to this end of the connection:
//! the identity it announces, and a console front end that drives a session
//! from standard input.

pub mod console;
pub mod identity;

pub use identity::ClientIdentity;
