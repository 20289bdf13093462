//! The `utils` module holds the pieces shared by every other module of
//! `streamlink`: the error types and the logging setup.

pub mod error;
pub mod logging;

pub use error::{DecodeError, SessionError, TransportError};

#[cfg(test)]
mod tests {
    use super::logging;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("WARNING");
        logging::init("nonsense");
    }
}
