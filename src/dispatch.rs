//! Message-type dispatch table.
//!
//! A [`Registry`] maps a header `msg_id` to the [`MessageHandler`] that
//! knows how to interpret that type's body.  The set of message types is
//! open: new types are added by registering new ids, never by extending a
//! match that must stay exhaustive.
//!
//! Handlers are strictly observational.  They inspect the header and body
//! and emit diagnostics; they never alter the datagram, which the server
//! echoes back verbatim whatever the dispatch outcome was.

use std::collections::HashMap;

use thiserror::Error;

use crate::codec::{EnvironmentBody, Header, ENV_BODY_LEN, MSG_ENVIRONMENT, MSG_TYPE_1};

/// Interprets the body of one message type.
///
/// Implementations must be read-only with respect to the datagram: observe,
/// log, return.  `Send + Sync` so a registry can be shared with a server
/// task.
pub trait MessageHandler: Send + Sync {
    /// Inspect one message of this handler's type.
    fn handle(&self, header: &Header, body: &[u8]) -> Result<(), HandleError>;
}

/// Outcome of routing one message through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler was registered for the message id and ran successfully.
    Handled,
    /// No handler is registered for this id.  Not an error — unknown types
    /// are a normal branch, reported and passed through.
    Unknown(u16),
}

/// Errors a handler can report about a structurally bad message.
///
/// These are recovered per-datagram: the server logs them and still echoes
/// the original bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    /// The body length does not match what this message type requires.
    #[error("message {msg_id:#06x}: invalid body size (expected {expected} bytes, got {actual})")]
    BodySize {
        msg_id: u16,
        expected: usize,
        actual: usize,
    },
}

/// Mapping from message-type id to handler.
pub struct Registry {
    handlers: HashMap<u16, Box<dyn MessageHandler>>,
}

impl Registry {
    /// An empty registry; every message dispatches to [`Dispatch::Unknown`].
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry with the built-in message types installed:
    /// [`EnvironmentHandler`] on [`MSG_ENVIRONMENT`] and [`TypeOneHandler`]
    /// on [`MSG_TYPE_1`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MSG_ENVIRONMENT, EnvironmentHandler);
        registry.register(MSG_TYPE_1, TypeOneHandler);
        registry
    }

    /// Register `handler` for `msg_id`, replacing any existing entry.
    pub fn register<H>(&mut self, msg_id: u16, handler: H)
    where
        H: MessageHandler + 'static,
    {
        self.handlers.insert(msg_id, Box::new(handler));
    }

    /// Route one decoded header and its body to the registered handler.
    pub fn dispatch(&self, header: &Header, body: &[u8]) -> Result<Dispatch, HandleError> {
        match self.handlers.get(&header.msg_id) {
            Some(handler) => handler.handle(header, body).map(|()| Dispatch::Handled),
            None => Ok(Dispatch::Unknown(header.msg_id)),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler for environment reports ([`MSG_ENVIRONMENT`]).
///
/// Requires the body to be exactly [`ENV_BODY_LEN`] bytes; decodes it and
/// logs the four measurements.
pub struct EnvironmentHandler;

impl MessageHandler for EnvironmentHandler {
    fn handle(&self, header: &Header, body: &[u8]) -> Result<(), HandleError> {
        let env = EnvironmentBody::decode(body).map_err(|_| HandleError::BodySize {
            msg_id: header.msg_id,
            expected: ENV_BODY_LEN,
            actual: body.len(),
        })?;

        log::info!(
            "env: temperature {} degC, pressure {} Pa, humidity {} %, radiation {} cps",
            env.temperature,
            env.pressure,
            env.humidity,
            env.radiation_level
        );
        Ok(())
    }
}

/// Handler for "message type 1" ([`MSG_TYPE_1`]).
///
/// The protocol defines no body layout for this type, so there is nothing
/// to decode.
pub struct TypeOneHandler;

impl MessageHandler for TypeOneHandler {
    fn handle(&self, _header: &Header, _body: &[u8]) -> Result<(), HandleError> {
        log::info!("message type 1");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn header(msg_id: u16) -> Header {
        Header {
            msg_id,
            version: 0,
            flags: 0,
            source: 0,
            spare: 0,
        }
    }

    fn env_body() -> [u8; ENV_BODY_LEN] {
        EnvironmentBody {
            temperature: 21.5,
            pressure: 1013.25,
            humidity: 45.0,
            radiation_level: 7,
        }
        .encode()
    }

    #[test]
    fn environment_message_is_handled() {
        let registry = Registry::with_defaults();
        let outcome = registry.dispatch(&header(MSG_ENVIRONMENT), &env_body());
        assert_eq!(outcome, Ok(Dispatch::Handled));
    }

    #[test]
    fn environment_body_mismatch_reports_sizes() {
        let registry = Registry::with_defaults();
        let outcome = registry.dispatch(&header(MSG_ENVIRONMENT), &[0u8; 10]);
        assert_eq!(
            outcome,
            Err(HandleError::BodySize {
                msg_id: MSG_ENVIRONMENT,
                expected: 14,
                actual: 10,
            })
        );
    }

    #[test]
    fn type_one_is_handled_without_body() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.dispatch(&header(MSG_TYPE_1), &[]), Ok(Dispatch::Handled));
    }

    #[test]
    fn unregistered_type_is_reported_as_unknown() {
        let registry = Registry::with_defaults();
        let outcome = registry.dispatch(&header(0x9999), b"whatever");
        assert_eq!(outcome, Ok(Dispatch::Unknown(0x9999)));
    }

    #[test]
    fn registering_a_new_type_routes_to_it() {
        struct Counting(Arc<AtomicUsize>);

        impl MessageHandler for Counting {
            fn handle(&self, _header: &Header, _body: &[u8]) -> Result<(), HandleError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::with_defaults();
        registry.register(0x4242, Counting(Arc::clone(&calls)));

        assert_eq!(registry.dispatch(&header(0x4242), &[]), Ok(Dispatch::Handled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registering_replaces_an_existing_handler() {
        struct Rejecting;

        impl MessageHandler for Rejecting {
            fn handle(&self, header: &Header, body: &[u8]) -> Result<(), HandleError> {
                Err(HandleError::BodySize {
                    msg_id: header.msg_id,
                    expected: 0,
                    actual: body.len(),
                })
            }
        }

        let mut registry = Registry::with_defaults();
        registry.register(MSG_TYPE_1, Rejecting);

        let outcome = registry.dispatch(&header(MSG_TYPE_1), &[1, 2]);
        assert_eq!(
            outcome,
            Err(HandleError::BodySize {
                msg_id: MSG_TYPE_1,
                expected: 0,
                actual: 2,
            })
        );
    }
}
