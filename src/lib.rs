//! `message-echo` — a UDP server that inspects typed messages and echoes
//! them back unchanged.
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────┐  datagram   ┌───────────────────────────────┐
//!  │  Device  │────────────▶│            Server             │
//!  └────▲─────┘             │  (owns socket + dispatch)     │
//!       │                   └──────┬─────────────────┬──────┘
//!       │ echo (same bytes)        │ header/body     │ msg_id
//!       └──────────────────────────┤                 ▼
//!                            ┌─────▼─────┐     ┌──────────┐
//!                            │   Socket  │     │ Registry │
//!                            │ (raw I/O) │     │ handlers │
//!                            └───────────┘     └──────────┘
//! ```
//!
//! Each module has a single responsibility:
//! - [`codec`]    — wire format (serialise / deserialise header and bodies)
//! - [`dispatch`] — message-type registry and the built-in handlers
//! - [`socket`]   — async UDP socket abstraction (raw bytes only)
//! - [`server`]   — configuration, lifecycle, and the serving loop
//!
//! Decoding is purely observational: whatever the decode or dispatch
//! outcome, the reply is byte-for-byte the received datagram.

pub mod codec;
pub mod dispatch;
pub mod server;
pub mod socket;

pub use codec::{
    DecodeError, EnvironmentBody, Header, ENV_BODY_LEN, HEADER_LEN, MSG_ENVIRONMENT, MSG_TYPE_1,
};
pub use dispatch::{Dispatch, HandleError, MessageHandler, Registry};
pub use server::{Server, ServerConfig, ServerError, DEFAULT_PORT, DEFAULT_RECV_BUFFER};
