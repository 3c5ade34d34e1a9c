//! Client-side tooling for a BTCPay-style invoice webhook service.
//!
//! Two independent capabilities, matching the two sides of the service's
//! external surface:
//!
//! * [`sign`]: compute the HMAC-SHA256 tag a webhook sender attaches to an
//!   invoice update payload.
//! * [`listen`]: hold one websocket connection to the service's
//!   `/ws?invoice_id=<id>` endpoint and surface each status message until
//!   the server closes the feed.
//!
//! Neither capability depends on the other; the CLI in the `cli` member
//! crate exposes them as the `sign` and `listen` subcommands.

#![forbid(unsafe_code)]

pub mod endpoint;
pub mod invoice;
pub mod listen;
pub mod sign;

pub use endpoint::WatchEndpoint;
pub use listen::{ListenError, Listener};
pub use sign::{Digest, WebhookSigner};
