//! Version-adaptive codec for the Bancho client/server protocol.
//!
//! Callers pick a dialect with [`dispatch::select_dialect`] from a client's
//! reported build number, then hand frames through [`frame`] and packet
//! bodies through the selected [`dialect::Dialect`]. Everything above the
//! wire -- [`model`]'s structs and enums -- is version-independent; the
//! dialect is what knows how to get a given struct on and off a given
//! build's wire.

pub mod codecs;
pub mod dialect;
pub mod dialects;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod gzip;
pub mod model;
pub mod payload;
pub mod primitives;
pub mod remap;

pub use dialect::{Context, Dialect};
pub use dispatch::select_dialect;
pub use error::{BanchoError, Result};
pub use model::CanonicalId;
pub use payload::PacketPayload;
