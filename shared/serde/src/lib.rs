//! # Roomsync Serde
//! Big-endian packet reader and writer shared by the roomsync crates.
//!
//! Two protocol variants coexist on the wire. They differ only in how a
//! handful of primitives are framed (ids, some counts, floats), so the
//! variant travels with every reader and writer instead of being baked into
//! separate codec types.

mod error;
mod packet_reader;
mod packet_writer;
mod serde;
mod variant;

pub use error::SerdeErr;
pub use packet_reader::PacketReader;
pub use packet_writer::PacketWriter;
pub use serde::Serde;
pub use variant::ProtocolVariant;
