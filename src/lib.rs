//! Reading, editing and writing Autonauts world saves.
//!
//! [`world::World`] is the entry point: [`World::decode`](world::World::decode)
//! turns a parsed save document into the in-memory model and
//! [`World::encode`](world::World::encode) produces the document again.
//! [`persistence`] wraps both with file handling.

pub mod cli;
pub mod codec;
pub mod config;
pub mod objects;
pub mod persistence;
pub mod world;
