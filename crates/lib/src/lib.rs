//! Courier core library — relay dispatcher, backend client, context store,
//! chunking, and the channel seam used by platform adapters.

pub mod backend;
pub mod channels;
pub mod chunker;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatcher;
