//! Blocking rendition on `std::net`: one socket, one loop, no tasks.

mod server;
pub use server::*;

mod client;
pub use client::*;
