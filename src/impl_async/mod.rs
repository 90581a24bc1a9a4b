
mod server;
pub use server::*;

mod client;
pub use client::*;

mod impl_tokio;
pub use impl_tokio::*;
