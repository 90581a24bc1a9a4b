
pub mod error;
pub mod config;
pub mod message;
pub mod packet;
pub mod impl_std;
pub mod impl_async;
pub mod util;

pub use error::{Error, Result};
