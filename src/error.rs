
use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("fail to bind at [{addr}]")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("fail to connect to [{addr}]")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("i/o error")]
    Io(#[from] io::Error),

    #[error("connection closed by peer")]
    PeerClosed,

    #[error("invalid utf-8 message")]
    Decode(#[from] std::str::Utf8Error),

    #[error("expect packet type [{expect}], but [{got}]")]
    UnexpectedPacket { expect: u8, got: u8 },

    #[error("frame length [{len}] exceeds limit [{max}]")]
    FrameTooLarge { len: usize, max: usize },
}

impl Error {
    /// read/write failures after the connection is up, including peer disconnect
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_) | Error::PeerClosed | Error::Decode(_))
    }

    pub(crate) fn bind(addr: &str, source: io::Error) -> Self {
        Error::Bind { addr: addr.to_owned(), source }
    }

    pub(crate) fn connect(addr: &str, source: io::Error) -> Self {
        Error::Connect { addr: addr.to_owned(), source }
    }
}
