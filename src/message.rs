//! Counter-tagged text messages, `"<seq>:<payload>"`.

use std::fmt;

pub const CLIENT_PAYLOAD: &str = "Hello, Server!";
pub const SERVER_PAYLOAD: &str = "Hello from the server!";


/// Per-side sequence counter. Starts at 0 and only moves forward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter(u64);

impl Counter {
    pub fn current(&self) -> u64 {
        self.0
    }

    pub fn advance(&mut self) {
        self.0 += 1;
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub seq: u64,
    pub payload: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(seq: u64, payload: &'a str) -> Self {
        Self { seq, payload }
    }

    /// Splits at the first `:`. `None` when the prefix is not a number.
    pub fn parse(text: &'a str) -> Option<Self> {
        let (seq, payload) = text.split_once(':')?;
        let seq = seq.parse().ok()?;
        Some(Self { seq, payload })
    }
}

impl<'a> fmt::Display for Message<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.seq, self.payload)
    }
}

pub fn client_message(seq: u64) -> String {
    Message::new(seq, CLIENT_PAYLOAD).to_string()
}

pub fn server_reply(seq: u64) -> String {
    Message::new(seq, SERVER_PAYLOAD).to_string()
}
