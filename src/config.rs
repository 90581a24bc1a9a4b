
use crate::{message::{CLIENT_PAYLOAD, SERVER_PAYLOAD}, packet::Framing};

/// shared by client and server so both ends agree on the port
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: &str = "12345";
pub const DEFAULT_ADDR: &str = "127.0.0.1:12345";


#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub framing: Framing,
    pub reply: String,
    /// `None` serves forever
    pub iterations: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_ADDR.to_owned(),
            framing: Framing::default(),
            reply: SERVER_PAYLOAD.to_owned(),
            iterations: None,
        }
    }
}

impl ServerConfig {
    pub fn with_bind<S: Into<String>>(mut self, bind: S) -> Self {
        self.bind = bind.into();
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }
}


#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub target: String,
    pub framing: Framing,
    pub payload: String,
    pub iterations: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_ADDR.to_owned(),
            framing: Framing::default(),
            payload: CLIENT_PAYLOAD.to_owned(),
            iterations: None,
        }
    }
}

impl ClientConfig {
    pub fn with_target<S: Into<String>>(mut self, target: S) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_payload<S: Into<String>>(mut self, payload: S) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }
}

/// true once `done` round-trips reach the configured limit
pub(crate) fn reached(iterations: Option<u64>, done: u64) -> bool {
    match iterations {
        Some(n) => done >= n,
        None => false,
    }
}
