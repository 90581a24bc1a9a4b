
use std::{net::{TcpListener, TcpStream, SocketAddr}, io::Write, time::Instant};
use tracing::info;
use crate::{
    Error, Result,
    config::{ServerConfig, reached},
    message::{Counter, Message},
    packet::{Codec, PacketType},
    util::{shutdown::StopSignal, traffic::{Traffic, RateEstimator, ToHuman}},
};


pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    pub fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind)
        .map_err(|e| Error::bind(&config.bind, e))?;

        info!("Server is listening on {}", listener.local_addr()?);
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Waits for the one and only client. The listening socket is closed
    /// when this returns.
    pub fn accept(self) -> Result<Session> {
        let (socket, remote) = self.listener.accept()?;
        info!("Accepted connection from [{}]", remote);
        Session::new(socket, remote, self.config)
    }
}


pub struct Session {
    socket: TcpStream,
    remote: SocketAddr,
    codec: Codec,
    counter: Counter,
    traffic: Traffic,
    estimator: RateEstimator,
    stop: StopSignal,
    config: ServerConfig,
}

impl Session {
    fn new(socket: TcpStream, remote: SocketAddr, config: ServerConfig) -> Result<Self> {
        let stop = StopSignal::new();
        stop.arm(&socket)?;
        Ok(Self {
            socket,
            remote,
            codec: Codec::new(config.framing),
            counter: Counter::default(),
            traffic: Traffic::default(),
            estimator: RateEstimator::default(),
            stop,
            config,
        })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    pub fn counter(&self) -> Counter {
        self.counter
    }

    pub fn traffic(&self) -> Traffic {
        self.traffic
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// One iteration: read a request, print it, reply with the current
    /// counter. Returns the received text.
    pub fn serve_once<W: Write>(&mut self, out: &mut W) -> Result<String> {
        let data = self.codec.recv(&mut self.socket, PacketType::Request)?;
        writeln!(out, "Received data from client: {}", data)?;

        let rsp = Message::new(self.counter.current(), &self.config.reply).to_string();
        let n = self.codec.send(&mut self.socket, PacketType::Response, &rsp)?;
        self.counter.advance();

        self.traffic.inc_traffic((data.len() + n) as i64);
        if let Some(r) = self.estimator.estimate(Instant::now(), &self.traffic) {
            info!("serve rate: [{}]", r.to_human());
        }
        Ok(data)
    }

    /// Serves until the iteration limit, a stop request or the first error.
    /// Returns the number of completed iterations.
    pub fn serve<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        loop {
            if self.stop.is_requested() || reached(self.config.iterations, self.counter.current()) {
                break;
            }

            if let Err(e) = self.serve_once(out) {
                if self.stop.is_requested() {
                    break;
                }
                return Err(e)
            }
        }

        info!("served {} round-trips, {} bytes", self.counter.current().to_human(), self.traffic.bytes().to_human());
        Ok(self.counter.current())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop.disarm();
    }
}
