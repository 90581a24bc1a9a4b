
use std::{future::Future, io::Write, net::SocketAddr, time::Instant};
use tokio::net::{TcpListener, TcpStream};
use tracing::info;
use crate::{
    Error, Result,
    config::{ServerConfig, reached},
    message::{Counter, Message},
    packet::{Codec, PacketType},
    util::traffic::{Traffic, RateEstimator, ToHuman},
};


pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind).await
        .map_err(|e| Error::bind(&config.bind, e))?;

        info!("Server is listening on {}", listener.local_addr()?);
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn accept(self) -> Result<Session> {
        let (socket, remote) = self.listener.accept().await?;
        info!("Accepted connection from [{}]", remote);
        Ok(Session {
            socket,
            remote,
            codec: Codec::new(self.config.framing),
            counter: Counter::default(),
            traffic: Traffic::default(),
            estimator: RateEstimator::default(),
            config: self.config,
        })
    }
}


pub struct Session {
    socket: TcpStream,
    remote: SocketAddr,
    codec: Codec,
    counter: Counter,
    traffic: Traffic,
    estimator: RateEstimator,
    config: ServerConfig,
}

impl Session {
    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    pub fn counter(&self) -> Counter {
        self.counter
    }

    pub async fn serve_once<W: Write>(&mut self, out: &mut W) -> Result<String> {
        let data = self.codec.recv_async(&mut self.socket, PacketType::Request).await?;
        writeln!(out, "Received data from client: {}", data)?;

        let rsp = Message::new(self.counter.current(), &self.config.reply).to_string();
        let n = self.codec.send_async(&mut self.socket, PacketType::Response, &rsp).await?;
        self.counter.advance();

        self.traffic.inc_traffic((data.len() + n) as i64);
        if let Some(r) = self.estimator.estimate(Instant::now(), &self.traffic) {
            info!("serve rate: [{}]", r.to_human());
        }
        Ok(data)
    }

    pub async fn serve<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        while !reached(self.config.iterations, self.counter.current()) {
            self.serve_once(out).await?;
        }
        Ok(self.counter.current())
    }

    /// Like `serve`, but returns `Ok` as soon as `stop` resolves.
    pub async fn serve_until<W, F>(&mut self, out: &mut W, stop: F) -> Result<u64>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::select! {
            r = self.serve(out) => { r?; },
            _ = stop => info!("stop requested"),
        }
        info!("served {} round-trips, {} bytes", self.counter.current().to_human(), self.traffic.bytes().to_human());
        Ok(self.counter.current())
    }
}
