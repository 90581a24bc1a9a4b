
use std::{future::Future, io::Write, net::SocketAddr, time::Instant};
use tokio::net::TcpStream;
use tracing::info;
use crate::{
    Error, Result,
    config::{ClientConfig, reached},
    message::{Counter, Message},
    packet::{Codec, PacketType},
    util::traffic::{Traffic, RateEstimator, LatencyStats, ToHuman},
};


pub struct Client {
    socket: TcpStream,
    codec: Codec,
    counter: Counter,
    traffic: Traffic,
    estimator: RateEstimator,
    latency: LatencyStats,
    config: ClientConfig,
}

impl Client {
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        info!("Connecting to [{}]...", config.target);
        let socket = TcpStream::connect(&config.target).await
        .map_err(|e| Error::connect(&config.target, e))?;

        info!("local [{}] connected to [{}]", socket.local_addr()?, config.target);

        Ok(Self {
            socket,
            codec: Codec::new(config.framing),
            counter: Counter::default(),
            traffic: Traffic::default(),
            estimator: RateEstimator::default(),
            latency: LatencyStats::default(),
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn counter(&self) -> Counter {
        self.counter
    }

    pub fn latency(&self) -> &LatencyStats {
        &self.latency
    }

    pub async fn round_trip<W: Write>(&mut self, out: &mut W) -> Result<String> {
        let req = Message::new(self.counter.current(), &self.config.payload).to_string();

        let start = Instant::now();
        let n = self.codec.send_async(&mut self.socket, PacketType::Request, &req).await?;
        let rsp = self.codec.recv_async(&mut self.socket, PacketType::Response).await?;
        self.latency.record(start.elapsed());

        writeln!(out, "Received response from server: {}", rsp)?;
        self.counter.advance();

        self.traffic.inc_traffic((n + rsp.len()) as i64);
        if let Some(r) = self.estimator.estimate(Instant::now(), &self.traffic) {
            info!("round-trip rate: [{}]", r.to_human());
        }
        Ok(rsp)
    }

    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        while !reached(self.config.iterations, self.counter.current()) {
            self.round_trip(out).await?;
        }
        Ok(self.counter.current())
    }

    pub async fn run_until<W, F>(&mut self, out: &mut W, stop: F) -> Result<u64>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::select! {
            r = self.run(out) => { r?; },
            _ = stop => info!("stop requested"),
        }
        info!("{}", self.latency);
        Ok(self.counter.current())
    }
}
