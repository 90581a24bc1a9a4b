
use std::{net::{TcpStream, SocketAddr}, io::Write, time::Instant};
use tracing::info;
use crate::{
    Error, Result,
    config::{ClientConfig, reached},
    message::{Counter, Message},
    packet::{Codec, PacketType},
    util::{shutdown::StopSignal, traffic::{Traffic, RateEstimator, LatencyStats, ToHuman}},
};


pub struct Client {
    socket: TcpStream,
    codec: Codec,
    counter: Counter,
    traffic: Traffic,
    estimator: RateEstimator,
    latency: LatencyStats,
    stop: StopSignal,
    config: ClientConfig,
}

impl Client {
    pub fn connect(config: ClientConfig) -> Result<Self> {
        info!("Connecting to [{}]...", config.target);
        let socket = TcpStream::connect(&config.target)
        .map_err(|e| Error::connect(&config.target, e))?;

        info!("local [{}] connected to [{}]", socket.local_addr()?, config.target);

        let stop = StopSignal::new();
        stop.arm(&socket)?;

        Ok(Self {
            socket,
            codec: Codec::new(config.framing),
            counter: Counter::default(),
            traffic: Traffic::default(),
            estimator: RateEstimator::default(),
            latency: LatencyStats::default(),
            stop,
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

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Sends `"<counter>:<payload>"` and waits for the reply. Returns the
    /// reply text.
    pub fn round_trip<W: Write>(&mut self, out: &mut W) -> Result<String> {
        let req = Message::new(self.counter.current(), &self.config.payload).to_string();

        let start = Instant::now();
        let n = self.codec.send(&mut self.socket, PacketType::Request, &req)?;
        let rsp = self.codec.recv(&mut self.socket, PacketType::Response)?;
        self.latency.record(start.elapsed());

        writeln!(out, "Received response from server: {}", rsp)?;
        self.counter.advance();

        self.traffic.inc_traffic((n + rsp.len()) as i64);
        if let Some(r) = self.estimator.estimate(Instant::now(), &self.traffic) {
            info!("round-trip rate: [{}]", r.to_human());
        }
        Ok(rsp)
    }

    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        loop {
            if self.stop.is_requested() || reached(self.config.iterations, self.counter.current()) {
                break;
            }

            if let Err(e) = self.round_trip(out) {
                if self.stop.is_requested() {
                    break;
                }
                return Err(e)
            }
        }

        info!("{}", self.latency);
        Ok(self.counter.current())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.stop.disarm();
    }
}
