

use std::{time::{Duration, Instant}, fmt::Write};
use num_format::{Locale, ToFormattedString};


#[derive(Debug)]
pub struct Interval {
    time: Instant,
    milli: u64,
}

impl Interval {
    pub fn new(milli: u64) -> Self {
        Interval {
            time: Instant::now(),
            milli,
        }
    }

    pub fn check_at(&mut self, now: Instant) -> bool {
        let next = self.time + Duration::from_millis(self.milli);
        if now >= next {
            self.time = now;
            true
        } else {
            false
        }
    }
}



#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Traffic {
    packets: i64,
    bytes: i64,
}

impl Traffic {
    pub fn new(packets: i64, bytes: i64) -> Self {
        Self { packets, bytes }
    }

    pub fn inc_traffic(&mut self, bytes: i64) {
        self.packets += 1;
        self.bytes += bytes ;
    }

    pub fn packets(&self) -> i64 {
        self.packets
    }

    pub fn bytes(&self) -> i64 {
        self.bytes
    }
}


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficRate{
    pub qps: i64,
    pub bitrate: i64,
}

/// Emits a rate once per period, computed over the traffic seen since the
/// previous emit.
#[derive(Debug)]
pub struct RateEstimator {
    interval: Interval,
    last_time: Instant,
    last: Traffic,
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl RateEstimator {
    pub fn new(milli: u64) -> Self {
        Self {
            interval: Interval::new(milli),
            last_time: Instant::now(),
            last: Traffic::default(),
        }
    }

    pub fn estimate(&mut self, now: Instant, traffic: &Traffic) -> Option<TrafficRate> {
        if !self.interval.check_at(now) {
            return None
        }

        let elapsed = now.saturating_duration_since(self.last_time).as_millis() as i64;
        let delta = Traffic::new(traffic.packets - self.last.packets, traffic.bytes - self.last.bytes);
        self.last_time = now;
        self.last = *traffic;

        if elapsed <= 0 {
            return None
        }

        Some(TrafficRate {
            qps: delta.packets * 1000 / elapsed,
            bitrate: delta.bytes * 8 * 1000 / elapsed,
        })
    }
}


/// round-trip latency summary
#[derive(Debug, Default, Clone, Copy)]
pub struct LatencyStats {
    count: u64,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
}

impl LatencyStats {
    pub fn record(&mut self, d: Duration) {
        self.count += 1;
        self.total += d;
        self.min = Some(self.min.map_or(d, |m| m.min(d)));
        self.max = self.max.max(d);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> Option<Duration> {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn average(&self) -> Option<Duration> {
        if self.count == 0 {
            return None
        }
        let nanos = self.total.as_nanos() / self.count as u128;
        Some(Duration::from_nanos(nanos as u64))
    }
}

impl std::fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.average()) {
            (Some(min), Some(avg)) => write!(f, "rtt samples {}, min {:?}, avg {:?}, max {:?}",
                self.count.to_human(), min, avg, self.max),
            _ => f.write_str("rtt no samples"),
        }
    }
}



pub trait ToHuman {
    type Output<'a>  where Self: 'a;
    fn to_human<'a>(&'a self) -> Self::Output<'a>;
}

impl ToHuman for TrafficRate {
    type Output<'a> = TrafficRateHuman<'a> where Self: 'a;

    fn to_human<'a>(&'a self) -> Self::Output<'a> {
        TrafficRateHuman(self)
    }
}

pub struct TrafficRateHuman<'a >(&'a TrafficRate);
impl<'a> std::fmt::Display for TrafficRateHuman<'a > {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} q/s, {}", self.0.qps.to_human(), BitrateHuman(&self.0.bitrate)))
    }
}

pub struct BitrateHuman<'a>(&'a i64);
impl<'a> BitrateHuman<'a> {
    fn fmt_me(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self.0 < 1_000 {
            f.write_fmt(format_args!("{} b/s", self.0))?;
        } else if *self.0 < 1_000_000 {
            f.write_fmt(format_args!("{}.{:02} Kb/s", self.0/1_000, self.0%1_000/1_0))?;
        } else if *self.0 < 1_000_000_000 {
            f.write_fmt(format_args!("{}.{:02} Mb/s", self.0/1_000_000, self.0%1_000_000/1_000_0))?;
        } else {
            f.write_fmt(format_args!("{}.{:02} Gb/s", self.0/1_000_000_000, self.0%1_000_000_000/1_000_000_0))?;
        }
        Ok(())
    }
}

impl<'a> std::fmt::Display for BitrateHuman<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_me(f)
    }
}


impl ToHuman for i64 {
    type Output<'a> = I64Human where Self: 'a;

    fn to_human<'a>(&'a self) -> Self::Output<'a> {
        I64Human(*self)
    }
}

impl ToHuman for u64 {
    type Output<'a> = I64Human where Self: 'a;

    fn to_human<'a>(&'a self) -> Self::Output<'a> {
        I64Human(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

pub struct I64Human(i64);
impl std::fmt::Display for I64Human {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.sign_plus() && self.0 >= 0{
            f.write_char('+')?;
        }
        f.write_str(&self.0.to_formatted_string(&Locale::en))
    }
}
