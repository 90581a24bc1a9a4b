
use anyhow::{Result, anyhow, bail};

pub mod log;
pub mod traffic;
pub mod shutdown;


/// normalize addresss as ip:port
pub fn normalize_addr(addr: &mut String, default_host: &str, default_port: &str) -> Result<()> {
    let mut parts = addr.split(':');
    let ip = parts.next().ok_or_else(||anyhow!("empty"))?;
    let r = parts.next();
    match r {
        Some(port) => {
            if parts.next().is_some() {
                bail!("too many \":\" in addrs")
            }

            if ip.is_empty() {
                if port.is_empty() {
                    // addr = ":"
                    *addr = format!("{}:{}", default_host, default_port);
                } else {
                    // addr = ":12345"
                    *addr = format!("{}:{}", default_host, port);
                }
            } else if port.is_empty() {
                // addr = "127.0.0.1:"
                *addr = format!("{}:{}", ip, default_port);
            }
        },
        None => {
            if ip.is_empty() {
                *addr = format!("{}:{}", default_host, default_port);
            } else {
                // addr = "127.0.0.1"
                addr.push(':');
                addr.push_str(default_port);
            }
        }
    }
    Ok(())
}
