
use clap::{Parser, Subcommand};
use anyhow::{Result, Context};
use loop_bench::{
    config::{ClientConfig, ServerConfig, DEFAULT_ADDR, DEFAULT_HOST, DEFAULT_PORT},
    message::{CLIENT_PAYLOAD, SERVER_PAYLOAD},
    packet::Framing,
    util::normalize_addr,
};

#[derive(Parser, Debug, Clone)]
#[clap(name = "loopbench", author, about = "tcp round-trip loop bench", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone)]
#[derive(Subcommand)]
pub enum Commands {
    Client(ClientArgs),
    Server(ServerArgs),
}

#[derive(Parser, Debug, Clone)]
#[clap(about = "run as client")]
pub struct ClientArgs {
    #[clap(short = 'c', long = "target", long_help = "target server address to connect, in the format of ip:port", default_value = DEFAULT_ADDR)]
    pub target: String,

    #[clap(long = "payload", long_help = "text after the \"<counter>:\" prefix", default_value = CLIENT_PAYLOAD)]
    pub payload: String,

    #[clap(short = 'n', long = "count", long_help = "stop after this many round-trips; default runs until killed")]
    pub count: Option<u64>,

    #[clap(long = "rt", long_help = "runtime", default_value = "std")]
    #[arg(value_enum)]
    pub runtime: RuntimeType,

    #[clap(long = "framing", long_help = "wire framing", default_value = "raw")]
    #[arg(value_enum)]
    pub framing: Framing,
}

impl ClientArgs {
    pub fn normalize(&mut self) -> Result<()> {
        normalize_addr(&mut self.target, DEFAULT_HOST, DEFAULT_PORT)
        .with_context(||"invalid target")?;
        Ok(())
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            target: self.target.clone(),
            framing: self.framing,
            payload: self.payload.clone(),
            iterations: self.count,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(about = "run as server")]
pub struct ServerArgs {
    #[clap(long = "bind", long_help = "bind to local address", default_value = DEFAULT_ADDR)]
    pub bind: String,

    #[clap(long = "reply", long_help = "text after the \"<counter>:\" prefix", default_value = SERVER_PAYLOAD)]
    pub reply: String,

    #[clap(short = 'n', long = "count", long_help = "stop after this many round-trips; default runs until killed")]
    pub count: Option<u64>,

    #[clap(long = "rt", long_help = "runtime", default_value = "std")]
    #[arg(value_enum)]
    pub runtime: RuntimeType,

    #[clap(long = "framing", long_help = "wire framing", default_value = "raw")]
    #[arg(value_enum)]
    pub framing: Framing,
}

impl ServerArgs {
    pub fn normalize(&mut self) -> Result<()>{
        normalize_addr(&mut self.bind, DEFAULT_HOST, DEFAULT_PORT)
        .with_context(||"invalid bind")?;
        Ok(())
    }

    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind.clone(),
            framing: self.framing,
            reply: self.reply.clone(),
            iterations: self.count,
        }
    }
}


#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum RuntimeType {
    Std,
    Tokio,
}


#[cfg(test)]
mod test {
    use clap::Parser;
    use super::*;

    #[test]
    fn defaults_share_addr() {
        let args = Args::parse_from(["loopbench", "server"]);
        let Commands::Server(server) = args.command else { panic!("not server") };
        let args = Args::parse_from(["loopbench", "client"]);
        let Commands::Client(client) = args.command else { panic!("not client") };
        assert_eq!(server.bind, client.target);
        assert_eq!(server.framing, Framing::Raw);
        assert_eq!(client.count, None);
    }

    #[test]
    fn client_flags() {
        let args = Args::parse_from(["loopbench", "client", "-c", ":7000", "-n", "3", "--rt", "tokio", "--framing", "length"]);
        let Commands::Client(mut client) = args.command else { panic!("not client") };
        client.normalize().unwrap();
        let config = client.config();
        assert_eq!(config.target, "127.0.0.1:7000");
        assert_eq!(config.iterations, Some(3));
        assert_eq!(config.framing, Framing::Length);
        assert!(matches!(client.runtime, RuntimeType::Tokio));
    }
}
