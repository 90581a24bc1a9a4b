/*
    one client, one server, one connection:
        loopbench server [--bind 127.0.0.1:12345]
        loopbench client [-c 127.0.0.1:12345]
    both loops run until killed (Ctrl-C) unless -n is given
*/

use std::io::Write;
use anyhow::{Result, Context};
use args::{Args, Commands, RuntimeType};
use clap::Parser;
use loop_bench::{
    config::{ClientConfig, ServerConfig},
    impl_async, impl_std,
    util::log,
};
use tracing::{info, error};

mod args;


fn main() -> Result<()> {
    let args = Args::parse();
    log::init()?;

    info!("num_cpus: {}", num_cpus::get());

    let r = run_me(args);
    match r {
        Ok(n) => {
            info!("done after [{}] round-trips", n);
            Ok(())
        },
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1);
        },
    }
}

fn run_me(args: Args) -> Result<u64> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Client(mut client_args) => {
            client_args.normalize()?;
            let config = client_args.config();
            match client_args.runtime {
                RuntimeType::Std => run_std_client(config, &mut out),
                RuntimeType::Tokio => Ok(impl_async::run_tokio_client(config, &mut out)?),
            }
        }
        Commands::Server(mut server_args) => {
            server_args.normalize()?;
            let config = server_args.config();
            match server_args.runtime {
                RuntimeType::Std => run_std_server(config, &mut out),
                RuntimeType::Tokio => Ok(impl_async::run_tokio_server(config, &mut out)?),
            }
        },
    }
}

fn run_std_server<W: Write>(config: ServerConfig, out: &mut W) -> Result<u64> {
    let server = impl_std::Server::bind(config)?;
    let mut session = server.accept().with_context(||"fail to accept")?;
    session.stop_signal().watch_ctrl_c()?;
    Ok(session.serve(out)?)
}

fn run_std_client<W: Write>(config: ClientConfig, out: &mut W) -> Result<u64> {
    let mut client = impl_std::Client::connect(config)?;
    client.stop_signal().watch_ctrl_c()?;
    Ok(client.run(out)?)
}
