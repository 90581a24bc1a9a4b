
use std::io::Write;
use tokio::runtime;
use tracing::debug;
use crate::{Result, config::{ClientConfig, ServerConfig}};

use super::{Client, Server};


/// Resolves on Ctrl-C. A failing handler never resolves, so the loop keeps
/// running as if no handler had been installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!("ctrl-c handler error [{:?}]", e);
        std::future::pending::<()>().await;
    }
}

fn build_runtime() -> Result<runtime::Runtime> {
    Ok(runtime::Builder::new_current_thread()
    .enable_all()
    .build()?)
}

/// single-threaded runtime, the loop is the only task
pub fn run_tokio_server<W: Write>(config: ServerConfig, out: &mut W) -> Result<u64> {
    let rt = build_runtime()?;
    rt.block_on(async {
        let server = Server::bind(config).await?;
        let mut session = server.accept().await?;
        session.serve_until(out, ctrl_c()).await
    })
}

pub fn run_tokio_client<W: Write>(config: ClientConfig, out: &mut W) -> Result<u64> {
    let rt = build_runtime()?;
    rt.block_on(async {
        let mut client = Client::connect(config).await?;
        client.run_until(out, ctrl_c()).await
    })
}
