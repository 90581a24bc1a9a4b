
use std::{net::{TcpStream, Shutdown}, sync::{Arc, atomic::{AtomicBool, Ordering}}};
use anyhow::{Result, Context};
use parking_lot::Mutex;
use tracing::{info, debug};


/// Ends a blocking loop from outside: marks the stop as requested and shuts
/// the armed socket down so a pending read or write returns.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    requested: AtomicBool,
    socket: Mutex<Option<TcpStream>>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, socket: &TcpStream) -> std::io::Result<()> {
        let socket = socket.try_clone()?;
        *self.shared.socket.lock() = Some(socket);
        Ok(())
    }

    /// drops the kept clone so the socket closes with its owner
    pub fn disarm(&self) {
        self.shared.socket.lock().take();
    }

    pub fn trigger(&self) {
        self.shared.requested.store(true, Ordering::Release);
        if let Some(socket) = self.shared.socket.lock().take() {
            if let Err(e) = socket.shutdown(Shutdown::Both) {
                debug!("shutdown socket error [{:?}]", e);
            }
        }
    }

    pub fn is_requested(&self) -> bool {
        self.shared.requested.load(Ordering::Acquire)
    }

    /// Replaces the default SIGINT disposition: from now on Ctrl-C triggers
    /// this signal instead of killing the process.
    pub fn watch_ctrl_c(&self) -> Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

        let this = self.clone();
        std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            match rt.block_on(tokio::signal::ctrl_c()) {
                Ok(_r) => info!("got ctrl-c, stopping"),
                Err(e) => {
                    debug!("ctrl-c handler error [{:?}]", e);
                    return
                },
            }
            this.trigger();
        })
        .with_context(||"fail to spawn ctrl-c watcher")?;
        Ok(())
    }
}
