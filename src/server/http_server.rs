use super::service::AppService;
use crate::dispatcher::Dispatcher;
use may::coroutine::JoinHandle;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long [`ServerHandle::wait_ready`] polls before giving up.
pub const READY_TIMEOUT: Duration = Duration::from_millis(250);

/// A dispatcher being served on a socket.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

/// Bind `addr` and serve `dispatcher` on it.
///
/// Every connection coroutine gets its own [`AppService`] clone; all of them
/// share the dispatcher's route table, so routes registered after this call
/// are visible to new requests immediately.
///
/// # Errors
///
/// Returns an error if the address does not resolve or cannot be bound.
pub fn serve<A: ToSocketAddrs>(dispatcher: Dispatcher, addr: A) -> io::Result<ServerHandle> {
    let addr = addr
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "address did not resolve"))?;
    let routes = dispatcher.table().len();
    let handle = may_minihttp::HttpServer(AppService::new(dispatcher)).start(addr)?;
    info!(address = %addr, routes, "HTTP server started");
    Ok(ServerHandle { addr, handle })
}

impl ServerHandle {
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the listener accepts connections, up to [`READY_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if nothing accepts in time.
    pub fn wait_ready(&self) -> io::Result<()> {
        self.wait_ready_for(READY_TIMEOUT)
    }

    /// [`wait_ready`](Self::wait_ready) with a caller-chosen limit.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if nothing accepts within `limit`.
    pub fn wait_ready_for(&self, limit: Duration) -> io::Result<()> {
        let deadline = Instant::now() + limit;
        loop {
            if TcpStream::connect(self.addr).is_ok() {
                debug!(address = %self.addr, "HTTP server accepting connections");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{} not accepting connections after {:?}", self.addr, limit),
                ));
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Cancel the accept loop and wait for it to exit.
    pub fn stop(self) {
        // SAFETY: the handle is owned here, so the accept coroutine has not
        // been joined yet; cancellation unwinds it at its next yield point.
        unsafe {
            self.handle.coroutine().cancel();
        }
        match self.handle.join() {
            Ok(()) => info!(address = %self.addr, "HTTP server stopped"),
            // A cancelled coroutine reports its unwind as a panic payload.
            Err(_) => debug!(address = %self.addr, "HTTP server accept loop cancelled"),
        }
    }

    /// Block until the accept loop exits on its own.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the accept coroutine panicked.
    pub fn join(self) -> thread::Result<()> {
        let addr = self.addr;
        let result = self.handle.join();
        if result.is_err() {
            warn!(address = %addr, "HTTP server accept loop panicked");
        }
        result
    }
}
