//! HTTP server hosting a [`Router`].

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::signal;
use log::{debug, info, warn, error};

use crate::parser::{parse_request, HttpVersion};
use crate::router::Router;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// An HTTP server dispatching every request through a shared router.
///
/// The router is fully registered before it is handed over and is only read
/// afterwards.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The router requests are dispatched to.
    pub router: Arc<Router>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and router.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// Log the registered routes.
    fn display_server_info(&self) {
        info!("Registered routes:");
        for route in self.router.routes() {
            let method = route.method.map_or_else(|| "*".to_string(), |m| m.to_string());
            info!("  {:?} {method} {} -> {}", route.phase, route.pattern, route.handler);
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: Arc<mpsc::Sender<()>>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Handle a new connection.
    fn handle_new_connection(
        &self,
        mut socket: tokio::net::TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        tasks: &mut JoinSet<()>,
    ) {
        let permit = match semaphore.try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_header("Server", self.config.server_name.clone())
                    .with_body_string("Server is at capacity, please try again later");
                tasks.spawn(async move {
                    let _ = socket.write_all(&response.to_bytes(HttpVersion::Http11)).await;
                });
                return;
            }
        };

        let router = self.router.clone();
        let config = self.config.clone();

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;

            if let Err(e) = Self::handle_connection(&mut socket, &router, &config).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        }).await;

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections.
    pub async fn start(&self) -> Result<(), Error> {
        self.config.validate()?;
        self.display_server_info();

        let listener = self.setup_listener().await?;
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let shutdown_tx = Arc::new(shutdown_tx);

        let mut tasks = JoinSet::new();
        Self::setup_ctrl_c_handler(shutdown_tx, &mut tasks);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            self.handle_new_connection(socket, addr, semaphore.clone(), &mut tasks);
                        },
                        Err(e) => {
                            if Self::handle_connection_error(e).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Read one request from `socket`, dispatch it and write the response.
    ///
    /// Parse failures are answered with 400 and router failures with the
    /// error's status; both are also returned to the caller.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: &Router,
        config: &ServerConfig,
    ) -> Result<(), Error> {
        let mut buf = vec![0; config.read_buffer_size];

        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(()); // Connection closed
        }

        let request = match parse_request(&buf[..n]) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::new(StatusCode::BadRequest)
                    .with_content_type("text/plain")
                    .with_header("Server", config.server_name.clone())
                    .with_body_string(format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes(HttpVersion::Http11)).await?;
                return Err(Error::ParseError(e));
            }
        };

        let mut response = HttpResponse::new(StatusCode::Ok);
        let outcome = router.run(&request, &mut response);

        let response = match outcome {
            Ok(handled) => {
                debug!("{} {} -> {} (route matched: {handled})", request.method, request.target, response.status);
                response
            }
            Err(e) => {
                warn!("{} {} failed: {e}", request.method, request.target);
                let response = HttpResponse::new(e.status())
                    .with_content_type("text/plain")
                    .with_header("Server", config.server_name.clone())
                    .with_body_string(e.to_string());
                socket.write_all(&response.to_bytes(request.version)).await?;
                return Err(e.into());
            }
        };

        let response = response.with_header("Server", config.server_name.clone());
        socket.write_all(&response.to_bytes(request.version)).await?;
        Ok(())
    }
}
