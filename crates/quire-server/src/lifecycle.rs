//! Server lifecycle.
//!
//! A [`Server`] owns the listener task and reacts to three sources:
//! - commands sent through a [`ServerHandle`] (start, shutdown, restart)
//! - errors reported by the listener task (e.g. the port is taken)
//! - the shutdown future passed to [`Server::run_until`] (Ctrl-C or
//!   SIGTERM for [`Server::run`])
//!
//! Shutting down only stops the listener; the loop keeps waiting for the
//! next command. The loop ends on a listener error, on a failed restart,
//! or when the shutdown future completes.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use quire_config::Config;
use quire_tree::{ContentService, FsContentService};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::app;
use crate::error::ServerError;
use crate::state::AppState;

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 8;

/// Command accepted by the server loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerCommand {
    /// Start listening (ignored with a warning when already running).
    Start,
    /// Stop listening.
    Shutdown,
    /// Stop listening, re-read the config file and listen again.
    Restart,
}

/// Cloneable sender for [`ServerCommand`]s.
#[derive(Clone, Debug)]
pub struct ServerHandle {
    commands: mpsc::Sender<ServerCommand>,
}

impl ServerHandle {
    /// Ask the server to start listening.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Stopped` if the server loop has ended.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.send(ServerCommand::Start).await
    }

    /// Ask the server to stop listening.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Stopped` if the server loop has ended.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        self.send(ServerCommand::Shutdown).await
    }

    /// Ask the server to restart with a freshly read config.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Stopped` if the server loop has ended.
    pub async fn restart(&self) -> Result<(), ServerError> {
        self.send(ServerCommand::Restart).await
    }

    async fn send(&self, command: ServerCommand) -> Result<(), ServerError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ServerError::Stopped)
    }
}

/// Listener task and the means to stop it.
struct Listener {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// HTTP server driven by [`ServerCommand`]s.
pub struct Server {
    config: Config,
    service: Arc<dyn ContentService>,
    commands: mpsc::Receiver<ServerCommand>,
    errors_tx: mpsc::UnboundedSender<ServerError>,
    errors: mpsc::UnboundedReceiver<ServerError>,
    listener: Option<Listener>,
}

impl Server {
    /// Create a server serving the content directories named in `config`.
    #[must_use]
    pub fn new(config: Config) -> (Self, ServerHandle) {
        let service = content_service(&config);
        Self::with_service(config, service)
    }

    /// Create a server around an existing content service.
    #[must_use]
    pub fn with_service(config: Config, service: Arc<dyn ContentService>) -> (Self, ServerHandle) {
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (errors_tx, errors) = mpsc::unbounded_channel();
        let server = Self {
            config,
            service,
            commands,
            errors_tx,
            errors,
            listener: None,
        };
        (
            server,
            ServerHandle {
                commands: commands_tx,
            },
        )
    }

    /// Run until Ctrl-C or SIGTERM.
    ///
    /// Nothing is served until a [`ServerCommand::Start`] arrives.
    ///
    /// # Errors
    ///
    /// Returns the first listener error or a config error from a restart.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError> {
        tokio::pin!(shutdown);
        let mut commands_open = true;

        let result = loop {
            tokio::select! {
                command = self.commands.recv(), if commands_open => match command {
                    Some(command) => {
                        if let Err(e) = self.handle(command).await {
                            break Err(e);
                        }
                    }
                    None => commands_open = false,
                },
                Some(e) = self.errors.recv() => break Err(e),
                () = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping server...");
                    break Ok(());
                }
            }
        };

        self.stop().await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "Server stopped with error");
        }
        tracing::debug!("Server loop ended");
        result
    }

    async fn handle(&mut self, command: ServerCommand) -> Result<(), ServerError> {
        tracing::debug!(command = ?command, "Server command");
        match command {
            ServerCommand::Start => {
                if self.listener.is_some() {
                    tracing::warn!("Start requested while the server is already running");
                } else {
                    self.spawn_listener();
                }
            }
            ServerCommand::Shutdown => {
                if self.listener.is_some() {
                    self.stop().await;
                } else {
                    tracing::warn!("Shutdown requested while the server is not running");
                }
            }
            ServerCommand::Restart => {
                self.stop().await;
                self.reload()?;
                self.spawn_listener();
            }
        }
        Ok(())
    }

    /// Re-read the config file, keeping the tree when the content
    /// directories did not change.
    fn reload(&mut self) -> Result<(), ServerError> {
        let config = Config::open(&self.config.config_path)?;
        if config.content != self.config.content {
            tracing::info!(
                source = %config.content.source_dir.display(),
                cache = %config.content.cache_dir.display(),
                "Content directories changed, starting with an empty tree"
            );
            self.service = content_service(&config);
        }
        self.config = config;
        Ok(())
    }

    fn spawn_listener(&mut self) {
        let running = self.config.running_config();
        let addr = running.bind_addr();
        let state = Arc::new(AppState {
            service: Arc::clone(&self.service),
            config: running,
        });
        let app = app::create_router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let errors = self.errors_tx.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = serve(&addr, app, shutdown_rx).await {
                // The loop may already be gone; nothing left to report to.
                let _ = errors.send(e);
            }
        });

        self.listener = Some(Listener {
            shutdown: shutdown_tx,
            task,
        });
    }

    async fn stop(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        let _ = listener.shutdown.send(());
        if let Err(e) = listener.task.await {
            tracing::error!(error = %e, "Server task panicked");
        }
        tracing::info!("Server stopped");
    }
}

fn content_service(config: &Config) -> Arc<dyn ContentService> {
    Arc::new(FsContentService::new(
        &config.content.source_dir,
        &config.content.cache_dir,
    ))
}

/// Bind and serve until `shutdown` fires.
async fn serve(addr: &str, app: Router, shutdown: oneshot::Receiver<()>) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = shutdown.await;
    })
    .await?;

    Ok(())
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
