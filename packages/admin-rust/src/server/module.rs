//! Test server lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. Binding
//! before serving lets callers learn the OS-assigned port first.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use super::config::TestServerConfig;
use super::handlers::{
    add_teacher_handler, delete_teacher_handler, edit_teacher_handler, list_teachers_handler,
    AppState,
};
use super::middleware::build_http_layers;
use super::store::RosterStore;

/// Owns the roster store and the listener of one test server instance.
pub struct TestServerModule {
    config: TestServerConfig,
    listener: Option<TcpListener>,
    store: Arc<RosterStore>,
}

impl TestServerModule {
    /// Creates a module without binding any port.
    #[must_use]
    pub fn new(config: TestServerConfig, store: Arc<RosterStore>) -> Self {
        Self {
            config,
            listener: None,
            store,
        }
    }

    /// Returns a shared reference to the roster store.
    #[must_use]
    pub fn store(&self) -> Arc<RosterStore> {
        Arc::clone(&self.store)
    }

    /// Assembles the router with all roster routes and middleware.
    ///
    /// Routes:
    /// - `GET /teacher/getTeachers`
    /// - `POST /teacher/addTeacher`
    /// - `POST /teacher/editTeacher`
    /// - `DELETE /teacher/deleteTeacher/{teacher_id}`
    pub fn build_router(&self) -> Router {
        let state = AppState {
            store: Arc::clone(&self.store),
        };

        Router::new()
            .route("/teacher/getTeachers", get(list_teachers_handler))
            .route("/teacher/addTeacher", post(add_teacher_handler))
            .route("/teacher/editTeacher", post(edit_teacher_handler))
            .route(
                "/teacher/deleteTeacher/{teacher_id}",
                delete(delete_teacher_handler),
            )
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the TCP listener and returns the bound address, which carries
    /// the OS-assigned port when the configured port is 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?;

        info!("roster test server bound to {local}");

        self.listener = Some(listener);
        Ok(local)
    }

    /// Serves requests until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits a
    /// fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;

        info!("serving roster API");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("roster test server stopped");
        Ok(())
    }
}

/// A test server running on a background task.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub store: Arc<RosterStore>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl RunningServer {
    /// API root for clients, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Signals shutdown and waits for the server task to finish.
    ///
    /// # Errors
    ///
    /// Returns the server's own error, or an error if the task panicked.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await?
    }
}

/// Binds `config` and serves `store` on a spawned task.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn(config: TestServerConfig, store: Arc<RosterStore>) -> anyhow::Result<RunningServer> {
    let mut module = TestServerModule::new(config, Arc::clone(&store));
    let addr = module.start().await?;
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(module.serve(async move {
        let _ = rx.await;
    }));

    Ok(RunningServer {
        addr,
        store,
        shutdown: Some(tx),
        handle,
    })
}
