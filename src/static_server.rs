//! # Static File Server
//!
//! Serves a pre-built site directory over HTTP so page content can be
//! checked with a plain HTTP client. Directory requests are answered with
//! their `index.html`.
//!
//! The public API is blocking. Internally the server runs on a
//! single-threaded Tokio runtime on its own thread and shuts down
//! gracefully when [`StaticServer::stop`] is called.

use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use axum::Router;
use log::{error, info, warn};
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use url::Url;

use crate::defaults::DEFAULT_HOST;
use crate::error::{Error, Result};

struct Running {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    thread: JoinHandle<()>,
}

/// An HTTP server for one directory tree.
pub struct StaticServer {
    root: PathBuf,
    host: String,
    port: u16,
    running: Option<Running>,
}

impl StaticServer {
    /// A server for `root` on `127.0.0.1` with an OS-assigned port.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            host: DEFAULT_HOST.to_string(),
            port: 0,
            running: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Port to bind; `0` lets the OS choose.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The bound port while running, otherwise the configured one.
    pub fn port(&self) -> u16 {
        self.running
            .as_ref()
            .map(|r| r.addr.port())
            .unwrap_or(self.port)
    }

    /// `http://host:port/` of the bound socket (or of the configured address
    /// when idle).
    pub fn base_url(&self) -> Result<Url> {
        let authority = match &self.running {
            Some(running) => running.addr.to_string(),
            None => format!("{}:{}", self.host, self.port),
        };
        Ok(Url::parse(&format!("http://{}/", authority))?)
    }

    /// Bind and start serving. A second call while running only warns.
    pub fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            warn!(
                "Static server for {} is already running. Use `stop()` first.",
                self.root.display()
            );
            return Ok(());
        }

        let listener = TcpListener::bind((self.host.as_str(), self.port)).map_err(|e| {
            Error::StaticServer {
                message: format!("cannot bind {}:{}: {}", self.host, self.port, e),
            }
        })?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::StaticServer {
                message: format!("cannot build runtime: {}", e),
            })?;

        let app = Router::new().fallback_service(ServeDir::new(&self.root));
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let thread = thread::Builder::new()
            .name("static-server".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = match tokio::net::TcpListener::from_std(listener) {
                        Ok(l) => l,
                        Err(e) => {
                            error!("Failed to adopt listener on {}: {}", addr, e);
                            return;
                        }
                    };
                    let server = axum::serve(listener, app).with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    });
                    if let Err(e) = server.await {
                        error!("Static server error: {}", e);
                    }
                });
            })?;

        info!("Serving {} at http://{}/", self.root.display(), addr);
        self.running = Some(Running {
            addr,
            shutdown,
            thread,
        });
        Ok(())
    }

    /// Stop serving and release the port. No-op when idle.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let _ = running.shutdown.send(());
        if running.thread.join().is_err() {
            error!("Static server thread panicked");
        }
        info!("Static server on {} stopped.", running.addr);
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "<h1>My Blog</h1>").unwrap();
        fs::create_dir_all(temp.path().join("about")).unwrap();
        fs::write(temp.path().join("about/index.html"), "<p>About me</p>").unwrap();
        fs::create_dir_all(temp.path().join("assets/css")).unwrap();
        fs::write(temp.path().join("assets/css/main.css"), "body { margin: 0 }").unwrap();
        temp
    }

    #[test]
    fn test_root_page_returns_200() {
        let site = site();
        let mut server = StaticServer::new(site.path());
        server.start().unwrap();
        assert!(server.is_running());
        assert_ne!(server.port(), 0);

        let response = reqwest::blocking::get(server.base_url().unwrap()).unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.text().unwrap().contains("My Blog"));

        server.stop();
        assert!(!server.is_running());
    }

    #[test]
    fn test_nested_pages_and_assets() {
        let site = site();
        let mut server = StaticServer::new(site.path());
        server.start().unwrap();
        let base = server.base_url().unwrap();

        let about = reqwest::blocking::get(base.join("about/").unwrap()).unwrap();
        assert_eq!(about.status(), 200);
        assert!(about.text().unwrap().contains("About me"));

        let css = reqwest::blocking::get(base.join("assets/css/main.css").unwrap()).unwrap();
        assert_eq!(css.status(), 200);
        assert_eq!(css.text().unwrap(), "body { margin: 0 }");

        let missing = reqwest::blocking::get(base.join("nope.html").unwrap()).unwrap();
        assert_eq!(missing.status(), 404);
    }

    #[test]
    fn test_stop_releases_port() {
        let site = site();
        let mut server = StaticServer::new(site.path());
        server.start().unwrap();
        let url = server.base_url().unwrap();
        server.stop();

        assert!(reqwest::blocking::get(url).is_err());
    }

    #[test]
    fn test_start_twice_warns_and_keeps_address() {
        testing_logger::setup();
        let site = site();
        let mut server = StaticServer::new(site.path());
        server.start().unwrap();
        let port = server.port();

        server.start().unwrap();
        assert_eq!(server.port(), port);
        testing_logger::validate(|captured_logs| {
            assert!(captured_logs
                .iter()
                .any(|l| l.level == log::Level::Warn && l.body.contains("already running")));
        });
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut server = StaticServer::new("/nonexistent");
        server.stop();
        assert!(!server.is_running());
        assert_eq!(server.base_url().unwrap().as_str(), "http://127.0.0.1:0/");
    }

    #[test]
    fn test_bind_conflict_is_reported() {
        let site = site();
        let mut first = StaticServer::new(site.path());
        first.start().unwrap();

        let mut second = StaticServer::new(site.path()).with_port(first.port());
        let error = second.start().unwrap_err();
        assert!(matches!(error, Error::StaticServer { .. }));
        assert!(!second.is_running());
    }
}
