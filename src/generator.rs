//! # Static-Site Generator Wrappers
//!
//! Helpers for driving the external site generator (Jekyll by default):
//!
//! - [`PreviewServer`] supervises `<generator> serve --host H --port P
//!   [--source S]` as a [`ManagedProcess`].
//! - [`run_build`] runs `<generator> build --source DIR [--destination DIR]`
//!   once and returns its [`ProcessOutput`].
//!
//! The generator binary is configurable so tests can substitute a stand-in
//! script.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::defaults::{DEFAULT_GENERATOR, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::Result;
use crate::process::{self, CapturedOutput, ManagedProcess, ProcessOutput, ProcessSpec};

/// The generator executable to invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    program: OsString,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATOR)
    }
}

impl Generator {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// `serve --host H --port P [--source S]`, run from `cwd`.
    pub fn serve_spec(&self, cwd: &Path, host: &str, port: u16, source: Option<&Path>) -> ProcessSpec {
        let mut spec = ProcessSpec::new(self.program.clone())
            .args(["serve", "--host", host, "--port"])
            .arg(port.to_string())
            .cwd(cwd);
        if let Some(source) = source {
            spec = spec.arg("--source").arg(source);
        }
        spec
    }

    /// `build --source DIR [--destination DIR]`, run from the source directory.
    pub fn build_spec(&self, site_dir: &Path, destination: Option<&Path>) -> ProcessSpec {
        let mut spec = ProcessSpec::new(self.program.clone())
            .arg("build")
            .arg("--source")
            .arg(site_dir)
            .cwd(site_dir);
        if let Some(destination) = destination {
            spec = spec.arg("--destination").arg(destination);
        }
        spec
    }

    /// Run a one-shot build. See [`run_build`].
    pub fn build(&self, site_dir: &Path, destination: Option<&Path>) -> Result<ProcessOutput> {
        process::run_to_completion(&mut self.build_spec(site_dir, destination).command())
    }
}

/// Run `jekyll build` for `site_dir`, optionally into `destination`.
///
/// Blocks until the generator exits; a failed build comes back as a
/// non-zero [`ProcessOutput::code`], not as an error.
pub fn run_build(site_dir: &Path, destination: Option<&Path>) -> Result<ProcessOutput> {
    Generator::default().build(site_dir, destination)
}

/// Builder for a [`PreviewServer`].
#[derive(Debug, Clone)]
pub struct PreviewServerBuilder {
    generator: Generator,
    cwd: PathBuf,
    host: String,
    port: u16,
    source: Option<PathBuf>,
}

impl PreviewServerBuilder {
    pub fn generator(mut self, generator: Generator) -> Self {
        self.generator = generator;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn build(self) -> PreviewServer {
        let spec = self
            .generator
            .serve_spec(&self.cwd, &self.host, self.port, self.source.as_deref());
        PreviewServer {
            host: self.host,
            port: self.port,
            source: self.source,
            process: ManagedProcess::new("Preview server", spec),
        }
    }
}

/// A generator preview server (`jekyll serve`) with start/stop lifecycle.
pub struct PreviewServer {
    host: String,
    port: u16,
    source: Option<PathBuf>,
    process: ManagedProcess,
}

impl PreviewServer {
    /// Start configuring a server that runs from `cwd`, bound to
    /// `127.0.0.1:4000` unless overridden.
    pub fn builder(cwd: impl Into<PathBuf>) -> PreviewServerBuilder {
        PreviewServerBuilder {
            generator: Generator::default(),
            cwd: cwd.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            source: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// `http://host:port/`
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }

    pub fn spec(&self) -> &ProcessSpec {
        self.process.spec()
    }

    pub fn is_running(&self) -> bool {
        self.process.is_running()
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.pid()
    }

    /// Spawn the generator; a second call while running only warns.
    pub fn start(&mut self) -> Result<()> {
        let was_running = self.process.is_running();
        self.process.start()?;
        if !was_running {
            log::info!(
                "Preview server started on {}:{} with source={}.",
                self.host,
                self.port,
                self.source
                    .as_deref()
                    .map(|s| s.display().to_string())
                    .unwrap_or_else(|| "None".to_string())
            );
        }
        Ok(())
    }

    /// Terminate gracefully, killing after the stop timeout. No-op when idle.
    pub fn stop(&mut self) {
        self.process.stop();
    }

    /// Block until the generator exits by itself.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>> {
        self.process.wait()
    }

    /// Non-blocking exit check.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        self.process.try_wait()
    }

    /// What the generator has printed so far.
    pub fn captured_output(&self) -> CapturedOutput {
        self.process.captured_output()
    }

    /// What the generator has printed since the previous call.
    pub fn take_new_output(&self) -> CapturedOutput {
        self.process.take_new_output()
    }
}
