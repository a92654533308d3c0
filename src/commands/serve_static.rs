//! # Serve-Static Command Implementation
//!
//! Serves a built site directory over HTTP until Ctrl-C is pressed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use sitecheck::static_server::StaticServer;

use crate::cli::Context;
use crate::commands::ctrl_c_channel;

/// Serve a built site directory over HTTP
#[derive(Args, Debug)]
pub struct ServeStaticArgs {
    /// Directory to serve (e.g. `_site`)
    pub dir: PathBuf,

    /// Host to bind (defaults to the configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind; 0 picks a free port
    #[arg(short, long, default_value_t = 0)]
    pub port: u16,
}

/// Execute the `serve-static` command.
pub fn execute(args: ServeStaticArgs, ctx: &Context) -> Result<ExitCode> {
    if !args.dir.is_dir() {
        anyhow::bail!("Directory not found: {}", args.dir.display());
    }

    let interrupted = ctrl_c_channel()?;
    let mut server = StaticServer::new(&args.dir)
        .with_host(args.host.unwrap_or_else(|| ctx.config.generator.host.clone()))
        .with_port(args.port);
    server.start()?;
    println!(
        "Serving {} at {} (Ctrl-C to stop)",
        args.dir.display(),
        server.base_url()?
    );

    // A disconnected channel means the signal listener is gone; stop either way.
    let _ = interrupted.recv();
    server.stop();
    Ok(ExitCode::SUCCESS)
}
