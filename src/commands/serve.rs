//! # Serve Command Implementation
//!
//! Runs the generator preview server in the foreground, relaying its output
//! until it exits or Ctrl-C is pressed. On Ctrl-C the server is stopped
//! gracefully (killed after the stop timeout).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use sitecheck::generator::{Generator, PreviewServer};
use sitecheck::process::CapturedOutput;
use sitecheck::suggestions;

use crate::cli::Context;
use crate::commands::ctrl_c_channel;

const RELAY_INTERVAL: Duration = Duration::from_millis(200);

/// Run the site generator preview server in the foreground
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind (defaults to the configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (defaults to the configured port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Site source directory passed as `--source`
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Working directory for the generator
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,
}

/// Execute the `serve` command.
pub fn execute(args: ServeArgs, ctx: &Context) -> Result<ExitCode> {
    let settings = &ctx.config.generator;
    let mut builder = PreviewServer::builder(&args.cwd)
        .generator(Generator::new(&settings.program))
        .host(args.host.unwrap_or_else(|| settings.host.clone()))
        .port(args.port.unwrap_or(settings.port));
    if let Some(source) = args.source {
        builder = builder.source(source);
    }
    let mut server = builder.build();

    let interrupted = ctrl_c_channel()?;
    server.start().map_err(suggestions::explain)?;
    println!("Serving at {} (Ctrl-C to stop)", server.url());

    loop {
        match interrupted.recv_timeout(RELAY_INTERVAL) {
            Ok(()) => {
                log::info!("Interrupted, stopping preview server.");
                server.stop();
                relay(server.take_new_output());
                return Ok(ExitCode::SUCCESS);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => thread::sleep(RELAY_INTERVAL),
        }

        let exited = server.try_wait()?;
        relay(server.take_new_output());
        if let Some(status) = exited {
            log::warn!("Preview server exited on its own ({}).", status);
            return Ok(match status.code() {
                Some(0) => ExitCode::SUCCESS,
                Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
                None => ExitCode::FAILURE,
            });
        }
    }
}

/// Print output captured since the previous relay.
fn relay(new: CapturedOutput) {
    print!("{}", new.stdout);
    eprint!("{}", new.stderr);
}
