//! # CLI Command Implementations
//!
//! Each subcommand of the `sitecheck` tool lives in its own file with:
//! - an `Args` struct derived with `clap`, and
//! - an `execute` function that calls into the `sitecheck` library and
//!   returns the process exit code.
//!
//! Commands wrapping an external tool pass its exit code through unchanged.

pub mod build;
pub mod clone;
pub mod compare;
pub mod image;
pub mod make;
pub mod remote;
pub mod serve;
pub mod serve_static;

use std::io::Write;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use sitecheck::process::ProcessOutput;

/// Exit code mirroring a finished external process.
///
/// A process killed by a signal maps to failure.
pub fn exit_code(output: &ProcessOutput) -> ExitCode {
    match output.code {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}

/// Echo captured streams to our own stdout/stderr.
pub fn echo(output: &ProcessOutput) {
    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    let _ = std::io::stdout().flush();
}

/// A channel that receives one message when Ctrl-C is pressed.
pub fn ctrl_c_channel() -> anyhow::Result<mpsc::Receiver<()>> {
    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx.send(());
                }
            });
        })?;
    Ok(rx)
}
