//! # Build-System Invocation
//!
//! A thin argument-list builder around `make`:
//!
//! ```text
//! make -f <MAKEFILE> [-n] <TARGET> [ARGS...]
//! ```
//!
//! The output is returned unparsed. [`parse_config_output`] is a separate
//! helper for targets such as `print-config` that print `Key: value` lines.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::defaults::DEFAULT_MAKE;
use crate::error::{Error, Result};
use crate::process::{self, ProcessOutput};

/// Walk upward from `start` to the first directory containing a `Makefile`.
pub fn find_makefile_dir(start: &Path) -> Result<PathBuf> {
    let mut current = start;
    loop {
        if current.join("Makefile").is_file() {
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(Error::MakefileNotFound {
                    start: start.to_path_buf(),
                })
            }
        }
    }
}

/// One `make` call. Build it up, then [`run`](MakeInvocation::run) it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeInvocation {
    program: OsString,
    target: String,
    dry_run: bool,
    extra_args: Vec<String>,
    cwd: Option<PathBuf>,
    makefile: Option<PathBuf>,
}

impl MakeInvocation {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_MAKE.into(),
            target: target.into(),
            dry_run: false,
            extra_args: Vec::new(),
            cwd: None,
            makefile: None,
        }
    }

    /// Use a different build-tool executable.
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Pass `-n`: print the recipe without running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Arguments placed after the target, e.g. `VAR=value`.
    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory; defaults to the current directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Explicit makefile; defaults to the nearest `Makefile` above the
    /// working directory.
    pub fn makefile(mut self, makefile: impl Into<PathBuf>) -> Self {
        self.makefile = Some(makefile.into());
        self
    }

    fn resolved_cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    fn resolved_makefile(&self) -> Result<PathBuf> {
        match &self.makefile {
            Some(makefile) => Ok(makefile.clone()),
            None => Ok(find_makefile_dir(&self.resolved_cwd()?)?.join("Makefile")),
        }
    }

    /// The argument list after the program name.
    pub fn args(&self) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["-f".into(), self.resolved_makefile()?.into()];
        if self.dry_run {
            args.push("-n".into());
        }
        args.push(self.target.clone().into());
        args.extend(self.extra_args.iter().map(OsString::from));
        Ok(args)
    }

    /// The full [`Command`], ready to run.
    pub fn command(&self) -> Result<Command> {
        let mut command = Command::new(&self.program);
        command.args(self.args()?).current_dir(self.resolved_cwd()?);
        Ok(command)
    }

    /// Run to completion and return the captured result.
    pub fn run(&self) -> Result<ProcessOutput> {
        process::run_to_completion(&mut self.command()?)
    }
}

/// Run a make target with the default program.
///
/// Equivalent to building a [`MakeInvocation`] with the given options.
pub fn run_make(
    target: &str,
    dry_run: bool,
    extra_args: &[String],
    cwd: Option<&Path>,
    makefile: Option<&Path>,
) -> Result<ProcessOutput> {
    let mut invocation = MakeInvocation::new(target)
        .dry_run(dry_run)
        .extra_args(extra_args.iter().cloned());
    if let Some(cwd) = cwd {
        invocation = invocation.cwd(cwd);
    }
    if let Some(makefile) = makefile {
        invocation = invocation.makefile(makefile);
    }
    invocation.run()
}

/// Collect `Key: value` lines into a map, splitting on the first colon.
///
/// Lines without a colon are skipped; keys and values are trimmed.
pub fn parse_config_output(stdout: &str) -> BTreeMap<String, String> {
    stdout
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_args_order_with_dry_run_and_extra_args() {
        let invocation = MakeInvocation::new("build")
            .makefile("/repo/Makefile")
            .dry_run(true)
            .extra_args(["--jobs", "4"]);
        assert_eq!(
            strings(invocation.args().unwrap()),
            ["-f", "/repo/Makefile", "-n", "build", "--jobs", "4"]
        );
    }

    #[test]
    fn test_args_without_dry_run() {
        let invocation = MakeInvocation::new("sync")
            .makefile("Makefile")
            .extra_args(["CURRENTDIR=/tmp/x".to_string()]);
        let args = strings(invocation.args().unwrap());
        assert!(!args.contains(&"-n".to_string()));
        assert_eq!(args, ["-f", "Makefile", "sync", "CURRENTDIR=/tmp/x"]);
    }

    #[test]
    fn test_command_uses_cwd_and_program() {
        let temp = TempDir::new().unwrap();
        let command = MakeInvocation::new("all")
            .program("gmake")
            .makefile("Makefile")
            .cwd(temp.path())
            .command()
            .unwrap();
        assert_eq!(command.get_program(), "gmake");
        assert_eq!(command.get_current_dir(), Some(temp.path()));
    }

    #[test]
    fn test_find_makefile_dir_walks_upward() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Makefile"), "all:\n").unwrap();
        let nested = temp.path().join("tests/unit/deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_makefile_dir(&nested).unwrap(), temp.path());
        assert_eq!(find_makefile_dir(temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn test_default_makefile_resolved_from_cwd() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Makefile"), "all:\n").unwrap();
        let nested = temp.path().join("sub");
        fs::create_dir_all(&nested).unwrap();

        let args = MakeInvocation::new("all").cwd(&nested).args().unwrap();
        assert_eq!(args[1], temp.path().join("Makefile").into_os_string());
    }

    #[test]
    fn test_parse_config_output() {
        let stdout = "\
Current Directory: /home/me/blog
GitHub User: me
Docker Jupyter Image: ghcr.io/me/blog:main_jupyter
a line without a separator
URL: https://github.com/me/blog
";
        let config = parse_config_output(stdout);
        assert_eq!(config.len(), 4);
        assert_eq!(config["Current Directory"], "/home/me/blog");
        assert_eq!(config["GitHub User"], "me");
        assert_eq!(config["Docker Jupyter Image"], "ghcr.io/me/blog:main_jupyter");
        // Only the first colon splits.
        assert_eq!(config["URL"], "https://github.com/me/blog");
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// A stand-in build tool that echoes its arguments and exits with the
        /// code given in `EXIT=`.
        fn fake_make(dir: &Path) -> PathBuf {
            let path = dir.join("fake-make");
            fs::write(
                &path,
                "#!/bin/sh\necho \"argv: $*\"\nfor a in \"$@\"; do case \"$a\" in EXIT=*) exit \"${a#EXIT=}\" ;; esac; done\n",
            )
            .unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_run_passes_arguments_and_exit_code() {
            let temp = TempDir::new().unwrap();
            let output = MakeInvocation::new("build")
                .program(fake_make(temp.path()))
                .makefile("/x/Makefile")
                .dry_run(true)
                .extra_args(["EXIT=2"])
                .cwd(temp.path())
                .run()
                .unwrap();
            assert_eq!(output.code, Some(2));
            assert_eq!(output.stdout, "argv: -f /x/Makefile -n build EXIT=2\n");
        }

        fn make_available() -> bool {
            Command::new("make").arg("--version").output().is_ok()
        }

        #[test]
        fn test_real_make_dry_run_and_missing_target() {
            if !make_available() {
                eprintln!("make not found, skipping");
                return;
            }
            let temp = TempDir::new().unwrap();
            fs::write(
                temp.path().join("Makefile"),
                "check-docker:\n\tdocker --version\n\nprint-config:\n\t@echo \"Git Branch: $(BRANCH)\"\n",
            )
            .unwrap();
            let cwd = temp.path();

            let output = run_make("check-docker", true, &[], Some(cwd), None).unwrap();
            assert!(output.success(), "stderr: {}", output.stderr);
            assert!(output.stdout.contains("docker --version"));

            let output = run_make(
                "print-config",
                false,
                &["BRANCH=main".to_string()],
                Some(cwd),
                None,
            )
            .unwrap();
            assert_eq!(parse_config_output(&output.stdout)["Git Branch"], "main");

            let output = run_make("nonexistent_target", true, &[], Some(cwd), None).unwrap();
            assert_ne!(output.code, Some(0));
            assert!(output.stderr.contains("No rule to make target"));
        }
    }
}
