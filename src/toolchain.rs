// Copyright 2026 Cornell University
// released under MIT License

//! # Simulator driver
//! Runs the Vivado simulator flow (`xvlog` → `xelab` → `xsim`) as child
//! processes. The directory holding the tools is passed in explicitly and is
//! only added to the `PATH` of the children, never to our own environment.

use crate::designs::Design;
use crate::errors::ToolchainError;
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

pub type Result<T> = std::result::Result<T, ToolchainError>;

/// Stimulus trace read by the testbench
pub const STIMULUS_FILE: &str = "stimulus.txt";
/// Response trace written by the testbench
pub const RESPONSE_FILE: &str = "response.txt";
/// Batch script handed to `xsim`
pub const XSIM_SCRIPT: &str = "xsim_cfg.tcl";
/// Name of the elaborated simulation snapshot
pub const SNAPSHOT: &str = "topsim";

const XSIM_BATCH_COMMANDS: &[&str] = &["log_wave -recursive *", "run all", "quit"];

/// Extensions of the log and journal files left behind by the tools
const ARTIFACT_EXTENSIONS: &[&str] = &["log", "jou", "pb", "str", "wdb"];
/// Directories the tools create in their working directory
const ARTIFACT_DIRS: &[&str] = &["xsim.dir", ".Xil"];

#[derive(Debug, Clone)]
pub struct XsimEnv {
    /// directory containing `xvlog`, `xelab` and `xsim`; `None` to use `PATH`
    tool_dir: Option<PathBuf>,
    working_dir: PathBuf,
}

impl Default for XsimEnv {
    fn default() -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            tool_dir: None,
            working_dir,
        }
    }
}

impl XsimEnv {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: None,
            working_dir: working_dir.into(),
        }
    }

    pub fn with_tool_dir(mut self, tool_dir: Option<PathBuf>) -> Self {
        self.tool_dir = tool_dir;
        self
    }

    pub fn working_dir(&self) -> &Path {
        self.working_dir.as_path()
    }

    pub fn stimulus_path(&self) -> PathBuf {
        self.working_dir.join(STIMULUS_FILE)
    }

    pub fn response_path(&self) -> PathBuf {
        self.working_dir.join(RESPONSE_FILE)
    }

    /// `PATH` for child processes: the tool directory followed by our own `PATH`
    fn child_path(&self) -> Option<OsString> {
        let tool_dir = self.tool_dir.as_ref()?;
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![tool_dir.clone()];
        paths.extend(std::env::split_paths(&inherited));
        std::env::join_paths(paths).ok()
    }

    /// Builds a command for `tool`, running in the working directory
    pub fn command(&self, tool: &str) -> Command {
        let program = match &self.tool_dir {
            Some(dir) if dir.join(tool).exists() => dir.join(tool),
            _ => PathBuf::from(tool),
        };
        let mut cmd = Command::new(program);
        cmd.current_dir(&self.working_dir);
        if let Some(path) = self.child_path() {
            cmd.env("PATH", path);
        }
        cmd
    }
}

/// Runs `cmd` to completion, returning its stdout
fn run(tool: &str, mut cmd: Command) -> Result<String> {
    debug!("running {:?}", cmd);
    let res = cmd.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => ToolchainError::ToolNotFound(tool.to_string()),
        _ => ToolchainError::IoError(e),
    })?;
    let out = String::from_utf8_lossy(&res.stdout).to_string();
    if res.status.success() {
        Ok(out)
    } else {
        let err = String::from_utf8_lossy(&res.stderr).to_string();
        Err(ToolchainError::FailedToExecuteCommand(
            format!("{cmd:?}"),
            out,
            err,
        ))
    }
}

/// Checks that the simulator can be launched
pub fn require_xsim(env: &XsimEnv) -> Result<()> {
    let mut cmd = env.command("xvlog");
    cmd.arg("--version");
    run("xvlog", cmd).map(|_| ())
}

/// Compiles the RTL and testbench of `design`
pub fn compile(env: &XsimEnv, design: &Design) -> Result<()> {
    let mut cmd = env.command("xvlog");
    cmd.arg("-sv");
    for define in &design.defines {
        cmd.arg("-d").arg(define);
    }
    cmd.arg(&design.rtl).arg(&design.testbench);
    run("xvlog", cmd).map(|_| ())
}

/// Elaborates the testbench top into the simulation snapshot
pub fn elaborate(env: &XsimEnv, design: &Design) -> Result<()> {
    let mut cmd = env.command("xelab");
    cmd.args(["-debug", "typical"])
        .arg(&design.sim_top)
        .args(["-s", SNAPSHOT]);
    run("xelab", cmd).map(|_| ())
}

/// Runs the elaborated snapshot in batch mode with waveform logging
pub fn simulate(env: &XsimEnv) -> Result<()> {
    let script = env.working_dir.join(XSIM_SCRIPT);
    fs::write(&script, XSIM_BATCH_COMMANDS.join("\n") + "\n")?;

    let mut cmd = env.command("xsim");
    cmd.arg(SNAPSHOT)
        .args(["-tclbatch", XSIM_SCRIPT])
        .args(["-onerror", "quit"]);
    run("xsim", cmd).map(|_| ())
}

/// Compiles, elaborates and simulates `design`. The stimulus trace must
/// already be in the working directory. Returns the path of the response
/// trace written by the testbench.
pub fn run_simulation(env: &XsimEnv, design: &Design) -> Result<PathBuf> {
    info!("Compiling {}...", design.name);
    compile(env, design)?;
    info!("Elaborating {}...", design.name);
    elaborate(env, design)?;
    info!("Simulating {}...", design.name);
    simulate(env)?;

    let response = env.response_path();
    if response.exists() {
        Ok(response)
    } else {
        Err(ToolchainError::OutputMissing(
            response.to_string_lossy().to_string(),
        ))
    }
}

/// Last `lines` lines of a log file, `None` if it cannot be read
pub fn tail_log(path: impl AsRef<Path>, lines: usize) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    Some(all[start..].join("\n"))
}

fn remove_path(path: &Path, removed: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    debug!("deleted {}", path.display());
    removed.push(path.to_path_buf());
    Ok(())
}

/// Deletes tool logs, journals and scratch directories from `dir`.
/// Returns what was deleted.
pub fn clean_artifacts(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut removed = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_artifact_dir = path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| ARTIFACT_DIRS.contains(&n));
        let is_artifact_file = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| ARTIFACT_EXTENSIONS.contains(&e));
        if is_artifact_dir || is_artifact_file {
            remove_path(&path, &mut removed)?;
        }
    }
    removed.sort();
    Ok(removed)
}

/// Deletes the stimulus and response traces and the batch script from `dir`
pub fn clean_traces(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut removed = vec![];
    for name in [STIMULUS_FILE, RESPONSE_FILE, XSIM_SCRIPT] {
        let path = dir.as_ref().join(name);
        if path.exists() {
            remove_path(&path, &mut removed)?;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::Variant;

    #[test]
    fn test_command_prepends_tool_dir_to_child_path() {
        let env = XsimEnv::new("/tmp").with_tool_dir(Some(PathBuf::from("/opt/xilinx/bin")));
        let cmd = env.command("xvlog");
        let path = cmd
            .get_envs()
            .find(|(k, _)| k.to_str() == Some("PATH"))
            .and_then(|(_, v)| v)
            .expect("PATH should be set");
        let first = std::env::split_paths(path).next().unwrap();
        assert_eq!(first, PathBuf::from("/opt/xilinx/bin"));
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn test_command_without_tool_dir_inherits_path() {
        let env = XsimEnv::new("/tmp");
        let cmd = env.command("xsim");
        assert_eq!(cmd.get_program(), "xsim");
        assert_eq!(cmd.get_envs().count(), 0);
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = XsimEnv::new(dir.path());
        let res = run("fifobench-no-such-tool", env.command("fifobench-no-such-tool"));
        assert!(matches!(res, Err(ToolchainError::ToolNotFound(_))));
    }

    #[test]
    fn test_tail_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("xelab.log");
        fs::write(&log, "one\ntwo\nthree\nfour\n").unwrap();
        assert_eq!(tail_log(&log, 2).unwrap(), "three\nfour");
        assert_eq!(tail_log(&log, 10).unwrap(), "one\ntwo\nthree\nfour");
        assert!(tail_log(dir.path().join("missing.log"), 2).is_none());
    }

    #[test]
    fn test_clean_artifacts_and_traces() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path();
        for f in ["xvlog.log", "xelab.pb", "vivado.jou", "waves.wdb", "keep.sv", STIMULUS_FILE] {
            fs::write(p.join(f), "").unwrap();
        }
        fs::create_dir_all(p.join("xsim.dir/topsim")).unwrap();
        fs::create_dir(p.join("rtl")).unwrap();

        let removed = clean_artifacts(p).unwrap();
        assert_eq!(removed.len(), 5);
        assert!(!p.join("xsim.dir").exists());
        assert!(p.join("keep.sv").exists());
        assert!(p.join("rtl").exists());
        assert!(p.join(STIMULUS_FILE).exists());

        let removed = clean_traces(p).unwrap();
        assert_eq!(removed, vec![p.join(STIMULUS_FILE)]);
        assert!(!p.join(STIMULUS_FILE).exists());
    }

    #[test]
    #[ignore = "requires the Vivado simulator"]
    fn test_require_xsim() {
        require_xsim(&XsimEnv::default()).expect("failed");
    }

    #[test]
    #[ignore = "requires the Vivado simulator and the FIFO sources"]
    fn test_run_sync_fifo() {
        let env = XsimEnv::default();
        let design = Design::for_variant(Variant::Sync, Path::new("../rtl"), Path::new("../tb"));
        run_simulation(&env, &design).unwrap();
    }
}
