//! Simulator process supervision.
//!
//! This module owns the wmediumd lifecycle: it renders the topology into
//! config bytes, writes them to a uniquely named transient file, launches the
//! simulator detached from the caller's process tree, and tears everything
//! down again on request.
//!
//! The supervisor is an explicit value owned by the embedding application;
//! there is no shared global state. One supervisor owns one transient config
//! file between `start()` and `stop()`; concurrent supervisors stay
//! collision-free through unique temp-file naming.

use crate::topology::{MacResolver, TopologyError, TopologyRegistry};
use crate::wmediumd::{render_config, RenderError, DEFAULT_EXECUTABLE};
use log::{info, warn};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

/// Session label the detached simulator is started under and later
/// terminated by
pub const DEFAULT_SESSION: &str = "wmedsim";

/// Errors produced by lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("no topology has been configured")]
    NotConfigured,

    #[error("wmediumd is already running")]
    AlreadyRunning,

    #[error("wmediumd is not running")]
    NotRunning,

    #[error("topology has no registered interfaces")]
    EmptyTopology,

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write wmediumd config file: {0}")]
    ConfigFile(io::Error),

    #[error("failed to launch wmediumd: {0}")]
    Launch(io::Error),
}

/// Lifecycle state of the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Uninitialized,
    Configured,
    Running,
    Stopped,
}

/// How the detached simulator process is spawned and terminated.
///
/// The state machine only ever needs these two operations, so the platform
/// mechanism stays swappable (tests substitute a recording fake).
pub trait ProcessLauncher {
    /// Spawn `<executable> -c <config_path>` detached under `session` so it
    /// survives the caller's foreground flow.
    fn spawn(&self, session: &str, executable: &str, config_path: &Path) -> io::Result<()>;

    /// Request termination of the session. `Ok(false)` means the session was
    /// not found, which callers treat as a cleanup warning rather than a
    /// failure.
    fn terminate(&self, session: &str) -> io::Result<bool>;
}

/// Launcher backed by tmux detached sessions.
///
/// The simulator runs inside a named tmux session, so it keeps running after
/// the embedding program's interactive session ends and can be terminated
/// later by the session label alone.
pub struct TmuxLauncher;

impl ProcessLauncher for TmuxLauncher {
    fn spawn(&self, session: &str, executable: &str, config_path: &Path) -> io::Result<()> {
        let status = Command::new("tmux")
            .args(["new-session", "-d", "-s", session])
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "tmux new-session -s {} exited with {}",
                session, status
            )));
        }

        let command_line = format!("{} -c {}", executable, config_path.display());
        let status = Command::new("tmux")
            .args(["send-keys", "-t", session, &command_line, "C-m"])
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!(
                "tmux send-keys -t {} exited with {}",
                session, status
            )));
        }
        Ok(())
    }

    fn terminate(&self, session: &str) -> io::Result<bool> {
        let status = Command::new("tmux")
            .args(["kill-session", "-t", session])
            .status()?;
        Ok(status.success())
    }
}

/// Supervises one wmediumd instance.
///
/// Created `Uninitialized`; `configure()` captures the rendered config in
/// memory (`Configured`), `start()` persists it and launches the simulator
/// (`Running`), `stop()` terminates and cleans up (`Stopped`). A stopped
/// supervisor must be reconfigured before it can start again.
pub struct MediumSupervisor {
    state: SupervisorState,
    executable: String,
    session: String,
    config: Option<Vec<u8>>,
    config_path: Option<PathBuf>,
    launcher: Box<dyn ProcessLauncher>,
}

impl Default for MediumSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl MediumSupervisor {
    /// Supervisor using the tmux launcher and default session label.
    pub fn new() -> Self {
        Self::with_launcher(Box::new(TmuxLauncher))
    }

    /// Supervisor with a custom process launcher.
    pub fn with_launcher(launcher: Box<dyn ProcessLauncher>) -> Self {
        MediumSupervisor {
            state: SupervisorState::Uninitialized,
            executable: DEFAULT_EXECUTABLE.to_string(),
            session: DEFAULT_SESSION.to_string(),
            config: None,
            config_path: None,
            launcher,
        }
    }

    /// Override the session label the simulator is started under.
    pub fn set_session(&mut self, session: impl Into<String>) {
        self.session = session.into();
    }

    /// Session label in use
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Current lifecycle state
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Path of the transient config file while the simulator is running
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Validate and capture the topology.
    ///
    /// Finalizes the registry (auto-completion plus endpoint validation) and
    /// renders the config into memory. No file is written and no process is
    /// started. Errors if the simulator is currently running; on any error
    /// the previous state is kept so the caller can fix the cause and retry.
    pub fn configure(
        &mut self,
        registry: &mut TopologyRegistry,
        resolver: &dyn MacResolver,
        executable: &str,
    ) -> Result<(), SupervisorError> {
        if self.state == SupervisorState::Running {
            return Err(SupervisorError::AlreadyRunning);
        }
        if registry.is_empty() {
            return Err(SupervisorError::EmptyTopology);
        }

        let links = registry.finalize()?;
        let config = render_config(registry.interfaces(), &links, resolver)?;

        self.config = Some(config);
        self.executable = executable.to_string();
        self.state = SupervisorState::Configured;
        Ok(())
    }

    /// Write the config to a transient file and launch the simulator.
    ///
    /// The file gets a unique name (`wmedsim_*.cfg` under the system temp
    /// directory) and the process is spawned detached under the session
    /// label, so it keeps running until [`stop`](Self::stop). Double starts
    /// fail with [`SupervisorError::AlreadyRunning`]; a failed launch removes
    /// the file and leaves the state unchanged.
    pub fn start(&mut self) -> Result<(), SupervisorError> {
        match self.state {
            SupervisorState::Running => return Err(SupervisorError::AlreadyRunning),
            SupervisorState::Uninitialized | SupervisorState::Stopped => {
                return Err(SupervisorError::NotConfigured)
            }
            SupervisorState::Configured => {}
        }
        let config = self.config.as_ref().ok_or(SupervisorError::NotConfigured)?;

        let mut file = tempfile::Builder::new()
            .prefix("wmedsim_")
            .suffix(".cfg")
            .tempfile()
            .map_err(SupervisorError::ConfigFile)?;
        file.write_all(config).map_err(SupervisorError::ConfigFile)?;
        let path = file
            .into_temp_path()
            .keep()
            .map_err(|e| SupervisorError::ConfigFile(e.error))?;
        info!("Name of wmediumd config: {}", path.display());

        if let Err(e) = self.launcher.spawn(&self.session, &self.executable, &path) {
            // Roll back the transient file so a retry starts clean.
            if let Err(remove_err) = fs::remove_file(&path) {
                warn!(
                    "Could not remove config file {} after failed launch: {}",
                    path.display(),
                    remove_err
                );
            }
            return Err(SupervisorError::Launch(e));
        }

        self.config_path = Some(path);
        self.state = SupervisorState::Running;
        Ok(())
    }

    /// Terminate the simulator and clean up the transient file.
    ///
    /// Both cleanup steps are best-effort: a config file that is already gone
    /// and a session that is no longer found are logged warnings, not
    /// errors. The supervisor always ends up `Stopped` so later lifecycle
    /// operations are not blocked by a half-failed teardown.
    pub fn stop(&mut self) -> Result<(), SupervisorError> {
        if self.state != SupervisorState::Running {
            return Err(SupervisorError::NotRunning);
        }

        if let Some(path) = self.config_path.take() {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("Config file {} was already removed", path.display());
                }
                Err(e) => {
                    warn!("Could not remove config file {}: {}", path.display(), e);
                }
            }
        }

        match self.launcher.terminate(&self.session) {
            Ok(true) => info!("Terminated wmediumd session {}", self.session),
            Ok(false) => warn!("wmediumd session {} not found", self.session),
            Err(e) => warn!("Could not terminate wmediumd session {}: {}", self.session, e),
        }

        self.state = SupervisorState::Stopped;
        Ok(())
    }
}

/// Hook the embedding framework invokes once, synchronously, after it has
/// provisioned the radio interfaces
pub type PostProvisionHook = Box<dyn FnOnce() -> Result<(), SupervisorError>>;

/// Build a post-provision hook that starts the supervised simulator.
///
/// This is the explicit replacement for intercepting the collaborator's
/// interface-creation routine: a framework that accepts such a hook calls it
/// right after the interfaces come up, pre-empting connectivity before any
/// traffic flows. Frameworks without the hook simply call
/// [`MediumSupervisor::start`] after their build step instead.
pub fn post_provision_hook(supervisor: &Rc<RefCell<MediumSupervisor>>) -> PostProvisionHook {
    let supervisor = Rc::clone(supervisor);
    Box::new(move || supervisor.borrow_mut().start())
}
