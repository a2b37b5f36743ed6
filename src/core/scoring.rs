//=========================================================================
// Score & Readiness Ports
//=========================================================================
//
// Collaborators injected into each game session at mount time.
//
// Architecture:
//   GameSession ──submit()──> Arc<dyn ScorePort>   (channel / file / log)
//               ──notify()──> ReadySignal           (once, after setup)
//               ──try_send──> Sender<HudUpdate>     (status line changes)
//
// No session ever blocks on a port: channel ports use try_send and a
// full or closed receiver only costs a log line.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Sender, TrySendError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Identifiers =========================================================

/// Numeric id the host page uses for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque name of the place a game is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountPoint(pub String);

impl MountPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=== Messages ============================================================

/// One score report. Serialises to the host form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game_id: GameId,
    pub score: u32,
}

impl ScoreSubmission {
    /// `game_id` / `score` pairs as a form POST would carry them.
    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [
            ("game_id", self.game_id.0.to_string()),
            ("score", self.score.to_string()),
        ]
    }
}

/// Sent once per session when setup has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReady {
    pub mount: MountPoint,
    pub game_id: GameId,
}

/// Status text for one mounted game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudUpdate {
    pub mount: MountPoint,
    pub text: String,
}

//=== ScorePort ===========================================================

/// Receiver of score submissions.
///
/// Submissions are fire-and-forget; a port that cannot deliver logs
/// and moves on.
pub trait ScorePort: Send + Sync {
    fn submit(&self, submission: &ScoreSubmission);
}

pub type SharedScorePort = Arc<dyn ScorePort>;

//--- ChannelScorePort ----------------------------------------------------

/// Forwards submissions over a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelScorePort {
    sender: Sender<ScoreSubmission>,
}

impl ChannelScorePort {
    pub fn new(sender: Sender<ScoreSubmission>) -> Self {
        Self { sender }
    }
}

impl ScorePort for ChannelScorePort {
    fn submit(&self, submission: &ScoreSubmission) {
        match self.sender.try_send(*submission) {
            Ok(()) => {}
            Err(TrySendError::Full(s)) => {
                warn!(target: "arcade::score", "Score channel full, dropped {:?}", s);
            }
            Err(TrySendError::Disconnected(s)) => {
                debug!(target: "arcade::score", "Score receiver gone, dropped {:?}", s);
            }
        }
    }
}

//--- JsonLinesScorePort --------------------------------------------------

#[derive(Debug, Error)]
pub enum ScoreLogError {
    #[error("cannot open score log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("score log write failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("score serialisation failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Appends one JSON object per submission to a file.
#[derive(Debug)]
pub struct JsonLinesScorePort {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesScorePort {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScoreLogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ScoreLogError::Open { path: path.clone(), source })?;

        info!(target: "arcade::score", "Logging scores to {}", path.display());
        Ok(Self { path, writer: Mutex::new(BufWriter::new(file)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, submission: &ScoreSubmission) -> Result<(), ScoreLogError> {
        let line = serde_json::to_string(submission)?;
        // A poisoned lock only means another writer panicked mid-line
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl ScorePort for JsonLinesScorePort {
    fn submit(&self, submission: &ScoreSubmission) {
        if let Err(e) = self.append(submission) {
            warn!(target: "arcade::score", "{}", e);
        }
    }
}

//--- LogScorePort --------------------------------------------------------

/// Writes submissions to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogScorePort;

impl ScorePort for LogScorePort {
    fn submit(&self, submission: &ScoreSubmission) {
        info!(
            target: "arcade::score",
            "Score submitted: game {} scored {}",
            submission.game_id,
            submission.score
        );
    }
}

//=== ReadySignal =========================================================

#[derive(Debug, Clone)]
pub struct ReadySignal {
    sender: Sender<GameReady>,
}

impl ReadySignal {
    pub fn new(sender: Sender<GameReady>) -> Self {
        Self { sender }
    }

    pub fn notify(&self, ready: GameReady) {
        if let Err(e) = self.sender.try_send(ready) {
            debug!(target: "arcade::session", "Ready signal not delivered: {}", e);
        }
    }
}

//=== SessionPorts ========================================================

/// Everything a session talks to outside itself. All optional.
///
/// A missing score port means the player is not logged in.
#[derive(Clone, Default)]
pub struct SessionPorts {
    pub score: Option<SharedScorePort>,
    pub ready: Option<ReadySignal>,
    pub hud: Option<Sender<HudUpdate>>,
}

impl fmt::Debug for SessionPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPorts")
            .field("score", &self.score.is_some())
            .field("ready", &self.ready.is_some())
            .field("hud", &self.hud.is_some())
            .finish()
    }
}

impl SessionPorts {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, port: SharedScorePort) -> Self {
        self.score = Some(port);
        self
    }

    pub fn with_ready(mut self, signal: ReadySignal) -> Self {
        self.ready = Some(signal);
        self
    }

    pub fn with_hud(mut self, sender: Sender<HudUpdate>) -> Self {
        self.hud = Some(sender);
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
