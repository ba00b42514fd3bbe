//! The per-process session: one socket, two cadences and the role-specific
//! frame function driven by the caller's loop.

mod authoritative;
mod cadence;
mod config;
mod error;
mod replica;

use std::net::SocketAddr;
use std::time::Instant;

pub use authoritative::AuthoritativeSession;
pub use cadence::Cadence;
pub use config::{Role, SessionConfig};
pub use error::{SessionError, is_transient};
pub use replica::ReplicaSession;

use crate::net::NetworkStats;
use crate::world::{GameState, InputFlags, MenuButton, MusicFlags, SoundCue};

/// Outcome of one pass of the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub state: GameState,
    /// A simulation tick ran and consumed the input passed in.
    pub simulated: bool,
    pub communicated: bool,
    /// Cues to play locally this frame.
    pub cues: SoundCue,
    /// The liveness check closed the session during this frame.
    pub timed_out: bool,
}

impl FrameReport {
    fn new(state: GameState) -> Self {
        Self {
            state,
            simulated: false,
            communicated: false,
            cues: SoundCue::empty(),
            timed_out: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_terminal()
    }
}

pub enum Session {
    Authoritative(AuthoritativeSession),
    Replica(ReplicaSession),
}

impl Session {
    pub fn start(config: &SessionConfig, now: Instant) -> Result<Self, SessionError> {
        Ok(match config.role {
            Role::Authoritative => Self::Authoritative(AuthoritativeSession::new(config, now)?),
            Role::Replica => Self::Replica(ReplicaSession::new(config, now)?),
        })
    }

    pub fn frame(&mut self, now: Instant, input: InputFlags) -> Result<FrameReport, SessionError> {
        match self {
            Self::Authoritative(session) => session.frame(now, input),
            Self::Replica(session) => session.frame(now, input),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Authoritative(_) => Role::Authoritative,
            Self::Replica(_) => Role::Replica,
        }
    }

    pub fn state(&self) -> GameState {
        match self {
            Self::Authoritative(session) => session.world().state(),
            Self::Replica(session) => session.state(),
        }
    }

    pub fn menu(&self) -> MenuButton {
        match self {
            Self::Authoritative(session) => session.world().menu(),
            Self::Replica(session) => session.view().menu(),
        }
    }

    pub fn music(&self) -> MusicFlags {
        match self {
            Self::Authoritative(session) => session.world().music(),
            Self::Replica(session) => session.view().music(),
        }
    }

    /// Horde plus enemy ship still standing, when this side knows it.
    pub fn enemies_alive(&self) -> Option<u16> {
        match self {
            Self::Authoritative(session) => Some(session.world().enemies_alive()),
            Self::Replica(_) => None,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        match self {
            Self::Authoritative(session) => session.local_addr(),
            Self::Replica(session) => session.local_addr(),
        }
    }

    pub fn remote_addr(&self) -> SocketAddr {
        match self {
            Self::Authoritative(session) => session.remote_addr(),
            Self::Replica(session) => session.remote_addr(),
        }
    }

    pub fn quit(&mut self) -> Result<(), SessionError> {
        match self {
            Self::Authoritative(session) => session.quit(),
            Self::Replica(session) => {
                session.quit();
                Ok(())
            }
        }
    }

    pub fn stats(&self) -> &NetworkStats {
        match self {
            Self::Authoritative(session) => session.stats(),
            Self::Replica(session) => session.stats(),
        }
    }
}
