use std::net::SocketAddr;
use std::time::Instant;

use super::cadence::Cadence;
use super::config::SessionConfig;
use super::error::SessionError;
use super::FrameReport;
use crate::net::{
    CommandBuffer, NetworkStats, PacketLossSimulation, PacketType, PeerEndpoint, ReplicaView,
};
use crate::world::{GameState, InputFlags};

/// Samples local input into a command buffer and mirrors the snapshots the
/// authoritative peer sends back. Runs no simulation of its own.
pub struct ReplicaSession {
    view: ReplicaView,
    commands: CommandBuffer,
    endpoint: PeerEndpoint,
    sim: Cadence,
    comm: Cadence,
    state: GameState,
}

impl ReplicaSession {
    pub fn new(config: &SessionConfig, now: Instant) -> Result<Self, SessionError> {
        let mut endpoint = PeerEndpoint::bind(config.local_addr, config.remote_addr, now)?;
        endpoint.set_timeout(config.liveness_timeout);
        endpoint.set_packet_loss(PacketLossSimulation::new(
            config.loss_percent,
            config.seed.wrapping_add(2),
        ));

        let capacity = config.command_capacity();
        log::info!(
            "Replica peer on {}, authoritative at {}, {} inputs per batch",
            endpoint.local_addr(),
            endpoint.remote_addr(),
            capacity
        );

        Ok(Self {
            view: ReplicaView::new(),
            commands: CommandBuffer::new(capacity),
            endpoint,
            sim: Cadence::new(config.sim_period, now),
            comm: Cadence::new(config.comm_period, now),
            state: GameState::Connecting,
        })
    }

    pub fn view(&self) -> &ReplicaView {
        &self.view
    }

    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.endpoint.local_addr()
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.endpoint.remote_addr()
    }

    pub fn stats(&self) -> &NetworkStats {
        self.endpoint.stats()
    }

    /// Local shutdown. The protocol has no close message in this direction,
    /// so the authoritative peer notices through its liveness timeout.
    pub fn quit(&mut self) {
        self.set_state(GameState::Close);
    }

    pub fn frame(&mut self, now: Instant, input: InputFlags) -> Result<FrameReport, SessionError> {
        let mut report = FrameReport::new(self.state);
        if self.state == GameState::Close {
            return Ok(report);
        }

        if self.endpoint.is_timed_out(now) {
            log::warn!(
                "Nothing heard from {} for over {:?}, closing",
                self.endpoint.remote_addr(),
                self.endpoint.timeout()
            );
            self.state = GameState::Close;
            report.state = GameState::Close;
            report.timed_out = true;
            return Ok(report);
        }

        let comm_due = self.comm.due(now);
        let sim_due = self.sim.due(now);

        if comm_due {
            let received = self.endpoint.try_recv(now).map_err(|e| self.fail(e))?;
            match received {
                Some(PacketType::Snapshot(snapshot)) => {
                    report.cues = self.view.apply(snapshot);
                    self.set_state(self.view.game_state());
                }
                Some(PacketType::Commands(_)) => {
                    log::debug!("Ignoring command batch sent to the replica");
                }
                None => {}
            }
        }

        if self.state == GameState::Close {
            report.state = self.state;
            return Ok(report);
        }

        if sim_due {
            self.commands.push(input);
            report.simulated = true;
        }

        if comm_due {
            let sent = self
                .endpoint
                .send(PacketType::Commands(self.commands.to_batch()))
                .map_err(|e| self.fail(e))?;
            if sent {
                self.commands.mark_sent();
            }
            report.communicated = true;
        }

        report.state = self.state;
        Ok(report)
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            log::info!("Game state {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
        }
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        log::error!("Closing session: {}", error);
        self.state = GameState::Close;
        error
    }
}
