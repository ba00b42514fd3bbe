use std::net::SocketAddr;
use std::time::Instant;

use super::cadence::Cadence;
use super::config::SessionConfig;
use super::error::SessionError;
use super::FrameReport;
use crate::net::{NetworkStats, PacketLossSimulation, PacketType, PeerEndpoint, SnapshotState};
use crate::world::{GameState, InputFlags, World};

/// Owns the world. Simulates on the simulation cadence; on the
/// communication cadence it replays one inbound command batch and answers
/// with a snapshot.
pub struct AuthoritativeSession {
    world: World,
    endpoint: PeerEndpoint,
    sim: Cadence,
    comm: Cadence,
    dt: f32,
    batches_applied: u64,
}

impl AuthoritativeSession {
    pub fn new(config: &SessionConfig, now: Instant) -> Result<Self, SessionError> {
        let mut endpoint = PeerEndpoint::bind(config.local_addr, config.remote_addr, now)?;
        endpoint.set_timeout(config.liveness_timeout);
        endpoint.set_packet_loss(PacketLossSimulation::new(
            config.loss_percent,
            config.seed.wrapping_add(1),
        ));

        log::info!(
            "Authoritative peer on {}, expecting replica at {}",
            endpoint.local_addr(),
            endpoint.remote_addr()
        );

        Ok(Self {
            world: World::new(config.game.clone(), config.seed),
            endpoint,
            sim: Cadence::new(config.sim_period, now),
            comm: Cadence::new(config.comm_period, now),
            dt: config.sim_dt(),
            batches_applied: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
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

    /// Local shutdown: closes the world and sends the replica the final
    /// snapshot straight away.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        if self.world.state() == GameState::Close {
            return Ok(());
        }
        self.world.set_state(GameState::Close);
        let snapshot = SnapshotState::encode(&mut self.world);
        self.endpoint.send(PacketType::Snapshot(snapshot))?;
        Ok(())
    }

    pub fn batches_applied(&self) -> u64 {
        self.batches_applied
    }

    pub fn frame(&mut self, now: Instant, input: InputFlags) -> Result<FrameReport, SessionError> {
        let mut report = FrameReport::new(self.world.state());
        if self.world.state() == GameState::Close {
            return Ok(report);
        }

        if self.endpoint.is_timed_out(now) {
            log::warn!(
                "Nothing heard from {} for over {:?}, closing",
                self.endpoint.remote_addr(),
                self.endpoint.timeout()
            );
            self.world.set_state(GameState::Close);
            report.state = GameState::Close;
            report.timed_out = true;
            return Ok(report);
        }

        let comm_due = self.comm.due(now);
        let sim_due = self.sim.due(now);

        if comm_due {
            let received = self.endpoint.try_recv(now).map_err(|e| self.fail(e))?;
            if let Some(payload) = received {
                self.world.peer_joined();
                match payload {
                    PacketType::Commands(batch) => {
                        self.world.apply_remote_inputs(batch.inputs(), self.dt);
                        self.batches_applied += 1;
                    }
                    PacketType::Snapshot(_) => {
                        log::debug!("Ignoring snapshot sent to the authoritative peer");
                    }
                }
            }
        }

        if sim_due {
            self.world.step(input, self.dt);
            report.simulated = true;
        }

        // Quitting sends one last snapshot right away so the replica sees
        // the close without waiting for the next communication tick.
        let quitting = self.world.state() == GameState::Close;
        if comm_due || quitting {
            let snapshot = SnapshotState::encode(&mut self.world);
            self.endpoint
                .send(PacketType::Snapshot(snapshot))
                .map_err(|e| self.fail(e))?;
            report.communicated = true;
        }
        if quitting {
            log::info!("Session closed from the menu");
        }

        report.state = self.world.state();
        report.cues = self.world.take_frame_cues();
        Ok(report)
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        log::error!("Closing session: {}", error);
        self.world.set_state(GameState::Close);
        error
    }
}
