use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::net::{CommandBuffer, DEFAULT_PORT, DEFAULT_TIMEOUT};
use crate::world::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Runs the simulation and sends snapshots.
    Authoritative,
    /// Sends inputs and draws whatever the last snapshot said.
    Replica,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authoritative => "authoritative",
            Self::Replica => "replica",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub role: Role,
    pub local_addr: SocketAddr,
    pub remote_addr: SocketAddr,
    pub sim_period: Duration,
    pub comm_period: Duration,
    pub liveness_timeout: Duration,
    pub seed: u64,
    /// Inbound datagrams to discard, in percent.
    pub loss_percent: f32,
    pub game: GameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: Role::Authoritative,
            local_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            remote_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT + 1)),
            sim_period: Duration::from_millis(16),
            comm_period: Duration::from_millis(50),
            liveness_timeout: DEFAULT_TIMEOUT,
            seed: 0,
            loss_percent: 0.0,
            game: GameConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn command_capacity(&self) -> usize {
        CommandBuffer::capacity_for(self.sim_period, self.comm_period)
    }

    /// Simulation step length in seconds.
    pub fn sim_dt(&self) -> f32 {
        self.sim_period.as_secs_f32()
    }
}
