use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Drops a share of inbound datagrams before they are decoded, to exercise
/// the liveness path without a real lossy link.
#[derive(Debug, Clone)]
pub struct PacketLossSimulation {
    pub loss_percent: f32,
    rng: Pcg32,
}

impl PacketLossSimulation {
    pub fn new(loss_percent: f32, seed: u64) -> Self {
        Self {
            loss_percent: loss_percent.clamp(0.0, 100.0),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0.0, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.loss_percent > 0.0
    }

    pub fn should_drop(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.rng.random::<f32>() * 100.0 < self.loss_percent
    }
}

impl Default for PacketLossSimulation {
    fn default() -> Self {
        Self::disabled()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    /// Discarded by the loss simulation.
    pub packets_dropped: u64,
    /// Sequence not newer than the last accepted one.
    pub packets_stale: u64,
    /// Sent from an address other than the configured peer.
    pub packets_foreign: u64,
    pub packets_malformed: u64,
    pub would_block: u64,
}

impl NetworkStats {
    pub fn packets_discarded(&self) -> u64 {
        self.packets_dropped + self.packets_stale + self.packets_foreign + self.packets_malformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_drops() {
        let mut sim = PacketLossSimulation::disabled();
        assert!((0..1000).all(|_| !sim.should_drop()));
    }

    #[test]
    fn full_loss_always_drops() {
        let mut sim = PacketLossSimulation::new(100.0, 3);
        assert!((0..1000).all(|_| sim.should_drop()));
    }

    #[test]
    fn partial_loss_is_roughly_proportional() {
        let mut sim = PacketLossSimulation::new(25.0, 11);
        let dropped = (0..10_000).filter(|_| sim.should_drop()).count();
        assert!((2000..3000).contains(&dropped), "dropped {dropped}");
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(PacketLossSimulation::new(250.0, 0).loss_percent, 100.0);
        assert!(!PacketLossSimulation::new(-5.0, 0).is_enabled());
    }
}
