use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use super::protocol::{MAX_PACKET_SIZE, Packet, PacketHeader, PacketType, sequence_greater_than};
use super::stats::{NetworkStats, PacketLossSimulation};
use crate::session::{SessionError, is_transient};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One non-blocking UDP socket talking to exactly one peer.
pub struct PeerEndpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
    stats: NetworkStats,
    loss: PacketLossSimulation,
    recv_buffer: [u8; MAX_PACKET_SIZE],
    timeout: Duration,
    last_contact: Instant,
    send_sequence: u32,
    last_accepted: Option<u32>,
}

impl PeerEndpoint {
    pub fn bind(local: SocketAddr, remote: SocketAddr, now: Instant) -> Result<Self, SessionError> {
        let bind_error = |source| SessionError::Bind {
            addr: local,
            source,
        };
        let socket = UdpSocket::bind(local).map_err(bind_error)?;
        socket.set_nonblocking(true).map_err(bind_error)?;
        let local_addr = socket.local_addr().map_err(bind_error)?;

        Ok(Self {
            socket,
            local_addr,
            remote_addr: remote,
            stats: NetworkStats::default(),
            loss: PacketLossSimulation::disabled(),
            recv_buffer: [0u8; MAX_PACKET_SIZE],
            timeout: DEFAULT_TIMEOUT,
            last_contact: now,
            send_sequence: 0,
            last_accepted: None,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn set_remote(&mut self, addr: SocketAddr) {
        self.remote_addr = addr;
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn set_packet_loss(&mut self, loss: PacketLossSimulation) {
        self.loss = loss;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn last_contact(&self) -> Instant {
        self.last_contact
    }

    pub fn is_timed_out(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_contact) > self.timeout
    }

    /// Sends one record to the peer. `Ok(false)` means the socket could not
    /// take it right now; the caller tries again on its next tick.
    pub fn send(&mut self, payload: PacketType) -> Result<bool, SessionError> {
        let packet = Packet::new(PacketHeader::new(self.send_sequence), payload);
        let data = packet.serialize()?;

        match self.socket.send_to(&data, self.remote_addr) {
            Ok(bytes) => {
                self.send_sequence = self.send_sequence.wrapping_add(1);
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += bytes as u64;
                Ok(true)
            }
            Err(e) if is_transient(&e) => {
                self.stats.would_block += 1;
                Ok(false)
            }
            Err(e) => Err(SessionError::Transport(e)),
        }
    }

    /// Reads at most one datagram. Anything that is not a fresh, well-formed
    /// record from the configured peer is counted and discarded.
    pub fn try_recv(&mut self, now: Instant) -> Result<Option<PacketType>, SessionError> {
        let (size, addr) = match self.socket.recv_from(&mut self.recv_buffer) {
            Ok(received) => received,
            Err(e) if is_transient(&e) => {
                self.stats.would_block += 1;
                return Ok(None);
            }
            Err(e) => return Err(SessionError::Transport(e)),
        };

        if addr != self.remote_addr {
            self.stats.packets_foreign += 1;
            log::warn!("Discarding datagram from unexpected address {}", addr);
            return Ok(None);
        }

        if self.loss.should_drop() {
            self.stats.packets_dropped += 1;
            log::debug!("Simulated loss dropped {} bytes", size);
            return Ok(None);
        }

        let packet = match Packet::deserialize(&self.recv_buffer[..size]) {
            Ok(packet) => packet,
            Err(e) => {
                self.stats.packets_malformed += 1;
                log::debug!("Discarding malformed datagram: {}", e);
                return Ok(None);
            }
        };

        self.stats.packets_received += 1;
        self.stats.bytes_received += size as u64;
        self.last_contact = now;

        let sequence = packet.header.sequence;
        if let Some(last) = self.last_accepted {
            if !sequence_greater_than(sequence, last) {
                self.stats.packets_stale += 1;
                log::debug!(
                    "Discarding stale {} #{} (last #{})",
                    packet.payload.name(),
                    sequence,
                    last
                );
                return Ok(None);
            }
        }
        self.last_accepted = Some(sequence);

        Ok(Some(packet.payload))
    }
}
