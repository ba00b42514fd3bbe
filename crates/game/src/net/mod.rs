mod command;
mod endpoint;
mod protocol;
mod snapshot;
mod stats;

pub use command::CommandBuffer;
pub use endpoint::{DEFAULT_TIMEOUT, PeerEndpoint};
pub use protocol::{
    COMMAND_SLOTS_MAX, CommandBatch, DEFAULT_PORT, ENTITY_SLOTS, EntityPosition, MAX_PACKET_SIZE,
    PROTOCOL_MAGIC, PROTOCOL_VERSION, Packet, PacketError, PacketHeader, PacketType, SnapshotState,
    sequence_greater_than,
};
pub use snapshot::{Drawable, ReplicaView, slot_kind};
pub use stats::{NetworkStats, PacketLossSimulation};
