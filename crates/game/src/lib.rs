pub mod entity;
pub mod net;
pub mod session;
pub mod world;

pub use entity::{
    CollisionCursor, GameObject, Heading, ObjectKind, ObjectState, Pool, PoolCursor, Rect,
    Selected, Selector,
};
pub use net::{
    COMMAND_SLOTS_MAX, CommandBatch, CommandBuffer, DEFAULT_PORT, Drawable, ENTITY_SLOTS,
    EntityPosition, NetworkStats, Packet, PacketError, PacketHeader, PacketLossSimulation,
    PacketType, PeerEndpoint, ReplicaView, SnapshotState,
};
pub use session::{
    AuthoritativeSession, Cadence, FrameReport, ReplicaSession, Role, Session, SessionConfig,
    SessionError,
};
pub use world::{
    GameConfig, GameState, InputFlags, MenuButton, MusicFlags, SOUND_RING_LEN, SoundCue, World,
};
