use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize, rancor};

use crate::world::{
    BULLET_SLOTS, GameState, HORDE_SLOTS, InputFlags, MenuButton, POWERUP_SLOTS, SHIP_SLOTS,
    SOUND_RING_LEN,
};

pub const MAX_PACKET_SIZE: usize = 1200;
pub const PROTOCOL_VERSION: u32 = 1;
pub const PROTOCOL_MAGIC: u32 = 0x494E5644;
pub const DEFAULT_PORT: u16 = 27015;

/// Every pool slot on the wire: ships, enemy ship, horde, bullets, powerups.
pub const ENTITY_SLOTS: usize = SHIP_SLOTS + 1 + HORDE_SLOTS + BULLET_SLOTS + POWERUP_SLOTS;
pub const COMMAND_SLOTS_MAX: usize = 16;

const SEQUENCE_WRAP_THRESHOLD: u32 = u32::MAX / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct PacketHeader {
    pub magic: u32,
    pub version: u32,
    pub sequence: u32,
}

impl PacketHeader {
    pub fn new(sequence: u32) -> Self {
        Self {
            magic: PROTOCOL_MAGIC,
            version: PROTOCOL_VERSION,
            sequence,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == PROTOCOL_MAGIC && self.version == PROTOCOL_VERSION
    }
}

#[inline]
pub fn sequence_greater_than(s1: u32, s2: u32) -> bool {
    ((s1 > s2) && (s1 - s2 <= SEQUENCE_WRAP_THRESHOLD))
        || ((s1 < s2) && (s2 - s1 > SEQUENCE_WRAP_THRESHOLD))
}

/// Top-left corner of a slot, truncated to whole pixels. `(0, 0)` marks a
/// slot that is not active and must not be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct EntityPosition {
    pub x: u16,
    pub y: u16,
}

impl EntityPosition {
    pub const ABSENT: Self = Self { x: 0, y: 0 };

    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct SnapshotState {
    pub positions: [EntityPosition; ENTITY_SLOTS],
    pub game_state: GameState,
    pub menu: MenuButton,
    /// Sound cue bitmasks, one per simulation tick since the last snapshot.
    pub sounds: [u8; SOUND_RING_LEN],
    pub music: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct CommandBatch {
    pub inputs: [u8; COMMAND_SLOTS_MAX],
    /// Number of leading slots the receiver replays.
    pub len: u8,
}

impl CommandBatch {
    pub fn inputs(&self) -> impl Iterator<Item = InputFlags> + '_ {
        let len = (self.len as usize).min(COMMAND_SLOTS_MAX);
        self.inputs[..len]
            .iter()
            .map(|&bits| InputFlags::from_bits_truncate(bits))
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum PacketType {
    Snapshot(SnapshotState),
    Commands(CommandBatch),
}

impl PacketType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Snapshot(_) => "snapshot",
            Self::Commands(_) => "commands",
        }
    }
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct Packet {
    pub header: PacketHeader,
    pub payload: PacketType,
}

#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("serialization failed: {0}")]
    Serialize(rancor::Error),
    #[error("deserialization failed: {0}")]
    Deserialize(rancor::Error),
    #[error("packet of {0} bytes exceeds the datagram size limit")]
    Oversize(usize),
    #[error("bad packet header (magic {magic:#x}, version {version})")]
    BadHeader { magic: u32, version: u32 },
}

impl Packet {
    pub fn new(header: PacketHeader, payload: PacketType) -> Self {
        Self { header, payload }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, PacketError> {
        let data = rkyv::to_bytes::<rancor::Error>(self)
            .map(|aligned| aligned.into_vec())
            .map_err(PacketError::Serialize)?;
        if data.len() > MAX_PACKET_SIZE {
            return Err(PacketError::Oversize(data.len()));
        }
        Ok(data)
    }

    /// Validates and decodes a datagram. The receive buffer carries no
    /// alignment guarantee, so the bytes are copied into an aligned buffer
    /// before the archive is checked.
    pub fn deserialize(data: &[u8]) -> Result<Self, PacketError> {
        let mut aligned = AlignedVec::<16>::with_capacity(data.len());
        aligned.extend_from_slice(data);
        let packet = rkyv::from_bytes::<Self, rancor::Error>(&aligned)
            .map_err(PacketError::Deserialize)?;
        if !packet.header.is_valid() {
            return Err(PacketError::BadHeader {
                magic: packet.header.magic,
                version: packet.header.version,
            });
        }
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> SnapshotState {
        SnapshotState {
            positions: [EntityPosition::ABSENT; ENTITY_SLOTS],
            game_state: GameState::Menu,
            menu: MenuButton::Quit,
            sounds: [0; SOUND_RING_LEN],
            music: 0,
        }
    }

    #[test]
    fn test_sequence_comparison() {
        assert!(sequence_greater_than(2, 1));
        assert!(!sequence_greater_than(1, 2));
        assert!(!sequence_greater_than(5, 5));
        assert!(sequence_greater_than(0, u32::MAX));
        assert!(!sequence_greater_than(u32::MAX, 0));
    }

    #[test]
    fn slot_layout_totals() {
        assert_eq!(ENTITY_SLOTS, 118);
    }

    #[test]
    fn snapshot_fits_one_datagram() {
        let packet = Packet::new(PacketHeader::new(7), PacketType::Snapshot(empty_snapshot()));
        let data = packet.serialize().unwrap();
        assert!(data.len() <= MAX_PACKET_SIZE);

        let decoded = Packet::deserialize(&data).unwrap();
        assert_eq!(decoded.header, packet.header);
        assert_eq!(decoded.payload, packet.payload);
    }

    #[test]
    fn records_have_fixed_size() {
        let mut busy = empty_snapshot();
        busy.positions = [EntityPosition { x: 65535, y: 65535 }; ENTITY_SLOTS];
        busy.sounds = [0xFF; SOUND_RING_LEN];
        let a = Packet::new(PacketHeader::new(1), PacketType::Snapshot(empty_snapshot()));
        let b = Packet::new(PacketHeader::new(2), PacketType::Snapshot(busy));
        assert_eq!(a.serialize().unwrap().len(), b.serialize().unwrap().len());
    }

    #[test]
    fn deserialize_from_unaligned_buffer() {
        let batch = CommandBatch {
            inputs: [InputFlags::FIRE.bits(); COMMAND_SLOTS_MAX],
            len: 3,
        };
        let data = Packet::new(PacketHeader::new(9), PacketType::Commands(batch))
            .serialize()
            .unwrap();
        let mut shifted = vec![0u8; data.len() + 1];
        shifted[1..].copy_from_slice(&data);

        let decoded = Packet::deserialize(&shifted[1..]).unwrap();
        let PacketType::Commands(decoded) = decoded.payload else {
            panic!("expected commands");
        };
        assert_eq!(decoded.inputs().count(), 3);
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut header = PacketHeader::new(1);
        header.magic = 0xDEADBEEF;
        let data = Packet::new(header, PacketType::Snapshot(empty_snapshot()))
            .serialize()
            .unwrap();
        assert!(matches!(
            Packet::deserialize(&data),
            Err(PacketError::BadHeader { .. })
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Packet::deserialize(&[1, 2, 3]).is_err());
        assert!(Packet::deserialize(&[]).is_err());
    }

    #[test]
    fn command_batch_len_is_clamped() {
        let batch = CommandBatch {
            inputs: [0; COMMAND_SLOTS_MAX],
            len: 200,
        };
        assert_eq!(batch.inputs().count(), COMMAND_SLOTS_MAX);
    }
}
