use std::time::Duration;

use super::protocol::{COMMAND_SLOTS_MAX, CommandBatch};
use crate::world::InputFlags;

/// Inputs sampled on the replica between two communication ticks.
///
/// One slot is written per simulation tick. The whole capacity goes out on
/// every send, including slots left over from the previous batch.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    inputs: [InputFlags; COMMAND_SLOTS_MAX],
    capacity: usize,
    written: usize,
}

impl CommandBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inputs: [InputFlags::empty(); COMMAND_SLOTS_MAX],
            capacity: capacity.clamp(1, COMMAND_SLOTS_MAX),
            written: 0,
        }
    }

    /// Capacity for the given cadences: simulation ticks per communication
    /// tick, at least one and at most the wire limit.
    pub fn capacity_for(sim_period: Duration, comm_period: Duration) -> usize {
        let sim = sim_period.as_nanos().max(1);
        let ticks = usize::try_from(comm_period.as_nanos() / sim).unwrap_or(usize::MAX);
        if ticks > COMMAND_SLOTS_MAX {
            log::warn!(
                "{} simulation ticks per send ({:?} / {:?}) exceed the {} command slots; \
                 late inputs will be merged into the last slot",
                ticks,
                comm_period,
                sim_period,
                COMMAND_SLOTS_MAX
            );
        }
        ticks.clamp(1, COMMAND_SLOTS_MAX)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn as_slice(&self) -> &[InputFlags] {
        &self.inputs[..self.capacity]
    }

    pub fn push(&mut self, input: InputFlags) {
        if self.written < self.capacity {
            self.inputs[self.written] = input;
            self.written += 1;
        } else {
            // Late send: fold into the last slot so presses survive.
            self.inputs[self.capacity - 1] |= input;
        }
    }

    pub fn to_batch(&self) -> CommandBatch {
        let mut inputs = [0u8; COMMAND_SLOTS_MAX];
        for (slot, input) in inputs.iter_mut().zip(self.as_slice()) {
            *slot = input.bits();
        }
        CommandBatch {
            inputs,
            len: self.capacity as u8,
        }
    }

    /// Rewinds the write index after a successful send. Slot contents are
    /// kept and will be overwritten as new ticks are sampled.
    pub fn mark_sent(&mut self) {
        self.written = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_from_cadences() {
        let ms = Duration::from_millis;
        assert_eq!(CommandBuffer::capacity_for(ms(16), ms(50)), 3);
        assert_eq!(CommandBuffer::capacity_for(ms(50), ms(16)), 1);
        assert_eq!(CommandBuffer::capacity_for(ms(1), ms(1000)), COMMAND_SLOTS_MAX);
        assert_eq!(CommandBuffer::capacity_for(Duration::ZERO, ms(50)), COMMAND_SLOTS_MAX);
    }

    #[test]
    fn oversized_ratio_keeps_every_press() {
        let ms = Duration::from_millis;
        let capacity = CommandBuffer::capacity_for(ms(10), ms(500));
        assert_eq!(capacity, COMMAND_SLOTS_MAX);

        let mut buffer = CommandBuffer::new(capacity);
        for _ in 0..50 {
            buffer.push(InputFlags::LEFT);
        }
        buffer.push(InputFlags::CONFIRM);
        assert_eq!(buffer.written(), COMMAND_SLOTS_MAX);
        assert!(buffer.as_slice()[COMMAND_SLOTS_MAX - 1].contains(InputFlags::CONFIRM));
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(CommandBuffer::new(0).capacity(), 1);
        assert_eq!(CommandBuffer::new(64).capacity(), COMMAND_SLOTS_MAX);
    }

    #[test]
    fn batch_carries_full_capacity() {
        let mut buffer = CommandBuffer::new(3);
        buffer.push(InputFlags::LEFT);

        let batch = buffer.to_batch();
        assert_eq!(batch.len, 3);
        let inputs: Vec<_> = batch.inputs().collect();
        assert_eq!(inputs, vec![InputFlags::LEFT, InputFlags::empty(), InputFlags::empty()]);
    }

    #[test]
    fn send_rewinds_but_keeps_stale_tail() {
        let mut buffer = CommandBuffer::new(3);
        buffer.push(InputFlags::LEFT);
        buffer.push(InputFlags::LEFT);
        buffer.push(InputFlags::FIRE);
        buffer.mark_sent();
        assert_eq!(buffer.written(), 0);

        buffer.push(InputFlags::RIGHT);
        assert_eq!(
            buffer.as_slice(),
            &[InputFlags::RIGHT, InputFlags::LEFT, InputFlags::FIRE]
        );
    }

    #[test]
    fn overflow_merges_into_last_slot() {
        let mut buffer = CommandBuffer::new(2);
        buffer.push(InputFlags::LEFT);
        buffer.push(InputFlags::FIRE);
        buffer.push(InputFlags::CONFIRM);

        assert_eq!(buffer.written(), 2);
        assert_eq!(buffer.as_slice()[1], InputFlags::FIRE | InputFlags::CONFIRM);
    }
}
