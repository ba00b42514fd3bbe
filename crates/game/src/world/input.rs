use bitflags::bitflags;

bitflags! {
    /// One simulation tick worth of sampled input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputFlags: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const FIRE = 1 << 4;
        const CONFIRM = 1 << 5;
        const PAUSE = 1 << 6;
    }
}

impl InputFlags {
    /// Horizontal direction requested by the left/right bits, in -1..=1.
    pub fn horizontal(self) -> f32 {
        let mut direction = 0.0;
        if self.contains(Self::LEFT) {
            direction -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            direction += 1.0;
        }
        direction
    }
}
