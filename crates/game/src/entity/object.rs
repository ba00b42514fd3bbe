use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ObjectKind {
    #[default]
    Ship = 0,
    EnemyShip = 1,
    Alien1 = 2,
    Alien2 = 3,
    Alien3 = 4,
    Bullet = 5,
    FastShot = 6,
    FastMove = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectState {
    Active,
    #[default]
    Inactive,
    Dead,
}

/// Vertical travel direction. Only meaningful for bullets and powerups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heading {
    #[default]
    TowardPlayer,
    TowardEnemies,
}

impl Heading {
    /// Sign of the y velocity in screen space (y grows downward).
    pub fn sign(self) -> f32 {
        match self {
            Self::TowardPlayer => 1.0,
            Self::TowardEnemies => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    /// Axis-aligned overlap test. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObject {
    pub bounds: Rect,
    pub kind: ObjectKind,
    pub state: ObjectState,
    pub heading: Heading,
}

impl GameObject {
    pub fn new(kind: ObjectKind, bounds: Rect, state: ObjectState) -> Self {
        Self {
            bounds,
            kind,
            state,
            heading: Heading::default(),
        }
    }

    /// An inactive slot of the given size, positioned at the origin.
    pub fn vacant(kind: ObjectKind, size: Vec2) -> Self {
        Self::new(
            kind,
            Rect {
                pos: Vec2::ZERO,
                size,
            },
            ObjectState::Inactive,
        )
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == ObjectState::Active
    }

    pub fn overlaps(&self, other: &GameObject) -> bool {
        self.bounds.overlaps(&other.bounds)
    }
}
