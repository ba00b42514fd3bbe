mod collision;
mod cursor;
mod object;
mod pool;

pub use collision::CollisionCursor;
pub use cursor::{PoolCursor, Selector};
pub use object::{GameObject, Heading, ObjectKind, ObjectState, Rect};
pub use pool::{Pool, Selected};
