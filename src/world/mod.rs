pub mod camera;
pub mod grid;
pub mod sprite;
pub mod texture;

pub use camera::Camera;
pub use grid::{Face, GridMap, HitKind, MapError, MaterialId, RayHit, SpriteId, TILE};
pub use sprite::{Behavior, Cycle, Damageable, Sprite, SpriteState, Still};
pub use texture::{FaceSet, NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
