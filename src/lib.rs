//! Wolfenstein-style software raycaster.
//!
//! One ray is cast per screen column against a tile grid; the nearest wall
//! hit becomes a vertically scaled texture strip, and billboard sprites are
//! projected afterwards, occluded per column against the wall depth buffer.
//!
//! * [`world`] — grid map, camera, texture bank, sprites.
//! * [`renderer`] — the abstract draw surface plus a software framebuffer.
//! * [`scene`] — the per-frame pipeline tying the two together.

pub mod renderer;
pub mod scene;
pub mod world;
