use glam::Vec2;

use crate::world::texture::TextureId;

/// The data the renderer actually reads: where the sprite stands and which
/// texture holds the current frame. The texture's texel columns are the
/// pre-sliced vertical strips drawn one by one during projection.
#[derive(Clone, Copy, Debug)]
pub struct SpriteState {
    pub pos: Vec2,
    pub tex: TextureId,
}

/// Per-sprite lifecycle hooks, invoked once before and once after the
/// sprite's projection each frame. Animation and state machines advance
/// here; the renderer knows nothing about them.
///
/// `as_damageable` is an explicit capability facet: interaction code asks
/// for it instead of probing method existence at runtime. The default is
/// "not damageable".
pub trait Behavior {
    fn before_draw(&mut self, _state: &mut SpriteState) {}
    fn after_draw(&mut self, _state: &mut SpriteState) {}

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        None
    }
}

/// Optional facet for sprites that can be shot at.
pub trait Damageable {
    fn take_damage(&mut self, amount: i32);
    fn health(&self) -> i32;
}

/// A billboard in the world: always faces the camera, scaled by distance.
///
/// Sprites live in [`GridMap::sprites`](crate::world::GridMap::sprites) for
/// the whole session; removal (e.g. on death) is the owner's policy, not
/// the renderer's.
pub struct Sprite {
    pub state: SpriteState,
    pub behavior: Box<dyn Behavior>,
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Sprite {
    pub fn new(pos: Vec2, tex: TextureId, behavior: Box<dyn Behavior>) -> Self {
        Self { state: SpriteState { pos, tex }, behavior }
    }

    /// Inanimate sprite showing a single fixed frame.
    pub fn still(pos: Vec2, tex: TextureId) -> Self {
        Self::new(pos, tex, Box::new(Still))
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.state.pos
    }

    #[inline]
    pub fn tex(&self) -> TextureId {
        self.state.tex
    }
}

/// No-op behavior for decorations.
pub struct Still;

impl Behavior for Still {}

/// Cycles through `frames`, advancing one frame every `ticks_per_frame`
/// rendered frames (a flickering lamp, an idle walk loop).
pub struct Cycle {
    frames: Vec<TextureId>,
    ticks_per_frame: u32,
    tick: u32,
}

impl Cycle {
    pub fn new(frames: Vec<TextureId>, ticks_per_frame: u32) -> Self {
        assert!(!frames.is_empty());
        Self { frames, ticks_per_frame: ticks_per_frame.max(1), tick: 0 }
    }
}

impl Behavior for Cycle {
    fn before_draw(&mut self, state: &mut SpriteState) {
        let idx = (self.tick / self.ticks_per_frame) as usize % self.frames.len();
        state.tex = self.frames[idx];
        self.tick = self.tick.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn cycle_advances_frames() {
        let mut sprite = Sprite::new(vec2(0.0, 0.0), 5, Box::new(Cycle::new(vec![5, 6], 2)));
        let mut seen = Vec::new();
        for _ in 0..6 {
            let Sprite { state, behavior } = &mut sprite;
            behavior.before_draw(state);
            seen.push(state.tex);
            behavior.after_draw(state);
        }
        assert_eq!(seen, vec![5, 5, 6, 6, 5, 5]);
    }

    #[test]
    fn still_sprites_are_not_damageable() {
        let mut sprite = Sprite::still(vec2(0.0, 0.0), 1);
        assert!(sprite.behavior.as_damageable().is_none());
    }

    struct Dummy {
        hp: i32,
    }
    impl Damageable for Dummy {
        fn take_damage(&mut self, amount: i32) {
            self.hp -= amount;
        }
        fn health(&self) -> i32 {
            self.hp
        }
    }
    impl Behavior for Dummy {
        fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
            Some(self)
        }
    }

    #[test]
    fn damageable_facet_routes_damage() {
        let mut sprite = Sprite::new(vec2(0.0, 0.0), 1, Box::new(Dummy { hp: 10 }));
        let facet = sprite.behavior.as_damageable().unwrap();
        facet.take_damage(4);
        assert_eq!(facet.health(), 6);
    }
}
