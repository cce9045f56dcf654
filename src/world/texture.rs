// Format-agnostic repository of textures. The rest of the crate interacts
// through `TextureId` only; how pixels got here (decoded asset, procedural
// generator) is the caller's business.

use std::collections::HashMap;

use crate::renderer::Rgba;
use crate::world::grid::Face;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because [`TextureBank::new`] inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (`0xAARRGGBB`) in row-major order.
/// Alpha 0 marks a transparent texel (sprite cut-outs).
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

impl Texture {
    /// Build a `w`x`h` texture by evaluating `f(x, y)` per texel.
    pub fn from_fn<S, F>(name: S, w: usize, h: usize, mut f: F) -> Self
    where
        S: Into<String>,
        F: FnMut(usize, usize) -> Rgba,
    {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                pixels.push(f(x, y));
            }
        }
        Self { name: name.into(), w, h, pixels }
    }

    pub fn solid<S: Into<String>>(name: S, w: usize, h: usize, color: Rgba) -> Self {
        Self { name: name.into(), w, h, pixels: vec![color; w * h] }
    }
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = 0xFF_9F_9F_9F;
        const DARK: Rgba = 0xFF_40_40_40;
        Texture::from_fn("CHECKER", 8, 8, |x, y| {
            if (x ^ y) & 1 == 0 { LIGHT } else { DARK }
        })
    }
}

/// The four wall textures of one material, keyed by the cardinal face the
/// ray struck. Opposite faces usually carry light/dark variants of the same
/// image so perpendicular walls read differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceSet {
    pub north: TextureId,
    pub east: TextureId,
    pub south: TextureId,
    pub west: TextureId,
}

impl FaceSet {
    /// Same texture on all four faces.
    pub fn uniform(tex: TextureId) -> Self {
        Self { north: tex, east: tex, south: tex, west: tex }
    }

    #[inline]
    pub fn face(&self, face: Face) -> TextureId {
        match face {
            Face::North => self.north,
            Face::East => self.east,
            Face::South => self.south,
            Face::West => self.west,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// A cache of textures addressed by stable ids.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard, so lookups can degrade
///   to a visible fallback instead of faulting mid-frame.
///
/// **Thread-safety:** access from a single thread or wrap in `RwLock`;
/// the struct itself is not `Sync`.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback. The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self { by_name, data: vec![missing_tex] }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1 // only the checker
    }

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe borrow: a bad id resolves to the checkerboard. Used on
    /// the per-frame draw path, where a fault must not blank the screen.
    pub fn get(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.data[0])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: Rgba) -> Texture {
        Texture::solid("Dummy", 2, 2, color)
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels[0], 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_degrades_to_checker() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.get(bad).name, "CHECKER");
    }

    #[test]
    fn face_set_lookup() {
        let set = FaceSet { north: 1, east: 2, south: 3, west: 4 };
        assert_eq!(set.face(Face::North), 1);
        assert_eq!(set.face(Face::East), 2);
        assert_eq!(set.face(Face::South), 3);
        assert_eq!(set.face(Face::West), 4);
        assert_eq!(FaceSet::uniform(7).face(Face::East), 7);
    }
}
