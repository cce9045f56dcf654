use glam::{Vec2, vec2};

use crate::world::sprite::Sprite;
use crate::world::texture::{FaceSet, TextureId};

/// Side length of one grid cell in world units.
pub const TILE: f32 = 64.0;

/// Distance reported for a ray whose search gave up without striking a wall.
/// Far beyond anything a properly enclosed map can produce.
pub const VOID_RANGE: f32 = 64.0 * TILE;

/// Nonzero = wall material, `0` = walkable.
pub type MaterialId = u8;

/// Index into [`GridMap::sprites`], stable for the lifetime of the map
/// unless sprites are removed.
pub type SpriteId = usize;

/// Wrap an angle into `[0, 360)` degrees.
#[inline]
pub fn wrap_deg(a: f32) -> f32 {
    a.rem_euclid(360.0)
}

/// Wrap an angle into `(-180, 180]` degrees.
#[inline]
pub fn wrap_signed_deg(a: f32) -> f32 {
    let a = a.rem_euclid(360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

/// Unit direction of a ray at `angle_deg`.
///
/// Angle 0 points east (+x) and grows counter-clockwise on screen, so the
/// y component is mirrored: grid rows grow downward.
#[inline]
pub fn ray_dir(angle_deg: f32) -> Vec2 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    vec2(c, -s)
}

/// Cardinal face of a wall tile as struck by an incoming ray.
///
/// North is the face with the smaller row coordinate (visually "up" on the
/// 2-D map). The struck face picks which texture of a [`FaceSet`] is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    North,
    East,
    South,
    West,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Wall(MaterialId),
    /// The search exhausted its step bound or left the grid. Only reachable
    /// from an unenclosed map or an origin outside it.
    Void,
}

/// Result of one ray-to-grid intersection query. One per screen column per
/// frame; never persisted.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub kind: HitKind,
    /// Euclidean distance travelled along the ray, world units.
    pub distance: f32,
    pub tile_x: i32,
    pub tile_y: i32,
    pub face: Face,
    /// The querying angle, already wrapped into `[0, 360)`.
    pub angle_deg: f32,
}

/// Things that make a map unusable, all caught at construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map grid is empty")]
    Empty,

    #[error("map row {row} has {got} tiles, expected {want}")]
    RaggedRow { row: usize, got: usize, want: usize },

    /// Every border tile must be a wall, otherwise rays can escape.
    #[error("map border is open at tile ({0}, {1})")]
    OpenBorder(i32, i32),

    #[error("no texture face set for material id {0}")]
    MissingFaceSet(MaterialId),
}

/// Immutable tile grid plus the per-material texture face sets and the
/// sprite collection living inside it.
///
/// World coordinates are continuous; a point maps to the tile at
/// `(x / TILE, y / TILE)` floored.
#[derive(Debug)]
pub struct GridMap {
    tiles: Vec<MaterialId>,
    width: i32,
    height: i32,
    face_sets: Vec<FaceSet>,
    pub sprites: Vec<Sprite>,
}

impl GridMap {
    /// Build a map from `rows` (row-major, top row first) and one [`FaceSet`]
    /// per distinct nonzero material id, indexed by `id - 1`.
    ///
    /// Fails fast on a ragged or empty grid, an unenclosed border, or a
    /// material with no face set — silent rendering artifacts are worse
    /// than a construction error.
    pub fn new(
        rows: Vec<Vec<MaterialId>>,
        face_sets: Vec<FaceSet>,
        sprites: Vec<Sprite>,
    ) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(MapError::RaggedRow { row, got: r.len(), want: width });
            }
        }

        let map = Self {
            tiles: rows.into_iter().flatten().collect(),
            width: width as i32,
            height: height as i32,
            face_sets,
            sprites,
        };

        for ty in 0..map.height {
            for tx in 0..map.width {
                let border =
                    tx == 0 || ty == 0 || tx == map.width - 1 || ty == map.height - 1;
                let material = map.tile(tx, ty);
                if border && material == 0 {
                    return Err(MapError::OpenBorder(tx, ty));
                }
                if material != 0 && map.face_sets.get(material as usize - 1).is_none() {
                    return Err(MapError::MissingFaceSet(material));
                }
            }
        }
        Ok(map)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Material at tile `(tx, ty)`; outside the grid reads as empty.
    #[inline]
    pub fn tile(&self, tx: i32, ty: i32) -> MaterialId {
        if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
            return 0;
        }
        self.tiles[(ty * self.width + tx) as usize]
    }

    /// Movement-validity predicate for the player collaborator. The renderer
    /// itself never enforces collision.
    pub fn can_enter(&self, pos: Vec2) -> bool {
        let tx = (pos.x / TILE).floor() as i32;
        let ty = (pos.y / TILE).floor() as i32;
        tx >= 0 && ty >= 0 && tx < self.width && ty < self.height && self.tile(tx, ty) == 0
    }

    /// Texture for a wall hit, selected by material and struck face.
    ///
    /// Only meaningful for `HitKind::Wall`; a void hit resolves to the face
    /// set of material 1 if present (callers skip drawing voids anyway).
    pub fn texture_for(&self, hit: &RayHit) -> TextureId {
        let material = match hit.kind {
            HitKind::Wall(m) => m,
            HitKind::Void => 1,
        };
        self.face_sets[material as usize - 1].face(hit.face)
    }

    /// Nearest wall intersection strictly ahead along the ray.
    ///
    /// Classic grid traversal: repeatedly advance to whichever grid-line
    /// crossing (vertical or horizontal) comes next, test the tile entered,
    /// stop at the first nonzero one. The axis crossed last determines the
    /// struck face. Axis-parallel rays get an infinite crossing cost on the
    /// degenerate axis and are never stepped there, so no division by zero.
    ///
    /// A ray that leaves the grid or exhausts its step bound yields a
    /// synthetic [`HitKind::Void`] at [`VOID_RANGE`] instead of looping;
    /// one bad column must not stall the frame.
    pub fn cast_ray(&self, origin: Vec2, angle_deg: f32) -> RayHit {
        let angle_deg = wrap_deg(angle_deg);
        let dir = ray_dir(angle_deg);

        // Work in tile units; scale distances back by TILE on exit.
        let fx = origin.x / TILE;
        let fy = origin.y / TILE;
        let mut tx = fx.floor() as i32;
        let mut ty = fy.floor() as i32;

        let delta_x = if dir.x == 0.0 { f32::INFINITY } else { (1.0 / dir.x).abs() };
        let delta_y = if dir.y == 0.0 { f32::INFINITY } else { (1.0 / dir.y).abs() };

        let (step_x, mut side_x) = if dir.x < 0.0 {
            (-1, (fx - tx as f32) * delta_x)
        } else {
            (1, (tx as f32 + 1.0 - fx) * delta_x)
        };
        let (step_y, mut side_y) = if dir.y < 0.0 {
            (-1, (fy - ty as f32) * delta_y)
        } else {
            (1, (ty as f32 + 1.0 - fy) * delta_y)
        };

        let max_steps = 2 * (self.width + self.height) as usize;
        for _ in 0..max_steps {
            let travelled;
            let crossed_vertical;
            if side_x < side_y {
                travelled = side_x;
                side_x += delta_x;
                tx += step_x;
                crossed_vertical = true;
            } else {
                travelled = side_y;
                side_y += delta_y;
                ty += step_y;
                crossed_vertical = false;
            }

            let material = self.tile(tx, ty);
            if material != 0 {
                let face = match (crossed_vertical, step_x > 0, step_y > 0) {
                    (true, true, _) => Face::West,
                    (true, false, _) => Face::East,
                    (false, _, true) => Face::North,
                    (false, _, false) => Face::South,
                };
                return RayHit {
                    kind: HitKind::Wall(material),
                    distance: travelled * TILE,
                    tile_x: tx,
                    tile_y: ty,
                    face,
                    angle_deg,
                };
            }

            if tx < 0 || ty < 0 || tx >= self.width || ty >= self.height {
                break;
            }
        }

        RayHit {
            kind: HitKind::Void,
            distance: VOID_RANGE,
            tile_x: tx,
            tile_y: ty,
            face: Face::North,
            angle_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::texture::FaceSet;

    fn one_face_set() -> Vec<FaceSet> {
        vec![FaceSet { north: 1, east: 2, south: 3, west: 4 }]
    }

    /// 8x8 enclosed room of material 1, interior empty.
    fn room() -> GridMap {
        let mut rows = vec![vec![1u8; 8]];
        for _ in 0..6 {
            rows.push(vec![1, 0, 0, 0, 0, 0, 0, 1]);
        }
        rows.push(vec![1u8; 8]);
        GridMap::new(rows, one_face_set(), Vec::new()).unwrap()
    }

    #[test]
    fn rejects_empty_and_ragged() {
        assert_eq!(
            GridMap::new(Vec::new(), one_face_set(), Vec::new()).unwrap_err(),
            MapError::Empty
        );
        let rows = vec![vec![1, 1, 1], vec![1, 1], vec![1, 1, 1]];
        assert_eq!(
            GridMap::new(rows, one_face_set(), Vec::new()).unwrap_err(),
            MapError::RaggedRow { row: 1, got: 2, want: 3 }
        );
    }

    #[test]
    fn rejects_open_border() {
        let rows = vec![vec![1, 1, 1], vec![1, 0, 0], vec![1, 1, 1]];
        assert_eq!(
            GridMap::new(rows, one_face_set(), Vec::new()).unwrap_err(),
            MapError::OpenBorder(2, 1)
        );
    }

    #[test]
    fn rejects_missing_face_set() {
        let rows = vec![vec![1, 2, 1], vec![1, 0, 1], vec![1, 1, 1]];
        assert_eq!(
            GridMap::new(rows, one_face_set(), Vec::new()).unwrap_err(),
            MapError::MissingFaceSet(2)
        );
    }

    #[test]
    fn axis_parallel_rays_hit_the_walls() {
        let map = room();
        let origin = vec2(96.0, 96.0); // centre of tile (1,1)

        // East: empty tiles up to column 7.
        let hit = map.cast_ray(origin, 0.0);
        assert_eq!(hit.kind, HitKind::Wall(1));
        assert_eq!((hit.tile_x, hit.tile_y), (7, 1));
        assert_eq!(hit.face, Face::West);
        assert!((hit.distance - 352.0).abs() < 1e-3);

        // North (visually up, decreasing row).
        let hit = map.cast_ray(origin, 90.0);
        assert_eq!((hit.tile_x, hit.tile_y), (1, 0));
        assert_eq!(hit.face, Face::South);
        assert!((hit.distance - 32.0).abs() < 1e-3);

        // West.
        let hit = map.cast_ray(origin, 180.0);
        assert_eq!((hit.tile_x, hit.tile_y), (0, 1));
        assert_eq!(hit.face, Face::East);
        assert!((hit.distance - 32.0).abs() < 1e-3);

        // South (row grows downward).
        let hit = map.cast_ray(origin, 270.0);
        assert_eq!((hit.tile_x, hit.tile_y), (1, 7));
        assert_eq!(hit.face, Face::North);
        assert!((hit.distance - 352.0).abs() < 1e-3);
    }

    /// Brute-force simulation: march the ray in tiny steps and report the
    /// first nonzero tile reached.
    fn march(map: &GridMap, origin: Vec2, angle_deg: f32) -> (MaterialId, f32) {
        let dir = ray_dir(angle_deg);
        let step = 0.05;
        let mut t = step;
        loop {
            let p = origin + dir * t;
            let m = map.tile((p.x / TILE).floor() as i32, (p.y / TILE).floor() as i32);
            if m != 0 {
                return (m, t);
            }
            t += step;
            assert!(t < VOID_RANGE, "marched out of an enclosed map");
        }
    }

    #[test]
    fn intersection_matches_brute_force_march() {
        let map = room();
        let origins = [vec2(96.0, 96.0), vec2(200.0, 333.0), vec2(430.5, 120.25)];
        for origin in origins {
            for half in 0..720 {
                let angle = half as f32 * 0.5;
                let hit = map.cast_ray(origin, angle);
                let HitKind::Wall(material) = hit.kind else {
                    panic!("void hit inside enclosed map at angle {angle}");
                };
                let (want_material, want_dist) = march(&map, origin, angle);
                assert_eq!(material, want_material, "angle {angle}");
                assert!(hit.distance > 0.0);
                assert!(
                    (hit.distance - want_dist).abs() < 0.1,
                    "angle {angle}: {} vs {}",
                    hit.distance,
                    want_dist
                );
            }
        }
    }

    #[test]
    fn ray_from_outside_degrades_to_void() {
        let map = room();
        let hit = map.cast_ray(vec2(-1000.0, -1000.0), 180.0);
        assert_eq!(hit.kind, HitKind::Void);
        assert_eq!(hit.distance, VOID_RANGE);
    }

    #[test]
    fn can_enter_respects_walls_and_bounds() {
        let map = room();
        assert!(map.can_enter(vec2(96.0, 96.0)));
        assert!(!map.can_enter(vec2(32.0, 32.0))); // border wall
        assert!(!map.can_enter(vec2(-5.0, 96.0)));
    }

    #[test]
    fn angle_wrapping() {
        assert_eq!(wrap_deg(360.0), 0.0);
        assert_eq!(wrap_deg(-90.0), 270.0);
        assert_eq!(wrap_signed_deg(270.0), -90.0);
        assert_eq!(wrap_signed_deg(180.0), 180.0);
        let a = map_hit_angle(725.5);
        assert!((a - 5.5).abs() < 1e-4);
    }

    fn map_hit_angle(angle: f32) -> f32 {
        room().cast_ray(vec2(96.0, 96.0), angle).angle_deg
    }
}
