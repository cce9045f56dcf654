//! Playable first-person demo.
//!
//! ```bash
//! cargo run --release -- --width 640 --height 480
//! ```
//!
//! Arrow keys move and turn, Q/E shift the eye height, Space fires at
//! whatever the centre column says is under the crosshair, Escape quits.

use clap::Parser;
use glam::vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use wolfcast::renderer::{Layer, Rgba, Software, Surface};
use wolfcast::scene::{Scene, ViewConfig};
use wolfcast::world::{
    Behavior, Camera, Cycle, Damageable, FaceSet, GridMap, Sprite, SpriteState, Texture,
    TextureBank, TextureId,
};

const TURN_STEP: f32 = 4.0; // degrees per frame held
const MOVE_STEP: f32 = 8.0; // world units per frame held
const SHOT_DAMAGE: i32 = 35;

#[derive(Parser)]
#[command(about = "Wolfenstein-style raycaster demo")]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut bank = TextureBank::default_with_checker();
    let backdrop = insert_backdrop(&mut bank, args.width, args.height)?;
    let face_sets = insert_walls(&mut bank)?;
    let sprites = build_sprites(&mut bank)?;
    let weapon = bank.insert("HAND", hand_texture())?;

    let mut map = GridMap::new(demo_grid(), face_sets, sprites)?;

    let mut camera = Camera::new(vec2(96.0, 96.0), 0.0, 0.5);
    let mut scene = Scene::new(ViewConfig::new(args.width, args.height, args.fov), backdrop);
    let mut renderer = Software::new(args.width, args.height);

    let mut win = Window::new(
        "wolfcast",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(30);

    println!("arrows: move/turn  q/e: eye height  space: fire  esc: quit");

    let mut tick = 0u32;
    while win.is_open() && !win.is_key_down(Key::Escape) {
        if win.is_key_down(Key::Left) {
            camera.turn(TURN_STEP);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-TURN_STEP);
        }
        if win.is_key_down(Key::Up) {
            let target = camera.walk_target(MOVE_STEP);
            if map.can_enter(target) {
                camera.step_to(target);
            }
        }
        if win.is_key_down(Key::Down) {
            let target = camera.walk_target(-MOVE_STEP);
            if map.can_enter(target) {
                camera.step_to(target);
            }
        }
        if win.is_key_down(Key::Q) {
            camera.set_eye_height(camera.eye_height() + 0.02);
        }
        if win.is_key_down(Key::E) {
            camera.set_eye_height(camera.eye_height() - 0.02);
        }

        let fired = win.is_key_pressed(Key::Space, KeyRepeat::No);
        if fired {
            fire(&mut map, &scene, args.width / 2);
        }

        renderer.begin_frame();
        scene.render(&mut map, &camera, &bank, &mut renderer);

        // foreground overlay: drawn after the scene, ignores depth
        let bob = ((tick as f32) * 0.2).cos() * 4.0;
        let wx = (args.width / 2 - 32) as f32;
        let wy = args.height as f32 - 64.0 + bob + if fired { -8.0 } else { 0.0 };
        renderer.draw_image(&bank, weapon, wx, wy, Layer::Weapon);

        renderer.end_frame(|fb, w, h| {
            win.update_with_buffer(fb, w, h).expect("window gone");
        });
        tick = tick.wrapping_add(1);
    }

    Ok(())
}

/// Resolve the crosshair column through the owner buffer and route damage
/// through the explicit capability facet. Removal of the dead is our
/// policy, not the renderer's.
fn fire(map: &mut GridMap, scene: &Scene, column: usize) {
    let Some(id) = scene.sprite_at(column) else {
        return;
    };
    let Some(target) = map.sprites[id].behavior.as_damageable() else {
        return;
    };
    target.take_damage(SHOT_DAMAGE);
    println!("hit sprite {id}, {} hp left", target.health());
    if target.health() <= 0 {
        map.sprites.remove(id);
    }
}

/// The classic 8x8 demo layout, top row is (x=0, y=0).
fn demo_grid() -> Vec<Vec<u8>> {
    vec![
        vec![1, 1, 1, 1, 1, 1, 1, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 2, 1, 1, 1],
        vec![1, 0, 0, 0, 0, 1, 0, 1],
        vec![1, 0, 5, 0, 0, 0, 0, 1],
        vec![1, 0, 0, 0, 6, 4, 3, 1],
        vec![1, 0, 0, 0, 0, 0, 0, 1],
        vec![1, 1, 1, 1, 1, 1, 1, 1],
    ]
}

fn shade(color: Rgba, f: f32) -> Rgba {
    let mut out = 0xFF00_0000;
    for shift in [0, 8, 16] {
        let c = ((color >> shift) & 0xFF) as f32 * f;
        out |= (c as u32).min(255) << shift;
    }
    out
}

fn brick(name: &str, base: Rgba, level: f32) -> Texture {
    let mortar = 0xFF_30_30_30;
    Texture::from_fn(name, 64, 64, move |x, y| {
        let row = y / 16;
        let offset = (row % 2) * 16;
        if y % 16 == 0 || (x + offset) % 32 == 0 {
            mortar
        } else {
            shade(base, level)
        }
    })
}

/// One light/dark texture pair per material, light on the north/south
/// faces, dark on east/west, so perpendicular walls read differently.
fn insert_walls(bank: &mut TextureBank) -> anyhow::Result<Vec<FaceSet>> {
    let bases: [(&str, Rgba); 6] = [
        ("BLUE1", 0xFF_3A_5A_C8),
        ("GREY1", 0xFF_8A_8A_8A),
        ("WOOD1", 0xFF_8A_5A_2A),
        ("WOOD2", 0xFF_A0_6A_30),
        ("BLUE2", 0xFF_2A_44_A0),
        ("BLUE3", 0xFF_50_70_E0),
    ];

    let mut sets = Vec::new();
    for (name, base) in bases {
        let light = bank.insert(format!("{name}_L"), brick(name, base, 1.0))?;
        let dark = bank.insert(format!("{name}_D"), brick(name, base, 0.65))?;
        sets.push(FaceSet { north: light, east: dark, south: light, west: dark });
    }
    Ok(sets)
}

fn insert_backdrop(
    bank: &mut TextureBank,
    w: usize,
    h: usize,
) -> anyhow::Result<TextureId> {
    let ceiling = 0xFF_38_38_38;
    let floor = 0xFF_5A_46_32;
    let tex = Texture::from_fn("FLOOR_CEIL", w, h, |_, y| {
        if y < h / 2 { ceiling } else { floor }
    });
    Ok(bank.insert("FLOOR_CEIL", tex)?)
}

/// Transparent-background lamp: thin pole with a glowing head.
fn lamp(name: &str, glow: Rgba) -> Texture {
    Texture::from_fn(name, 64, 64, move |x, y| {
        let dx = x as i32 - 32;
        let dy = y as i32 - 16;
        if dx * dx + dy * dy < 100 {
            glow
        } else if y > 16 && x.abs_diff(32) < 3 {
            0xFF_50_50_50
        } else {
            0
        }
    })
}

/// Transparent-background guard: a blocky silhouette is enough here.
fn guard_frame(name: &str, coat: Rgba) -> Texture {
    Texture::from_fn(name, 64, 64, move |x, y| {
        let torso = (16..48).contains(&x) && (20..56).contains(&y);
        let head = x.abs_diff(32) < 7 && (6..20).contains(&y);
        let legs = (56..64).contains(&y) && ((20..28).contains(&x) || (36..44).contains(&x));
        if torso || legs {
            coat
        } else if head {
            0xFF_D8_A8_78
        } else {
            0
        }
    })
}

fn hand_texture() -> Texture {
    Texture::from_fn("HAND", 64, 64, |x, y| {
        if y > 24 && x.abs_diff(32) < 12 { 0xFF_C8_98_68 } else { 0 }
    })
}

struct Guard {
    hp: i32,
    idle: TextureId,
    hurt: TextureId,
    flash: u8,
}

impl Behavior for Guard {
    fn before_draw(&mut self, state: &mut SpriteState) {
        state.tex = if self.flash > 0 {
            self.flash -= 1;
            self.hurt
        } else {
            self.idle
        };
    }

    fn as_damageable(&mut self) -> Option<&mut dyn Damageable> {
        Some(self)
    }
}

impl Damageable for Guard {
    fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
        self.flash = 6;
    }

    fn health(&self) -> i32 {
        self.hp
    }
}

fn build_sprites(bank: &mut TextureBank) -> anyhow::Result<Vec<Sprite>> {
    let lamp_on = bank.insert("LAMP_ON", lamp("LAMP_ON", 0xFF_FF_E8_90))?;
    let lamp_dim = bank.insert("LAMP_DIM", lamp("LAMP_DIM", 0xFF_C0_A8_58))?;
    let hans_idle = bank.insert("HANS1", guard_frame("HANS1", 0xFF_40_60_40))?;
    let hans_hurt = bank.insert("HANS2", guard_frame("HANS2", 0xFF_90_30_30))?;

    Ok(vec![
        Sprite::new(
            vec2(288.0, 96.0),
            lamp_on,
            Box::new(Cycle::new(vec![lamp_on, lamp_dim], 15)),
        ),
        Sprite::new(
            vec2(224.0, 224.0),
            lamp_on,
            Box::new(Cycle::new(vec![lamp_on, lamp_dim], 15)),
        ),
        Sprite::new(
            vec2(160.0, 160.0),
            hans_idle,
            Box::new(Guard { hp: 100, idle: hans_idle, hurt: hans_hurt, flash: 0 }),
        ),
    ])
}
