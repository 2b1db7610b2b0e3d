//! cpu-raster demo
//!
//! Renders a small lit scene with the CPU rasterizer and presents the finished
//! buffer through macroquad.
//!
//! Usage: `cpu-raster [settings.ron] [texture.png]`
//! Arrow keys orbit, W/S zoom, P saves a PNG of the current frame.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::sync::Arc;
use macroquad::prelude::*;
use cpu_raster::config::load_settings;
use cpu_raster::rasterizer::{self as rast, PointLight, RenderSettings};
use cpu_raster::world::{Camera, GeometryCache, Mesh, Renderable};
use cpu_raster::Renderer;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("cpu-raster v{}", VERSION),
        window_width: 960,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_texture_or_checker(path: Option<String>) -> rast::Texture {
    let checker = || {
        rast::Texture::checkerboard(
            64,
            64,
            rast::Color::new(230, 230, 230),
            rast::Color::new(90, 60, 140),
        )
    };

    match path {
        Some(p) => match rast::Texture::from_file(&p) {
            Ok(tex) => tex,
            Err(e) => {
                log::error!("Failed to load {}: {}, using checkerboard", p, e);
                checker()
            }
        },
        None => checker(),
    }
}

fn build_scene(texture: Arc<rast::Texture>) -> Vec<Renderable> {
    let cube = Arc::new(Mesh::cube());
    let floor = Arc::new(Mesh::quad(4.0, 4.0));
    let floor_tex = Arc::new(rast::Texture::checkerboard(
        32,
        32,
        rast::Color::new(120, 120, 120),
        rast::Color::new(60, 60, 60),
    ));

    vec![
        Renderable::new(
            "floor",
            floor,
            rast::Mat4::translation(rast::Vec3::new(0.0, -1.0, 0.0))
                * rast::Mat4::rotation_x(-std::f32::consts::FRAC_PI_2),
        )
        .with_texture(floor_tex),
        Renderable::new("cube", cube.clone(), rast::Mat4::rotation_y(0.6))
            .with_texture(texture.clone()),
        Renderable::new(
            "small cube",
            cube,
            rast::Mat4::translation(rast::Vec3::new(2.5, -0.5, -1.5))
                * rast::Mat4::scale(rast::Vec3::new(0.5, 0.5, 0.5)),
        )
        .with_texture(texture)
        .with_tint(rast::Color::new(255, 180, 120)),
    ]
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);

    let settings = match args.next() {
        Some(path) => match load_settings(&path) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to load settings {}: {}, using defaults", path, e);
                RenderSettings::default()
            }
        },
        None => RenderSettings::default(),
    };

    let mut renderer = match Renderer::new(settings) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    let texture = Arc::new(load_texture_or_checker(args.next()));
    let scene = match GeometryCache::build(build_scene(texture)) {
        Ok(cache) => cache,
        Err(e) => {
            log::error!("Scene setup failed: {}", e);
            return;
        }
    };

    let mut light = PointLight::new(rast::Vec3::new(3.0, 4.0, 4.0), 1.0, rast::Color::WHITE, 6.0);
    let aspect = renderer.settings().aspect();

    let mut yaw: f32 = 0.4;
    let mut pitch: f32 = 0.35;
    let mut distance: f32 = 7.0;

    log::info!("=== cpu-raster ===");

    loop {
        let dt = get_frame_time();
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_down(KeyCode::Left) {
            yaw -= dt * 1.5;
        }
        if is_key_down(KeyCode::Right) {
            yaw += dt * 1.5;
        }
        if is_key_down(KeyCode::Up) {
            pitch = (pitch + dt).min(1.4);
        }
        if is_key_down(KeyCode::Down) {
            pitch = (pitch - dt).max(-1.4);
        }
        if is_key_down(KeyCode::W) {
            distance = (distance - dt * 4.0).max(2.5);
        }
        if is_key_down(KeyCode::S) {
            distance = (distance + dt * 4.0).min(30.0);
        }

        let eye = rast::Vec3::new(
            distance * pitch.cos() * yaw.sin(),
            distance * pitch.sin(),
            distance * pitch.cos() * yaw.cos(),
        );
        let camera = Camera::look_at(
            eye,
            rast::Vec3::ZERO,
            rast::Vec3::UP,
            60f32.to_radians(),
            aspect,
            0.1,
            100.0,
        );

        // light rides above the camera
        light.set_position(eye + rast::Vec3::new(0.0, 2.0, 0.0));

        let stats = renderer.render_frame(&camera, &scene, &light);
        let fb = renderer.buffer();

        if is_key_pressed(KeyCode::P) {
            if let Err(e) = fb.save_png("frame.png") {
                log::error!("Failed to save frame: {}", e);
            }
        }

        // Present the frame, scaled to fit with nearest filtering
        let texture = Texture2D::from_rgba8(fb.width() as u16, fb.height() as u16, &fb.to_top_down());
        texture.set_filter(FilterMode::Nearest);

        let (screen_w, screen_h) = (screen_width(), screen_height());
        let fb_aspect = fb.width() as f32 / fb.height() as f32;
        let (draw_w, draw_h) = if fb_aspect > screen_w / screen_h {
            (screen_w, screen_w / fb_aspect)
        } else {
            (screen_h * fb_aspect, screen_h)
        };

        clear_background(Color::from_rgba(30, 30, 35, 255));
        draw_texture_ex(
            &texture,
            (screen_w - draw_w) * 0.5,
            (screen_h - draw_h) * 0.5,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );
        draw_text(
            &format!(
                "{} objects ({} culled)  {} tris  {} px",
                stats.objects_drawn, stats.objects_culled, stats.triangles_rasterized, stats.pixels_written
            ),
            10.0,
            24.0,
            20.0,
            WHITE,
        );

        next_frame().await;
    }
}
