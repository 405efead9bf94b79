use anyhow::Context;
use macroquad::prelude::*;

use collision_studio::{
    load_level_colliders, BackgroundGeometry, Collider, ConversionConfig, DirStore,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Collision Runtime".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

const PLAYER_RADIUS: f32 = 12.0;
const PLAYER_SPEED: f32 = 300.0;

async fn setup() -> anyhow::Result<(Texture2D, DirStore)> {
    // Colliders can only be built once the texture is decoded: the display
    // size below depends on its aspect ratio.
    let background = load_texture("demos/assets/background.png")
        .await
        .context("Loading demos/assets/background.png")?;
    let store = DirStore::open("collision-data").context("Opening collision-data store")?;
    Ok((background, store))
}

#[macroquad::main(window_conf)]
async fn main() {
    let map_name = std::env::args().nth(1).unwrap_or_else(|| "demo".to_owned());
    let (background, store) = setup().await.expect("Failed to set up runtime demo");

    // Scale the background to cover the whole screen, anchored at the center.
    let cover = (screen_width() / background.width())
        .max(screen_height() / background.height());
    let bg = BackgroundGeometry::new(
        vec2(screen_width() / 2.0, screen_height() / 2.0),
        background.width() * cover,
        background.height() * cover,
    );

    let colliders = load_level_colliders(&store, &map_name, &bg, &ConversionConfig::default());
    println!("map '{}': {} collider(s)", map_name, colliders.len());

    let mut player = bg.center;

    loop {
        clear_background(BLACK);

        draw_texture_ex(
            &background,
            bg.left(),
            bg.top(),
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(bg.display_w, bg.display_h)),
                ..Default::default()
            },
        );

        let mut dir = Vec2::ZERO;
        if is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) {
            dir.y -= 1.0;
        }
        if is_key_down(KeyCode::S) || is_key_down(KeyCode::Down) {
            dir.y += 1.0;
        }
        if is_key_down(KeyCode::A) || is_key_down(KeyCode::Left) {
            dir.x -= 1.0;
        }
        if is_key_down(KeyCode::D) || is_key_down(KeyCode::Right) {
            dir.x += 1.0;
        }
        if dir != Vec2::ZERO {
            let step = dir.normalize() * PLAYER_SPEED * get_frame_time();
            // Per-axis resolution so the player slides along walls.
            let next_x = vec2(player.x + step.x, player.y);
            if !colliders.overlaps_circle(next_x, PLAYER_RADIUS) {
                player = next_x;
            }
            let next_y = vec2(player.x, player.y + step.y);
            if !colliders.overlaps_circle(next_y, PLAYER_RADIUS) {
                player = next_y;
            }
        }

        for collider in colliders.iter() {
            match collider {
                Collider::Rect { rect, .. } => {
                    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, GREEN);
                }
                Collider::Circle { center, radius, .. } => {
                    draw_circle_lines(center.x, center.y, *radius, 1.0, GREEN);
                }
            }
        }

        draw_circle(player.x, player.y, PLAYER_RADIUS, ORANGE);
        draw_text(
            &format!("WASD to move - {} collider(s)", colliders.len()),
            20.0,
            30.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }
}
