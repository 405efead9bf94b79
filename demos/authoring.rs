use anyhow::Context;
use macroquad::prelude::*;

use collision_studio::{
    draw_authoring_surface, fit_surface, DirStore, Editor, EditorMode, DEFAULT_SURFACE_FRACTION,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Collision Authoring".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

async fn setup() -> anyhow::Result<(Texture2D, DirStore)> {
    let background = load_texture("demos/assets/background.png")
        .await
        .context("Loading demos/assets/background.png")?;
    background.set_filter(FilterMode::Linear);

    let store = DirStore::open("collision-data").context("Opening collision-data store")?;
    Ok((background, store))
}

// Keys: 1 select, 2 rect, 3 polygon, 4 circle, Enter finish polygon,
// Delete remove selection, C clear (twice), G grid, L panel, S save.
#[macroquad::main(window_conf)]
async fn main() {
    let map_name = std::env::args().nth(1).unwrap_or_else(|| "demo".to_owned());
    let (background, mut store) = setup().await.expect("Failed to set up authoring demo");
    let mut editor = Editor::open(&store, &map_name);

    loop {
        clear_background(DARKGRAY);

        let layout = fit_surface(
            background.width(),
            background.height(),
            screen_width(),
            screen_height(),
            DEFAULT_SURFACE_FRACTION,
        );

        if is_key_pressed(KeyCode::Key1) {
            editor.set_mode(EditorMode::Select);
        }
        if is_key_pressed(KeyCode::Key2) {
            editor.set_mode(EditorMode::DrawRect);
        }
        if is_key_pressed(KeyCode::Key3) {
            editor.set_mode(EditorMode::DrawPolygon);
        }
        if is_key_pressed(KeyCode::Key4) {
            editor.set_mode(EditorMode::DrawCircle);
        }
        if is_key_pressed(KeyCode::Enter) {
            editor.finish_polygon();
        }
        if is_key_pressed(KeyCode::Delete) || is_key_pressed(KeyCode::Backspace) {
            editor.delete_selected();
        }
        if is_key_pressed(KeyCode::C) {
            editor.clear_all();
        }
        if is_key_pressed(KeyCode::G) {
            editor.toggle_grid();
        }
        if is_key_pressed(KeyCode::L) {
            editor.toggle_panel();
        }
        if is_key_pressed(KeyCode::S) {
            // Save failure already lands in the status line.
            let _ = editor.save(&mut store);
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            if let Some(p) = layout.pixel_to_percent(mouse_position().into()) {
                editor.click(p);
            }
        }

        draw_authoring_surface(&editor, &background, &layout);

        draw_text(
            &format!(
                "mode: {:?}   [1] select  [2] rect  [3] polygon  [4] circle  [S] save",
                editor.mode()
            ),
            20.0,
            30.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }
}
