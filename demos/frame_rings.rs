use std::sync::Arc;

use bevy::prelude::*;
use bevy_marching_squares::{
    MarchingSquaresPlugin, brightness::average_brightness_grid, field::ScalarField,
    plugin::{MarchingSquaresConfig, MarchingSquaresSet},
};

const FRAME: usize = 480;
const GRID: usize = 12;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, MarchingSquaresPlugin::default()))
        .add_systems(Startup, setup)
        .add_systems(Update, capture_frame.before(MarchingSquaresSet::Spawn))
        .add_systems(Update, tint_tiles.after(capture_frame))
        .run();
}

/// One averaged cell of the frame, drawn behind the contours.
#[derive(Component)]
struct Tile {
    row: usize,
    col: usize,
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    let cell = FRAME as f32 / GRID as f32;
    let half = FRAME as f32 / 2.0;
    commands.spawn((
        ScalarField::new(GRID, GRID)
            .with_cell_size(cell)
            .with_threshold(128.0),
        Transform::from_xyz(-half, half, 0.0),
    ));

    for row in 0..GRID {
        for col in 0..GRID {
            commands.spawn((
                Tile { row, col },
                Sprite::from_color(Color::BLACK, Vec2::splat(cell)),
                Transform::from_xyz(
                    -half + (col as f32 + 0.5) * cell,
                    half - (row as f32 + 0.5) * cell,
                    -1.0,
                ),
            ));
        }
    }
}

/// Renders a synthetic RGBA frame with a moving light spot and averages it into the field,
/// the way a webcam frame would be downsampled.
fn capture_frame(
    time: Res<Time>,
    mut pixels: Local<Vec<u8>>,
    mut query: Query<&mut ScalarField>,
) {
    let t = time.elapsed_secs();
    let spot = Vec2::new(
        FRAME as f32 * (0.5 + 0.3 * t.cos()),
        FRAME as f32 * (0.5 + 0.3 * (t * 0.7).sin()),
    );

    pixels.clear();
    pixels.reserve(FRAME * FRAME * 4);
    for y in 0..FRAME {
        for x in 0..FRAME {
            let d = Vec2::new(x as f32, y as f32).distance(spot);
            let b = (255.0 - d * 0.9).clamp(0.0, 255.0) as u8;
            pixels.extend_from_slice(&[b, b / 2 + 64, 255 - b, 255]);
        }
    }

    let grid = match average_brightness_grid(&pixels, FRAME, FRAME, GRID, true) {
        Ok(grid) => grid,
        Err(err) => {
            bevy::log::error!("could not average frame: {err}");
            return;
        }
    };

    for mut field in query.iter_mut() {
        *field = field.clone().with_values(Arc::clone(&grid.values));
    }
}

/// Shades each tile with its grey level, then applies forming and the duotone filter.
fn tint_tiles(
    config: Res<MarchingSquaresConfig>,
    fields: Query<&ScalarField, Changed<ScalarField>>,
    mut tiles: Query<(&Tile, &mut Sprite)>,
) {
    let Some(field) = fields.iter().next() else {
        return;
    };

    let tints = config.duotone.cell_tints(field, field.threshold, config.mix);
    for (tile, mut sprite) in tiles.iter_mut() {
        let Some(b) = field.get(tile.row, tile.col) else {
            continue;
        };
        let grey = b / 255.0;
        let base = Srgba::new(grey, grey, grey, 1.0);
        sprite.color = tints[[tile.row, tile.col]].apply(base).into();
    }
}
