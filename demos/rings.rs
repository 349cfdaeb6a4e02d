use bevy::prelude::*;
use bevy_marching_squares::{MarchingSquaresPlugin, field::ScalarField};

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, MarchingSquaresPlugin::default()))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    bevy::log::info!("Rings Example");

    commands.spawn(Camera2d);

    const SIZE: usize = 24;
    const CELL: f32 = 20.0;

    let function = |row: f32, col: f32| {
        let distance = (row - 12.0 * CELL).hypot(col - 12.0 * CELL) / CELL;
        255.0 - distance * 18.0
    };

    let half = SIZE as f32 * CELL / 2.0;
    commands.spawn((
        ScalarField::new(SIZE, SIZE)
            .with_cell_size(CELL)
            .with_threshold(200.0)
            .fill(&function),
        Transform::from_xyz(-half, half, 0.0),
    ));
}
