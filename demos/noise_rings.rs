use bevy::prelude::*;
use bevy_marching_squares::{MarchingSquaresPlugin, field::ScalarField};
use noiz::prelude::*;

type FieldNoise = Noise<
    LayeredNoise<
        Normed<f32>,
        Persistence,
        Octave<MixCellGradients<OrthoGrid, Smoothstep, QuickGradients>>,
    >,
>;

const SIZE: usize = 48;
const CELL: f32 = 12.0;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, MarchingSquaresPlugin::default()))
        .add_systems(Startup, setup)
        .add_systems(Update, animate_field)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    let half = SIZE as f32 * CELL / 2.0;
    commands.spawn((
        ScalarField::new(SIZE, SIZE)
            .with_cell_size(CELL)
            .with_threshold(160.0),
        Transform::from_xyz(-half, half, 0.0),
    ));
}

/// Resamples the noise at a slowly moving depth so the rings drift every frame.
fn animate_field(
    time: Res<Time>,
    mut noise: Local<FieldNoise>,
    mut query: Query<&mut ScalarField>,
) {
    noise.set_frequency(0.08);
    let depth = time.elapsed_secs() * 4.0;

    for mut field in query.iter_mut() {
        field.for_each_sample(|row, col, value| {
            let n: f32 = noise.sample_for(Vec3::new(col as f32, row as f32, depth));
            *value = (n + 1.0) * 127.5;
        });
    }
}
