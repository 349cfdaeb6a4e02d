use bevy::{
    prelude::*,
    tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future},
};

use crate::{
    duotone::DuotoneStyle,
    field::ScalarField,
    layers::{ContourLayer, LayerAppearance, LayerStyle, build_layers},
    types::{Point, Value},
};

/// System sets for the marching squares pipeline.
///
/// Use these to order your own systems relative to contour generation:
///
/// ```rust,ignore
/// // Read fresh contours before they are drawn:
/// app.add_systems(Update, export_svg.after(MarchingSquaresSet::Generate)
///                                   .before(MarchingSquaresSet::Draw));
/// ```
///
/// ```text
/// MarchingSquaresSet::Spawn  →  [async compute]  →  MarchingSquaresSet::Generate  →  [your systems]  →  MarchingSquaresSet::Draw
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarchingSquaresSet {
    /// Queues changed fields and spawns an async compute task for each of them.
    Spawn,
    /// Polls async tasks and inserts [`ContourLayers`] on completion.
    Generate,
    /// Rebuilds the retained layer gizmos of changed [`ContourLayers`].
    Draw,
}

/// Marker component added to [`ScalarField`] entities whose contours are out of date.
#[derive(Component)]
pub struct QueuedField;

/// Holds the in-flight async compute task for a [`ScalarField`].
#[derive(Component)]
pub struct ContourTask(Task<Vec<ContourLayer>>);

/// Latest contour layers of a [`ScalarField`], in grid units.
#[derive(Component, Debug, Clone, Default, Deref, DerefMut)]
pub struct ContourLayers(pub Vec<ContourLayer>);

/// Child entities holding one retained [`Gizmo`] per contour layer, outermost first.
#[derive(Component, Debug, Default, Deref)]
pub struct LayerGizmos(Vec<Entity>);

/// Runtime configuration for the marching squares pipeline.
///
/// Inserted as a resource by [`MarchingSquaresPlugin`]. The other settings take effect
/// without recomputing contours, but changing `style` or `mix` re-queues every field:
///
/// ```rust,ignore
/// fn fade_out(mut config: ResMut<MarchingSquaresConfig>, time: Res<Time>) {
///     config.mix = (config.mix - time.delta_secs()).max(0.0);
/// }
/// ```
#[derive(Resource)]
pub struct MarchingSquaresConfig {
    /// Maximum number of async contour tasks spawned per frame. Default: `4`.
    pub max_tasks_per_frame: usize,
    /// Layer thresholds and styling.
    pub style: LayerStyle,
    /// Master opacity in `[0, 1]` applied to every layer. Default: `1.0`.
    pub mix: Value,
    /// Per-cell duotone tint and brightness forming, for apps that draw the field itself.
    pub duotone: DuotoneStyle,
    /// Whether the draw system renders layers. Only has an effect when the plugin was
    /// built with [`MarchingSquaresPlugin::draw_gizmos`] enabled.
    pub draw_gizmos: bool,
}

impl Default for MarchingSquaresConfig {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: 4,
            style: LayerStyle::default(),
            mix: 1.0,
            duotone: DuotoneStyle::default(),
            draw_gizmos: true,
        }
    }
}

/// Bevy plugin that drives marching squares contour generation.
///
/// When the `auto_queue` feature is enabled, any [`ScalarField`] added or changed is
/// automatically re-contoured. Extraction runs on Bevy's `AsyncComputeTaskPool`:
///
/// ```text
/// ScalarField added / changed
///   → QueuedField inserted          (MarchingSquaresSet::Spawn)
///   → ContourTask spawned           (MarchingSquaresSet::Spawn)
///   → [async compute runs]
///   → ContourLayers inserted        (MarchingSquaresSet::Generate, once task completes)
///   → [your systems here]
///   → layers drawn as 2D gizmos     (MarchingSquaresSet::Draw)
/// ```
pub struct MarchingSquaresPlugin {
    /// Initial value for [`MarchingSquaresConfig::max_tasks_per_frame`].
    pub max_tasks_per_frame: usize,
    /// Registers the gizmo draw system. Disable for headless apps without `GizmoPlugin`.
    pub draw_gizmos: bool,
}

impl Default for MarchingSquaresPlugin {
    fn default() -> Self {
        Self {
            max_tasks_per_frame: MarchingSquaresConfig::default().max_tasks_per_frame,
            draw_gizmos: true,
        }
    }
}

impl Plugin for MarchingSquaresPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MarchingSquaresConfig {
            max_tasks_per_frame: self.max_tasks_per_frame,
            draw_gizmos: self.draw_gizmos,
            ..Default::default()
        });

        #[cfg(feature = "auto_queue")]
        {
            app.configure_sets(
                Update,
                (
                    MarchingSquaresSet::Spawn,
                    MarchingSquaresSet::Generate,
                    MarchingSquaresSet::Draw,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (queue_changed_fields, spawn_contour_tasks)
                        .chain()
                        .in_set(MarchingSquaresSet::Spawn),
                    poll_contour_tasks.in_set(MarchingSquaresSet::Generate),
                ),
            );

            if self.draw_gizmos {
                app.add_systems(Update, draw_contour_layers.in_set(MarchingSquaresSet::Draw));
            }
        }
    }
}

/// Inserts [`QueuedField`] on every added or changed [`ScalarField`], or on every field
/// when the layer style or mix of [`MarchingSquaresConfig`] changed.
fn queue_changed_fields(
    mut commands: Commands,
    config: Res<MarchingSquaresConfig>,
    mut contoured_with: Local<Option<(LayerStyle, Value)>>,
    changed: Query<Entity, (Changed<ScalarField>, Without<QueuedField>)>,
    all: Query<Entity, (With<ScalarField>, Without<QueuedField>)>,
) {
    let current = (config.style, config.mix);
    let restyled = config.is_changed() && *contoured_with != Some(current);
    *contoured_with = Some(current);

    let entities: Vec<Entity> = if restyled {
        all.iter().collect()
    } else {
        changed.iter().collect()
    };

    for entity in entities {
        commands.entity(entity).insert(QueuedField);
    }
}

/// Spawns async compute tasks for [`QueuedField`]s, up to [`MarchingSquaresConfig::max_tasks_per_frame`] per frame.
fn spawn_contour_tasks(
    mut commands: Commands,
    config: Res<MarchingSquaresConfig>,
    query: Query<(Entity, &ScalarField), (With<QueuedField>, Without<ContourTask>)>,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for (entity, field) in query.iter().take(config.max_tasks_per_frame) {
        if field.rows() < 2 || field.cols() < 2 {
            log::warn!(
                "scalar field on {entity} is {}x{} and has no cells to contour",
                field.rows(),
                field.cols()
            );
        }

        // Cloning the field only bumps the Arc around its samples.
        let field = field.clone();
        let style = config.style;
        let mix = config.mix;

        let task = task_pool.spawn(async move {
            build_layers(&field, field.threshold, &style, mix)
        });

        tracing::debug!(%entity, "spawned contour task");
        commands
            .entity(entity)
            .remove::<QueuedField>()
            .insert(ContourTask(task));
    }
}

/// Polls in-flight [`ContourTask`]s each frame and inserts [`ContourLayers`] on completion.
///
/// Non-blocking: tasks that haven't finished are skipped and retried next frame.
fn poll_contour_tasks(mut commands: Commands, mut query: Query<(Entity, &mut ContourTask)>) {
    for (entity, mut contour_task) in query.iter_mut() {
        if let Some(layers) = block_on(future::poll_once(&mut contour_task.0)) {
            commands
                .entity(entity)
                .insert(ContourLayers(layers))
                .remove::<ContourTask>();
        }
    }
}

/// Maps a point scaled to pixels into the field's local space: columns go right, rows go down.
#[inline]
fn to_local(p: Point) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

/// Line settings for a layer's gizmo. Each layer keeps its own width.
pub fn layer_line_config(appearance: &LayerAppearance) -> GizmoLineConfig {
    GizmoLineConfig {
        width: appearance.width,
        ..default()
    }
}

/// Builds the retained gizmo geometry of one layer, relative to the field's transform.
pub fn layer_gizmo_asset(layer: &ContourLayer, cell_size: Value) -> GizmoAsset {
    let mut asset = GizmoAsset::new();
    let color = Color::from(layer.appearance.color);
    for segment in layer.scaled_segments(cell_size) {
        asset.line_2d(to_local(segment.start), to_local(segment.end), color);
    }
    asset
}

/// Replaces the layer gizmos of every field whose [`ContourLayers`] changed, outermost layer
/// first. Clears them all while [`MarchingSquaresConfig::draw_gizmos`] is off.
fn draw_contour_layers(
    mut commands: Commands,
    mut gizmo_assets: ResMut<Assets<GizmoAsset>>,
    config: Res<MarchingSquaresConfig>,
    query: Query<(Entity, &ScalarField, Ref<ContourLayers>, Option<&LayerGizmos>)>,
) {
    for (entity, field, layers, drawn) in query.iter() {
        if drawn.is_some() && !layers.is_changed() && !config.is_changed() {
            continue;
        }

        for &child in drawn.into_iter().flat_map(|drawn| drawn.iter()) {
            commands.entity(child).despawn();
        }

        if !config.draw_gizmos {
            commands.entity(entity).insert(LayerGizmos::default());
            continue;
        }

        let children = layers
            .iter()
            .map(|layer| {
                let gizmo = Gizmo {
                    handle: gizmo_assets.add(layer_gizmo_asset(layer, field.cell_size)),
                    line_config: layer_line_config(&layer.appearance),
                    ..default()
                };
                commands.spawn((gizmo, ChildOf(entity))).id()
            })
            .collect();

        tracing::trace!(%entity, layers = layers.len(), "rebuilt layer gizmos");
        commands.entity(entity).insert(LayerGizmos(children));
    }
}
