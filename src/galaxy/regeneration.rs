use super::{
    generate_with_rng, regenerate, regenerate_with, CloudSlot, GalaxyParameters, PointCloud,
    SceneGraph,
};
use crate::graphics::{build_points_mesh, GalaxyPointsMaterial};
use bevy::platform::time::Instant;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use rand::{rngs::StdRng, SeedableRng};

pub struct RegenerationPlugin;

impl Plugin for RegenerationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RegenerateGalaxy>()
            .init_resource::<GalaxySlot>()
            .init_resource::<GalaxySeed>()
            .add_systems(Startup, request_initial_galaxy)
            .add_systems(Update, regenerate_galaxy_system);
    }
}

/// Asks for the galaxy to be rebuilt from the current parameters.
/// Sent once per committed edit, never for intermediate values.
#[derive(Event, Default, Debug, Clone, Copy)]
pub struct RegenerateGalaxy;

/// Marks the entity drawing the installed point cloud
#[derive(Component, Default)]
pub struct GalaxyPoints;

/// Everything owned by one installed galaxy
#[derive(Debug)]
pub struct InstalledGalaxy {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<GalaxyPointsMaterial>,
}

#[derive(Resource, Default, Deref, DerefMut)]
pub struct GalaxySlot(pub CloudSlot<InstalledGalaxy>);

/// When set, every regeneration draws from an rng seeded with this value, so the same
/// parameters always give the same galaxy. Unseeded by default.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct GalaxySeed(pub Option<u64>);

/// Scene graph backed by the ECS and the mesh/material asset stores.
pub struct EcsScene<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<GalaxyPointsMaterial>,
}

impl SceneGraph for EcsScene<'_, '_, '_> {
    type Handle = InstalledGalaxy;

    fn add(&mut self, cloud: PointCloud, params: &GalaxyParameters) -> InstalledGalaxy {
        if cloud.is_empty() {
            warn!("Installing an empty galaxy");
        }
        debug!(
            "Uploading {} position and {} color floats",
            cloud.flat_positions().len(),
            cloud.flat_colors().len()
        );
        let mesh = self.meshes.add(build_points_mesh(&cloud));
        let material = self.materials.add(GalaxyPointsMaterial::new(params));
        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                GalaxyPoints,
                NoFrustumCulling,
            ))
            .id();

        InstalledGalaxy {
            entity,
            mesh,
            material,
        }
    }

    fn remove(&mut self, handle: InstalledGalaxy) {
        self.commands.entity(handle.entity).despawn();
        self.meshes.remove(&handle.mesh);
        self.materials.remove(&handle.material);
    }
}

fn request_initial_galaxy(mut requests: EventWriter<RegenerateGalaxy>) {
    requests.write(RegenerateGalaxy);
}

/// Rebuilds the galaxy at most once per frame, however many commits arrived.
fn regenerate_galaxy_system(
    mut commands: Commands,
    mut requests: EventReader<RegenerateGalaxy>,
    params: Res<GalaxyParameters>,
    seed: Res<GalaxySeed>,
    mut slot: ResMut<GalaxySlot>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
) {
    let pending = requests.read().count();
    if pending == 0 {
        return;
    }

    let params = params.get();
    let start = Instant::now();
    let mut scene = EcsScene {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
    };
    let count = match seed.0 {
        Some(seed) => regenerate_with(&params, &mut slot.0, &mut scene, |p| {
            generate_with_rng(p, &mut StdRng::seed_from_u64(seed))
        }),
        None => regenerate(&params, &mut slot.0, &mut scene),
    };

    debug!("{pending} regeneration request(s) coalesced");
    if let Some(installed) = slot.installed() {
        debug!("Galaxy installed on {}", installed.entity);
    }
    info!(
        "Galaxy #{} generated: {count} stars, {} arms in {:.1} ms",
        slot.generation(),
        params.branches,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{GalaxyPlugin, ParameterEdit};
    use bevy::asset::AssetPlugin;

    fn headless_app(count: u32) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), GalaxyPlugin))
            .init_asset::<Mesh>()
            .init_asset::<GalaxyPointsMaterial>()
            .insert_resource(GalaxyParameters {
                count,
                ..default()
            });
        app
    }

    fn installed_entities(app: &mut App) -> Vec<Entity> {
        app.world_mut()
            .query_filtered::<Entity, With<GalaxyPoints>>()
            .iter(app.world())
            .collect()
    }

    #[test]
    fn startup_installs_the_first_galaxy() {
        let mut app = headless_app(300);
        app.update();

        let installed = installed_entities(&mut app);
        assert_eq!(installed.len(), 1);

        let slot = app.world().resource::<GalaxySlot>();
        assert_eq!(slot.generation(), 1);
        assert_eq!(slot.installed().map(|g| g.entity), Some(installed[0]));

        let mesh = app.world().resource::<Assets<Mesh>>().iter().next().unwrap().1;
        assert_eq!(mesh.count_vertices(), 300 * 4);
    }

    #[test]
    fn no_request_means_no_regeneration() {
        let mut app = headless_app(50);
        app.update();
        let first = installed_entities(&mut app);

        for _ in 0..5 {
            app.update();
        }

        assert_eq!(installed_entities(&mut app), first);
        assert_eq!(app.world().resource::<GalaxySlot>().generation(), 1);
    }

    #[test]
    fn commit_replaces_the_installed_galaxy() {
        let mut app = headless_app(50);
        app.update();
        let first = installed_entities(&mut app)[0];

        app.world_mut()
            .resource_mut::<GalaxyParameters>()
            .set(ParameterEdit::Count(120));
        app.world_mut().send_event(RegenerateGalaxy);
        app.update();

        let installed = installed_entities(&mut app);
        assert_eq!(installed.len(), 1);
        assert_ne!(installed[0], first);
        assert!(app.world().get_entity(first).is_err());

        // the old mesh and material were released, not left behind
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(
            app.world().resource::<Assets<GalaxyPointsMaterial>>().len(),
            1
        );
        let mesh = app.world().resource::<Assets<Mesh>>().iter().next().unwrap().1;
        assert_eq!(mesh.count_vertices(), 120 * 4);
    }

    #[test]
    fn seeded_galaxies_repeat() {
        let mut app = headless_app(64);
        app.insert_resource(GalaxySeed(Some(9)));
        app.update();

        let positions = |app: &App| {
            let mesh = app.world().resource::<Assets<Mesh>>().iter().next().unwrap().1;
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
                .and_then(|values| values.as_float3())
                .unwrap()
                .to_vec()
        };
        let first = positions(&app);

        app.world_mut().send_event(RegenerateGalaxy);
        app.update();

        assert_eq!(positions(&app), first);
    }

    #[test]
    fn burst_of_commits_regenerates_once() {
        let mut app = headless_app(50);
        app.update();

        for _ in 0..3 {
            app.world_mut().send_event(RegenerateGalaxy);
        }
        app.update();

        assert_eq!(app.world().resource::<GalaxySlot>().generation(), 2);
        assert_eq!(installed_entities(&mut app).len(), 1);
    }
}
