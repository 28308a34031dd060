use super::{generate, GalaxyParameters, PointCloud};

/// Where installed point clouds live while they are drawn.
pub trait SceneGraph {
    type Handle;

    /// Publishes a finished cloud and returns the handle that owns its resources.
    fn add(&mut self, cloud: PointCloud, params: &GalaxyParameters) -> Self::Handle;

    /// Takes the cloud out of the scene and releases everything the handle owns.
    fn remove(&mut self, handle: Self::Handle);
}

/// Holds at most one installed cloud handle.
pub struct CloudSlot<H> {
    installed: Option<H>,
    generation: u32,
}

impl<H> Default for CloudSlot<H> {
    fn default() -> Self {
        Self {
            installed: None,
            generation: 0,
        }
    }
}

impl<H> CloudSlot<H> {
    pub fn installed(&self) -> Option<&H> {
        self.installed.as_ref()
    }

    /// Number of clouds installed over the lifetime of the slot
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Removes the installed cloud from the scene, if any. Returns whether something was released.
    pub fn release<S>(&mut self, scene: &mut S) -> bool
    where
        S: SceneGraph<Handle = H>,
    {
        match self.installed.take() {
            Some(handle) => {
                scene.remove(handle);
                true
            }
            None => false,
        }
    }

    /// Publishes `cloud` into the emptied slot. Any previous handle is released first.
    pub fn install<S>(&mut self, scene: &mut S, cloud: PointCloud, params: &GalaxyParameters)
    where
        S: SceneGraph<Handle = H>,
    {
        self.release(scene);
        self.installed = Some(scene.add(cloud, params));
        self.generation += 1;
    }
}

/// Replaces the installed galaxy with a fresh one generated from `params`.
///
/// The previous cloud is removed and released before any new buffer is allocated, so the
/// scene never holds two clouds. Returns the number of stars installed.
pub fn regenerate<S: SceneGraph>(
    params: &GalaxyParameters,
    slot: &mut CloudSlot<S::Handle>,
    scene: &mut S,
) -> usize {
    regenerate_with(params, slot, scene, generate)
}

/// [`regenerate`] with a custom point source, e.g. a seeded generator.
pub fn regenerate_with<S, F>(
    params: &GalaxyParameters,
    slot: &mut CloudSlot<S::Handle>,
    scene: &mut S,
    generator: F,
) -> usize
where
    S: SceneGraph,
    F: FnOnce(&GalaxyParameters) -> PointCloud,
{
    slot.release(scene);

    let cloud = generator(params);
    let count = cloud.len();
    slot.install(scene, cloud, params);
    count
}
