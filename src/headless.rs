//! GPU-free host: a recording backend, an in-memory surface and a runner
//! that drives the controller from a manual clock.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use log::info;

use crate::core::{
    BackendFactory, GeometryData, GeometryId, LifecycleController, ManualClock, MaterialId,
    RenderBackend, RenderSurface, ResizeSubscription, SurfaceSize, TargetId, TeardownReport,
};
use crate::material::Material;
use crate::scene::{Scene, SceneCounts};

pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Everything the recording backends of one factory did
#[derive(Debug, Default)]
pub struct BackendStats {
    pub backends_created: usize,
    pub backends_disposed: usize,
    pub geometries_created: usize,
    pub materials_created: usize,
    pub geometry_releases: HashMap<GeometryId, usize>,
    pub material_releases: HashMap<MaterialId, usize>,
    pub renders: u64,
    pub last_size: Option<SurfaceSize>,
    pub triangles_uploaded: usize,
    pub points_allocated: usize,
    next_id: u64,
}

impl BackendStats {
    pub fn live_geometries(&self) -> usize {
        self.geometries_created - self.geometry_releases.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials_created - self.material_releases.len()
    }

    /// True when no id was ever released more than once
    pub fn released_at_most_once(&self) -> bool {
        self.geometry_releases.values().all(|&n| n == 1)
            && self.material_releases.values().all(|&n| n == 1)
    }
}

/// Backend that keeps no GPU state, only bookkeeping
pub struct RecordingBackend {
    target: TargetId,
    stats: Rc<RefCell<BackendStats>>,
    geometries: HashSet<GeometryId>,
    materials: HashSet<MaterialId>,
    size: SurfaceSize,
}

impl RecordingBackend {
    pub fn size(&self) -> SurfaceSize {
        self.size
    }
}

impl RenderBackend for RecordingBackend {
    fn target(&self) -> TargetId {
        self.target
    }

    fn create_geometry(&mut self, data: GeometryData<'_>) -> Result<GeometryId> {
        let mut stats = self.stats.borrow_mut();
        match data {
            GeometryData::Mesh(mesh) => {
                if mesh.is_empty() {
                    bail!("refusing to upload an empty mesh");
                }
                stats.triangles_uploaded += mesh.triangle_count();
            }
            GeometryData::Points { count } => stats.points_allocated += count,
        }
        stats.next_id += 1;
        stats.geometries_created += 1;
        let id = GeometryId(stats.next_id);
        self.geometries.insert(id);
        Ok(id)
    }

    fn create_material(&mut self, _material: &Material) -> Result<MaterialId> {
        let mut stats = self.stats.borrow_mut();
        stats.next_id += 1;
        stats.materials_created += 1;
        let id = MaterialId(stats.next_id);
        self.materials.insert(id);
        Ok(id)
    }

    fn release_geometry(&mut self, id: GeometryId) {
        self.geometries.remove(&id);
        *self.stats.borrow_mut().geometry_releases.entry(id).or_default() += 1;
    }

    fn release_material(&mut self, id: MaterialId) {
        self.materials.remove(&id);
        *self.stats.borrow_mut().material_releases.entry(id).or_default() += 1;
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
        self.stats.borrow_mut().last_size = Some(size);
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        for object in scene.objects() {
            if !self.geometries.contains(&object.geometry) {
                bail!("{} references released geometry {:?}", object.label, object.geometry);
            }
            if !self.materials.contains(&object.material) {
                bail!("{} references released material {:?}", object.label, object.material);
            }
        }
        self.stats.borrow_mut().renders += 1;
        Ok(())
    }

    fn dispose(&mut self) {
        self.geometries.clear();
        self.materials.clear();
        self.stats.borrow_mut().backends_disposed += 1;
    }
}

/// Hands out [`RecordingBackend`]s that share one [`BackendStats`]
#[derive(Clone, Default)]
pub struct RecordingFactory {
    stats: Rc<RefCell<BackendStats>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Rc<RefCell<BackendStats>> {
        Rc::clone(&self.stats)
    }
}

impl BackendFactory for RecordingFactory {
    type Backend = RecordingBackend;

    fn create(&mut self, size: SurfaceSize) -> Result<RecordingBackend> {
        let mut stats = self.stats.borrow_mut();
        stats.backends_created += 1;
        stats.last_size = Some(size);
        Ok(RecordingBackend {
            target: TargetId(stats.backends_created as u64),
            stats: Rc::clone(&self.stats),
            geometries: HashSet::new(),
            materials: HashSet::new(),
            size,
        })
    }
}

/// In-memory surface that remembers what was attached to it
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    attached: Vec<TargetId>,
    observing: Option<ResizeSubscription>,
    subscriptions: u64,
}

impl HeadlessSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            attached: Vec::new(),
            observing: None,
            subscriptions: 0,
        }
    }

    pub fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    pub fn attached(&self) -> &[TargetId] {
        &self.attached
    }

    pub fn is_observing(&self) -> bool {
        self.observing.is_some()
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn attach(&mut self, target: TargetId) {
        self.attached.push(target);
    }

    fn detach(&mut self, target: TargetId) {
        self.attached.retain(|t| *t != target);
    }

    fn observe_resize(&mut self) -> ResizeSubscription {
        self.subscriptions += 1;
        let subscription = ResizeSubscription(self.subscriptions);
        self.observing = Some(subscription);
        subscription
    }

    fn unobserve_resize(&mut self, subscription: ResizeSubscription) {
        if self.observing == Some(subscription) {
            self.observing = None;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeadlessConfig {
    pub size: SurfaceSize,
    pub frames: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub counts: SceneCounts,
    pub renders: u64,
    pub teardown: TeardownReport,
    pub live_after_unmount: usize,
}

/// Mounts the scene, runs `frames` ticks at 60 Hz and unmounts
pub fn run_headless(config: HeadlessConfig) -> Result<HeadlessReport> {
    let factory = RecordingFactory::new();
    let stats = factory.stats();
    let mut controller = LifecycleController::new(factory, ManualClock::new(), config.seed);

    controller.mount(HeadlessSurface::new(config.size))?;
    let counts = match controller.scene() {
        Some(scene) => scene.counts(),
        None => bail!("controller did not become active"),
    };

    for _ in 0..config.frames {
        for token in controller.clock_mut().advance(FRAME_INTERVAL) {
            controller.on_frame(token);
        }
    }

    let surface = controller.unmount();
    if surface.as_ref().is_some_and(|s| !s.attached().is_empty()) {
        bail!("render target still attached after unmount");
    }
    let teardown = controller.teardown_report().copied().unwrap_or_default();

    let stats = stats.borrow();
    let report = HeadlessReport {
        counts,
        renders: stats.renders,
        teardown,
        live_after_unmount: stats.live_geometries() + stats.live_materials(),
    };
    info!(
        "Headless run: {} renders, {} geometries and {} materials released",
        report.renders, teardown.geometries_released, teardown.materials_released
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_run_releases_everything() {
        let report = run_headless(HeadlessConfig {
            size: SurfaceSize::new(320, 240),
            frames: 30,
            seed: Some(5),
        })
        .unwrap();

        assert_eq!(report.renders, 30);
        assert_eq!(report.teardown.frames_rendered, 30);
        assert_eq!(report.live_after_unmount, 0);
        assert_eq!(report.teardown.leftovers, 0);
        assert_eq!(report.counts.hearts, 15);
    }

    #[test]
    fn headless_surface_tracks_subscription() {
        let mut surface = HeadlessSurface::new(SurfaceSize::new(10, 10));
        let sub = surface.observe_resize();
        assert!(surface.is_observing());
        surface.unobserve_resize(sub);
        assert!(!surface.is_observing());
    }
}
