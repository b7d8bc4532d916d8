use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use super::backend::{BackendFactory, RenderBackend};
use super::clock::{FrameClock, FrameToken};
use super::resources::ResourceLedger;
use super::surface::{RenderSurface, ResizeSubscription, SurfaceSize};
use super::updater::update_frame;
use crate::scene::{assemble_scene, Scene};

const STATS_INTERVAL: u64 = 600;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("scene is already mounted")]
    AlreadyMounted,
    #[error("scene backend failed: {0:#}")]
    Backend(anyhow::Error),
}

/// Externally visible controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmounted,
    Active,
    TearingDown,
}

/// What the last unmount released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub geometries_released: usize,
    pub materials_released: usize,
    /// Ids that were live but no longer referenced by any object
    pub leftovers: usize,
    pub frames_rendered: u64,
}

struct Mount<B, S> {
    backend: B,
    surface: S,
    scene: Scene,
    ledger: ResourceLedger,
    rng: StdRng,
    subscription: ResizeSubscription,
    pending: Option<FrameToken>,
    started: Duration,
    frames: u64,
}

enum State<B, S> {
    Unmounted,
    Active(Box<Mount<B, S>>),
    TearingDown,
}

/// Owns the scene for one mount at a time.
///
/// `mount` builds everything and schedules the first frame, `on_frame` runs
/// one update and render per delivered token, and `unmount` releases every
/// resource exactly once before handing the surface back. Dropping an active
/// controller unmounts it.
pub struct LifecycleController<F, S, C>
where
    F: BackendFactory,
    S: RenderSurface,
    C: FrameClock,
{
    factory: F,
    clock: C,
    seed: Option<u64>,
    state: State<F::Backend, S>,
    last_report: Option<TeardownReport>,
}

impl<F, S, C> LifecycleController<F, S, C>
where
    F: BackendFactory,
    S: RenderSurface,
    C: FrameClock,
{
    /// `seed` fixes the random placement of every mount; `None` draws from entropy
    pub fn new(factory: F, clock: C, seed: Option<u64>) -> Self {
        Self {
            factory,
            clock,
            seed,
            state: State::Unmounted,
            last_report: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Unmounted => Phase::Unmounted,
            State::Active(_) => Phase::Active,
            State::TearingDown => Phase::TearingDown,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    pub fn mount(&mut self, mut surface: S) -> Result<(), LifecycleError> {
        if !matches!(self.state, State::Unmounted) {
            return Err(LifecycleError::AlreadyMounted);
        }

        let size = surface.size();
        let mut backend = self.factory.create(size).map_err(LifecycleError::Backend)?;
        let mut ledger = ResourceLedger::new();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let scene = match assemble_scene(&mut backend, &mut ledger, size, &mut rng) {
            Ok(scene) => scene,
            Err(e) => {
                let released = ledger.release_all(&mut backend);
                backend.dispose();
                warn!("Scene assembly failed, released {} resources: {:#}", released, e);
                return Err(LifecycleError::Backend(e));
            }
        };

        surface.attach(backend.target());
        let subscription = surface.observe_resize();
        let pending = Some(self.clock.request_frame());
        let started = self.clock.now();

        info!(
            "Scene mounted at {}x{} ({} live resources)",
            size.width,
            size.height,
            ledger.live()
        );

        self.state = State::Active(Box::new(Mount {
            backend,
            surface,
            scene,
            ledger,
            rng,
            subscription,
            pending,
            started,
            frames: 0,
        }));
        Ok(())
    }

    /// Runs one tick if `token` is the pending frame. Returns whether it did.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        let State::Active(mount) = &mut self.state else {
            return false;
        };
        if mount.pending != Some(token) {
            return false;
        }
        mount.pending = None;

        let elapsed = self.clock.now().saturating_sub(mount.started);
        update_frame(&mut mount.scene, elapsed, &mut mount.rng);
        if let Err(e) = mount.backend.render(&mount.scene) {
            warn!("Render failed: {:#}", e);
        }

        mount.frames += 1;
        if mount.frames % STATS_INTERVAL == 0 {
            debug!("{} frames in {:.1}s", mount.frames, elapsed.as_secs_f32());
        }

        mount.pending = Some(self.clock.request_frame());
        true
    }

    /// Applies a new surface size. Ignored unless active or when `size` has no area.
    pub fn on_resize(&mut self, size: SurfaceSize) -> bool {
        let State::Active(mount) = &mut self.state else {
            return false;
        };
        if size.is_empty() {
            return false;
        }

        mount.scene.camera.set_aspect(size);
        mount.backend.set_size(size);
        debug!("Resized to {}x{}", size.width, size.height);
        true
    }

    /// Tears the scene down and returns the surface. `None` when nothing was mounted.
    pub fn unmount(&mut self) -> Option<S> {
        let mount = match std::mem::replace(&mut self.state, State::TearingDown) {
            State::Active(mount) => mount,
            other => {
                self.state = other;
                return None;
            }
        };

        let Mount {
            mut backend,
            mut surface,
            scene,
            mut ledger,
            subscription,
            pending,
            frames,
            ..
        } = *mount;

        surface.unobserve_resize(subscription);
        if let Some(token) = pending {
            self.clock.cancel_frame(token);
        }
        surface.detach(backend.target());

        let geometries: BTreeSet<_> = scene.objects().map(|o| o.geometry).collect();
        let materials: BTreeSet<_> = scene.objects().map(|o| o.material).collect();
        let mut report = TeardownReport {
            frames_rendered: frames,
            ..Default::default()
        };
        for id in geometries {
            if ledger.release_geometry(&mut backend, id) {
                report.geometries_released += 1;
            }
        }
        for id in materials {
            if ledger.release_material(&mut backend, id) {
                report.materials_released += 1;
            }
        }
        report.leftovers = ledger.release_all(&mut backend);
        if report.leftovers > 0 {
            warn!("{} resources were not referenced by the scene", report.leftovers);
        }
        backend.dispose();
        drop(scene);

        info!(
            "Scene unmounted after {} frames ({} geometries, {} materials released)",
            report.frames_rendered, report.geometries_released, report.materials_released
        );
        self.last_report = Some(report);
        self.state = State::Unmounted;
        Some(surface)
    }

    pub fn scene(&self) -> Option<&Scene> {
        match &self.state {
            State::Active(mount) => Some(&mount.scene),
            _ => None,
        }
    }

    pub fn surface(&self) -> Option<&S> {
        match &self.state {
            State::Active(mount) => Some(&mount.surface),
            _ => None,
        }
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        match &self.state {
            State::Active(mount) => mount.pending,
            _ => None,
        }
    }

    /// Live ledger entries of the current mount
    pub fn live_resources(&self) -> usize {
        match &self.state {
            State::Active(mount) => mount.ledger.live(),
            _ => 0,
        }
    }

    pub fn teardown_report(&self) -> Option<&TeardownReport> {
        self.last_report.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F, S, C> Drop for LifecycleController<F, S, C>
where
    F: BackendFactory,
    S: RenderSurface,
    C: FrameClock,
{
    fn drop(&mut self) {
        if self.is_active() {
            self.unmount();
        }
    }
}
