use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::window::Window;

use crate::compositor::SharedTargets;
use crate::core::{FrameClock, FrameToken, RenderSurface, ResizeSubscription, SurfaceSize, TargetId};

/// The window's drawing area as seen by the lifecycle controller
pub struct WindowSurface {
    window: Arc<Window>,
    targets: SharedTargets,
    next_subscription: u64,
    subscriptions: BTreeSet<ResizeSubscription>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>, targets: SharedTargets) -> Self {
        Self {
            window,
            targets,
            next_subscription: 0,
            subscriptions: BTreeSet::new(),
        }
    }

    pub fn is_observed(&self) -> bool {
        !self.subscriptions.is_empty()
    }
}

impl RenderSurface for WindowSurface {
    fn size(&self) -> SurfaceSize {
        let size = self.window.inner_size();
        SurfaceSize::new(size.width, size.height)
    }

    fn attach(&mut self, target: TargetId) {
        self.targets.borrow_mut().attach(target);
    }

    fn detach(&mut self, target: TargetId) {
        self.targets.borrow_mut().detach(target);
    }

    fn observe_resize(&mut self) -> ResizeSubscription {
        self.next_subscription += 1;
        let subscription = ResizeSubscription(self.next_subscription);
        self.subscriptions.insert(subscription);
        subscription
    }

    fn unobserve_resize(&mut self, subscription: ResizeSubscription) {
        self.subscriptions.remove(&subscription);
    }
}

/// Frame clock backed by winit redraw requests
///
/// Tokens become due on the next `RedrawRequested`; the host collects them
/// with [`WindowClock::take_due`].
pub struct WindowClock {
    window: Arc<Window>,
    start: Instant,
    next_token: u64,
    pending: BTreeSet<FrameToken>,
}

impl WindowClock {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            start: Instant::now(),
            next_token: 0,
            pending: BTreeSet::new(),
        }
    }

    pub fn take_due(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

impl FrameClock for WindowClock {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending.insert(token);
        self.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.remove(&token);
    }

    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}
