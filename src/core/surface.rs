/// Drawable size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height; zero when the surface has no area
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Handle of a render target published by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Token of an active resize observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResizeSubscription(pub u64);

/// Host-provided drawable the scene renders into
pub trait RenderSurface {
    /// Current size in physical pixels
    fn size(&self) -> SurfaceSize;

    /// Show `target` on this surface
    fn attach(&mut self, target: TargetId);

    /// Stop showing `target`
    fn detach(&mut self, target: TargetId);

    /// Start delivering resize notifications to the owner
    fn observe_resize(&mut self) -> ResizeSubscription;

    fn unobserve_resize(&mut self, subscription: ResizeSubscription);
}
