use std::sync::Arc;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::compositor::Compositor;
use crate::config::AppConfig;
use crate::core::{LifecycleController, SurfaceSize};
use crate::renderer::WgpuBackendFactory;
use crate::shell::{ShellEvent, ShellUi};
use crate::window::{WindowClock, WindowSurface};

type SceneController = LifecycleController<WgpuBackendFactory, WindowSurface, WindowClock>;

/// Windowed host: the shell decides when the scene is mounted
pub struct App {
    config: AppConfig,
    no_ui: bool,
    window: Option<Arc<Window>>,
    compositor: Option<Compositor>,
    controller: Option<SceneController>,
    shell: ShellUi,
}

impl App {
    pub fn new(config: AppConfig, shell: ShellUi, no_ui: bool) -> Self {
        Self {
            config,
            no_ui,
            window: None,
            compositor: None,
            controller: None,
            shell,
        }
    }

    fn mount_scene(&mut self) {
        let (Some(window), Some(compositor), Some(controller)) =
            (&self.window, &self.compositor, &mut self.controller)
        else {
            return;
        };
        let surface = WindowSurface::new(window.clone(), compositor.targets());
        if let Err(e) = controller.mount(surface) {
            warn!("Failed to mount scene: {}", e);
        }
    }

    fn unmount_scene(&mut self) {
        if let Some(controller) = &mut self.controller {
            controller.unmount();
        }
    }

    fn redraw(&mut self) {
        if let Some(controller) = &mut self.controller {
            for token in controller.clock_mut().take_due() {
                controller.on_frame(token);
            }
        }

        let (Some(window), Some(compositor)) = (&self.window, &mut self.compositor) else {
            return;
        };
        let mut event = ShellEvent::None;
        let no_ui = self.no_ui;
        let shell = &mut self.shell;
        let presented = compositor.present(window, |ctx| {
            if !no_ui {
                event = shell.show(ctx);
            }
        });
        if let Err(e) = presented {
            error!("Present failed: {:#}", e);
        }

        match event {
            ShellEvent::LoggedIn => self.mount_scene(),
            ShellEvent::LoggedOut => self.unmount_scene(),
            ShellEvent::None => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let compositor = match Compositor::new(window.clone()) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to initialize GPU: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let factory = WgpuBackendFactory::new(compositor.gpu().clone(), compositor.targets());
        self.controller = Some(LifecycleController::new(
            factory,
            WindowClock::new(window.clone()),
            self.config.seed,
        ));
        self.window = Some(window);
        self.compositor = Some(compositor);
        info!("Window ready");

        if self.no_ui || self.shell.is_logged_in() {
            self.mount_scene();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(compositor), Some(window)) = (&mut self.compositor, &self.window) {
            if compositor.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.unmount_scene();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let size = SurfaceSize::new(physical_size.width, physical_size.height);
                if let Some(compositor) = &mut self.compositor {
                    compositor.resize(size);
                }
                if let Some(controller) = &mut self.controller {
                    controller.on_resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount_scene();
    }
}
