//! The frame loop: a two-state winit application driving the city renderer.
//!
//! The handler starts `Pending` and becomes `Running` once the window and
//! GPU context exist; stopping means not requesting the next redraw. Each
//! redraw steers the camera from input, rebuilds the frame's matrices and
//! scene objects, and submits one render pass. A failed frame is dropped
//! and the next redraw tries again; only an out-of-memory surface error
//! ends the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::controller::{CameraSnapshot, FirstPerson};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh::{Geometry, Mesh};
use crate::scene::CityLayout;
use crate::scene_pass::{FrameCamera, ScenePass};
use crate::xr::XrSession;

/// Where the camera spawns: street level at the edge of the grid, an
/// about-face away from the tower.
const SPAWN: glam::Vec3 = glam::Vec3::new(0.0, 2.0, 15.0);

/// Clear color: the daytime sky.
const SKY: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.8,
    b: 1.0,
    a: 1.0,
};

/// How often the title-bar status readout refreshes.
const STATUS_INTERVAL: Duration = Duration::from_millis(250);

/// Window configuration.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Skytower".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Run the city renderer until the window closes.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending { config };
    event_loop.run_app(&mut app)?;
    Ok(())
}

enum App {
    Pending { config: AppConfig },
    Running(Running),
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    pass: ScenePass,
    cube: Mesh,
    layout: CityLayout,
    camera: Camera,
    steering: FirstPerson,
    input: Input,
    session: XrSession,
    cursor_captured: bool,
    surface_error_logged: bool,
    last_status: Instant,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let App::Pending { config } = self else {
            return;
        };

        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // A missing graphics context is fatal at startup: one diagnostic,
        // no retry, no partial-rendering fallback.
        let gpu = match GpuContext::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("failed to initialize graphics: {e}");
                event_loop.exit();
                return;
            }
        };

        let pass = ScenePass::new(&gpu);
        let cube = Geometry::cube(1.0).upload(&gpu);

        window.request_redraw();

        *self = App::Running(Running {
            window,
            gpu,
            pass,
            cube,
            layout: CityLayout::new(),
            camera: Camera::new().position(SPAWN),
            steering: FirstPerson::new(),
            input: Input::new(),
            session: XrSession::new(),
            cursor_captured: false,
            surface_error_logged: false,
            last_status: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running(state) = self else {
            return;
        };

        state.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                state.frame(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let App::Running(state) = self {
            state.input.handle_device_event(&event);
        }
    }
}

impl Running {
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        // Clicking engages pointer lock; Escape releases it. Holding the
        // button without lock also drives the look, so both activation
        // paths work.
        if self.input.mouse_pressed(MouseButton::Left) && !self.cursor_captured {
            self.capture_cursor();
        }
        if self.input.key_pressed(KeyCode::Escape) && self.cursor_captured {
            self.release_cursor();
        }
        if self.input.key_pressed(KeyCode::KeyV) && self.session.request().is_ok() {
            // No immersive runtime is bound; the request resolves at once.
            self.session.denied("no immersive runtime bound").ok();
        }

        let snapshot = self.steering.steer(&mut self.camera, &mut self.input);
        if self.last_status.elapsed() >= STATUS_INTERVAL {
            self.window.set_title(&status_line(&snapshot));
            self.last_status = Instant::now();
        }

        // Projection tracks the live aspect ratio; the view comes from the
        // desktop camera, or from the pose provider while a session is
        // active.
        let frame_camera = FrameCamera {
            projection: self.camera.projection_matrix(self.gpu.aspect()),
            view: match self.session.pose_provider() {
                Some(pose) => pose.view_matrix(),
                None => self.camera.view_matrix(),
            },
        };
        let objects = self.layout.objects();

        self.pass.ensure_depth_size(&self.gpu);
        self.pass.prepare(&self.gpu, &frame_camera, &objects);

        match self.gpu.surface.get_current_texture() {
            Ok(output) => {
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let mut encoder =
                    self.gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("City Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("City Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(SKY),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: &self.pass.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    self.pass.render(&mut render_pass, &self.cube);
                }

                self.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
                self.surface_error_logged = false;
            }
            // Frame-local failures drop this frame; the next redraw retries
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if !self.surface_error_logged {
                    log::warn!("surface lost, reconfiguring");
                    self.surface_error_logged = true;
                }
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                if !self.surface_error_logged {
                    log::warn!("surface timeout, skipping frame");
                    self.surface_error_logged = true;
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(other) => {
                if !self.surface_error_logged {
                    log::error!("surface error: {other:?}");
                    self.surface_error_logged = true;
                }
            }
        }

        self.input.begin_frame();
        self.window.request_redraw();
    }

    fn capture_cursor(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.input.set_pointer_locked(true);
                self.cursor_captured = true;
            }
            // Look still works while the button is held
            Err(e) => log::warn!("pointer lock unavailable: {e}"),
        }
    }

    fn release_cursor(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("failed to release pointer lock: {e}");
        }
        self.window.set_cursor_visible(true);
        self.input.set_pointer_locked(false);
        self.cursor_captured = false;
    }
}

fn status_line(snapshot: &CameraSnapshot) -> String {
    format!(
        "Skytower | pos ({:.1}, {:.1}, {:.1}) yaw {:.2} pitch {:.2} | WASD move, mouse look, Space/Shift fly",
        snapshot.position.x,
        snapshot.position.y,
        snapshot.position.z,
        snapshot.yaw,
        snapshot.pitch,
    )
}
