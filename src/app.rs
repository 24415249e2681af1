use std::sync::Arc;
use std::time::Instant;

use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::gfx::{
    arena::Arena,
    camera::{CameraManager, FlyCamera, InputController},
    model::Model,
    rendering::{GpuShader, RenderEngine},
    resources::{GpuTextureStore, ImageFileDecoder},
    scene::{Scene, SceneEntry},
};

/// Interactive model viewer: fly camera, click-to-pick, one model pipeline
///
/// Each frame runs input, camera update, matrix refresh, pick, draw and
/// present, in that order.
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    state: ViewerState,
}

struct ViewerState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    textures: Option<GpuTextureStore>,
    camera_manager: CameraManager,
    scene: Scene<GpuShader>,
    models: Arena<Model>,
    shaders: Arena<GpuShader>,
    last_frame: Instant,
    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;

        let mut camera = FlyCamera::with_orientation(
            config.camera_position,
            Vector3::unit_y(),
            config.camera_yaw,
            config.camera_pitch,
        );
        camera.movement_speed = config.movement_speed;
        camera.mouse_sensitivity = config.mouse_sensitivity;

        Ok(Self {
            event_loop: Some(event_loop),
            state: ViewerState {
                config,
                window: None,
                render_engine: None,
                textures: None,
                camera_manager: CameraManager::new(camera, InputController::new()),
                scene: Scene::new(),
                models: Arena::new(),
                shaders: Arena::new(),
                last_frame: Instant::now(),
                fatal: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.state)?;

        match self.state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ViewerState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.width,
                        self.config.height,
                    )),
            )?,
        );
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let clear_color = self.config.clear_color;
        let renderer = pollster::block_on(RenderEngine::new(window, width, height, clear_color))?;
        let mut textures = renderer.create_texture_store();

        if let Some(path) = self.config.model_path.clone() {
            let mut model = Model::load_or_empty(
                &path,
                &self.config.importer,
                &ImageFileDecoder::new(),
                &mut textures,
            );
            model.upload(renderer.device());

            let model = self.models.insert(model);
            let shader = self.shaders.insert(GpuShader::new("model"));
            let mut entry = SceneEntry::new(model, self.config.model_transform, shader);
            if let Some(tint) = self.config.model_tint {
                entry = entry.with_override("tint", tint);
            }
            self.scene.add_entry(entry);
        }

        self.textures = Some(textures);
        self.render_engine = Some(renderer);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(textures)) =
            (self.render_engine.as_mut(), self.textures.as_ref())
        else {
            return;
        };

        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.camera_manager.update(delta_time);

        let (width, height) = render_engine.surface_size();
        let (width, height) = (width as f32, height as f32);
        self.scene
            .refresh_matrices(&self.camera_manager.camera, width, height);

        if let Some((x, y)) = self.camera_manager.controller.take_click() {
            // Window coordinates start at the top; picking expects bottom-left
            match self.scene.pick_closest(x, height - y, width, height, &self.models) {
                Some(hit) => log::info!(
                    "picked entry {} at distance {:.3}",
                    hit.entry_index,
                    hit.distance
                ),
                None => log::info!("nothing under the cursor"),
            }
        }

        self.scene.draw(&self.models, &mut self.shaders);

        let commands: Vec<_> = self
            .shaders
            .iter_mut()
            .flat_map(|(_, shader)| shader.take_commands())
            .collect();

        match render_engine.render(&commands, textures) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
            }
            Err(err) => log::warn!("dropped frame: {}", err),
        }
    }
}

impl ApplicationHandler for ViewerState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.camera_manager.process_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
