use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH, TICK_RATE};
use crate::movement::{InputState, Pose};
use crate::scaler::ScaleLut;
use crate::texture::Texture;
use crate::world::WorldGrid;

mod config;
mod movement;
mod raycast;
mod renderer;
mod scaler;
mod texture;
mod world;

#[derive(Parser)]
#[command(name = "gridcast", about = "First-person raycaster over a grid map")]
struct Cli {
    /// Map file: one row per line, 0 = empty, 1 = solid
    map: PathBuf,

    /// Render walls as flat shaded color instead of textured
    #[arg(long)]
    flat: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    grid: WorldGrid,
    pose: Pose,
    texture: Option<Texture>,

    // Internal fixed-size framebuffer, stretched to the window
    fb: Vec<u32>,
    scale_lut: ScaleLut,

    keys_down: HashSet<KeyCode>,
    last_tick: Instant,

    frame_counter: u32,
    last_fps_log: Instant,
}

impl App {
    fn new(grid: WorldGrid, pose: Pose, texture: Option<Texture>) -> Self {
        Self {
            window: None,
            surface: None,
            grid,
            pose,
            texture,
            fb: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            scale_lut: ScaleLut::empty(),
            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            frame_counter: 0,
            last_fps_log: Instant::now(),
        }
    }

    fn input_state(&self) -> InputState {
        let held = |code| self.keys_down.contains(&code);
        InputState {
            turn_left: held(KeyCode::ArrowLeft) || held(KeyCode::KeyA),
            turn_right: held(KeyCode::ArrowRight) || held(KeyCode::KeyD),
            forward: held(KeyCode::ArrowUp) || held(KeyCode::KeyW),
            backward: held(KeyCode::ArrowDown) || held(KeyCode::KeyS),
        }
    }

    /// One frame tick: pose update first, so every ray cast this frame
    /// observes the post-update pose.
    fn tick(&mut self) {
        let input = self.input_state();
        movement::advance(&mut self.pose, &input, &self.grid);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("gridcast")
            .with_inner_size(LogicalSize::new(
                SCREEN_WIDTH as f64,
                SCREEN_HEIGHT as f64,
            ));

        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        let size = window.inner_size();
        self.scale_lut = scaler::build_scale_lut(
            (size.width as usize).max(1),
            (size.height as usize).max(1),
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
        );

        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            if code == KeyCode::Escape {
                                event_loop.exit();
                                return;
                            }
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // minimized, skip drawing
                }

                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .unwrap();

                renderer::render_frame(&mut self.fb, &self.grid, &self.pose, self.texture.as_ref());

                let mut buf = surface.buffer_mut().expect("buffer_mut");
                scaler::blit_stretch(&mut buf, dw, &self.fb, SCREEN_WIDTH, &self.scale_lut);
                buf.present().unwrap();

                self.frame_counter += 1;
                let now = Instant::now();
                if now.duration_since(self.last_fps_log).as_secs_f32() >= 1.0 {
                    let fps = self.frame_counter as f32
                        / now.duration_since(self.last_fps_log).as_secs_f32();
                    tracing::debug!(fps, "frame rate");
                    self.frame_counter = 0;
                    self.last_fps_log = now;
                }

                // cap the loop at the fixed tick rate
                let frame_budget = Duration::from_secs(1) / TICK_RATE;
                let elapsed = self.last_tick.elapsed();
                if elapsed < frame_budget {
                    thread::sleep(frame_budget - elapsed);
                }
                self.last_tick = Instant::now();

                self.window.as_ref().unwrap().request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                let (dw, dh) = (new_size.width as usize, new_size.height as usize);
                if dw > 0 && dh > 0 {
                    self.scale_lut = scaler::build_scale_lut(dw, dh, SCREEN_WIDTH, SCREEN_HEIGHT);
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let grid = WorldGrid::load(&cli.map)
        .with_context(|| format!("loading map {}", cli.map.display()))?;
    let (x, y) = grid.spawn_point().context("placing the player")?;
    let pose = Pose::new(x, y, 0.0);

    tracing::info!(
        width = grid.width(),
        height = grid.height(),
        spawn_x = x,
        spawn_y = y,
        "map loaded"
    );

    let texture = if cli.flat {
        tracing::info!("flat-color wall mode");
        None
    } else {
        Some(Texture::brick(64))
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(grid, pose, texture);
    event_loop.run_app(&mut app)?;
    Ok(())
}
