/// Interactive demo: a spinning textured mesh drawn through the tile rasterizer
/// and presented with softbuffer.
use glam::Vec3;
use log::{debug, error, info};
use mimalloc::MiMalloc;
use std::error::Error;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tile_rasterizer::meshing::primitives;
use tile_rasterizer::*;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CHECKER_SIZE: usize = 256;
const CHECKER_CELL: usize = 32;

/// Two-tone checkerboard with a thin grid line between cells.
fn checker_texture() -> Result<Texture> {
    let light = Bgra8::rgba(230, 200, 120, 255);
    let dark = Bgra8::rgba(60, 110, 170, 255);
    let line = Bgra8::rgba(20, 20, 20, 255);

    let texels: Vec<Bgra8> = (0..CHECKER_SIZE * CHECKER_SIZE)
        .map(|i| {
            let (x, y) = (i % CHECKER_SIZE, i / CHECKER_SIZE);
            if x % CHECKER_CELL == 0 || y % CHECKER_CELL == 0 {
                line
            } else if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
                light
            } else {
                dark
            }
        })
        .collect();
    Texture::new(CHECKER_SIZE, CHECKER_SIZE, &texels)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DemoMesh {
    Sphere,
    Cube,
}

impl DemoMesh {
    fn build(self) -> Result<Mesh> {
        match self {
            DemoMesh::Sphere => primitives::sphere(24, 24),
            DemoMesh::Cube => primitives::cube(),
        }
    }

    fn next(self) -> Self {
        match self {
            DemoMesh::Sphere => DemoMesh::Cube,
            DemoMesh::Cube => DemoMesh::Sphere,
        }
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("=== Tile Rasterizer ===");
    info!("Controls:");
    info!("  L - Toggle shadows");
    info!("  C - Toggle back-face culling");
    info!("  M - Switch sphere/cube");
    info!("  Space - Pause/resume spin");
    info!("  ESC - Exit");

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Tile Rasterizer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let context = softbuffer::Context::new(window.clone())?;
    let mut surface = softbuffer::Surface::new(&context, window.clone())?;

    let mut rasterizer = Rasterizer::new();
    let mut demo_mesh = DemoMesh::Sphere;
    rasterizer.set_mesh(demo_mesh.build()?);
    rasterizer.set_texture(checker_texture()?);

    let default_spin = rasterizer.scene().spin_deg_per_frame;
    let mut pixels: Vec<Bgra8> = Vec::new();

    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    #[cfg(all(feature = "profiling", target_os = "linux"))]
    let mut hardware = {
        let mut counters = tile_rasterizer::perf::profiling::hardware::PerfCounters::new();
        counters.enable_all();
        counters
    };

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    let PhysicalKey::Code(keycode) = event.physical_key else {
                        return;
                    };
                    match keycode {
                        KeyCode::KeyL => {
                            let shading = &mut rasterizer.config.shading;
                            shading.shadows = !shading.shadows;
                            info!("Shadows: {}", if shading.shadows { "ON" } else { "OFF" });
                        }
                        KeyCode::KeyC => {
                            let culling = &mut rasterizer.config.face_culling;
                            *culling = match culling {
                                FaceCulling::DoubleSided => FaceCulling::BackFace,
                                FaceCulling::BackFace => FaceCulling::DoubleSided,
                            };
                            info!("Face culling: {:?}", culling);
                        }
                        KeyCode::KeyM => {
                            demo_mesh = demo_mesh.next();
                            match demo_mesh.build() {
                                Ok(mesh) => rasterizer.set_mesh(mesh),
                                Err(err) => error!("failed to build {:?}: {err}", demo_mesh),
                            }
                        }
                        KeyCode::Space => {
                            let scene = rasterizer.scene_mut();
                            scene.spin_deg_per_frame = if scene.spin_deg_per_frame == Vec3::ZERO {
                                default_spin
                            } else {
                                Vec3::ZERO
                            };
                        }
                        KeyCode::Escape => elwt.exit(),
                        _ => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    let size = window.inner_size();
                    let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    else {
                        // Minimized
                        return;
                    };

                    rasterizer.draw(width.get() as usize, height.get() as usize, &mut pixels);

                    if let Err(err) = surface.resize(width, height) {
                        error!("surface resize failed: {err}");
                        return;
                    }
                    let mut buffer = match surface.buffer_mut() {
                        Ok(buffer) => buffer,
                        Err(err) => {
                            error!("surface buffer unavailable: {err}");
                            return;
                        }
                    };
                    for (dst, src) in buffer.iter_mut().zip(&pixels) {
                        *dst = src.to_xrgb();
                    }
                    if let Err(err) = buffer.present() {
                        error!("present failed: {err}");
                    }

                    frame_count += 1;
                    if fps_timer.elapsed().as_secs() >= 1 {
                        let stats = rasterizer.last_frame_stats();
                        info!(
                            "FPS: {} | {}x{} | Triangles: {} in, {} drawn",
                            frame_count, stats.width, stats.height, stats.triangles_in, stats.triangles_out
                        );
                        debug!("{stats}");

                        #[cfg(feature = "profiling")]
                        {
                            FUNCTION_COUNTERS.snapshot().print_report();
                            FUNCTION_COUNTERS.reset();
                        }
                        #[cfg(all(feature = "profiling", target_os = "linux"))]
                        {
                            hardware.disable_all();
                            hardware.read_all().print_report();
                            hardware.enable_all();
                        }

                        frame_count = 0;
                        fps_timer = Instant::now();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        }
    })?;

    Ok(())
}
