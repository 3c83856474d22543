//! The renderer seam between the frame loop and the GPU.
//!
//! The frame loop only knows the [`Renderer`] trait. [`GpuRenderer`](crate::GpuRenderer)
//! implements it with wgpu; tests substitute recording renderers.

use std::sync::Arc;

use glam::Mat4;
use winit::window::Window;

use crate::color::Color;
use crate::error::{GpuError, RenderError};
use crate::gpu::GpuContext;
use crate::mesh_pass::MeshPass;
use crate::scene::{Renderable, Scene, Shape};
use crate::transform::Transform;

/// Draws a scene synchronously.
pub trait Renderer {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        (**self).render(scene)
    }
}

/// One visible entity, flattened for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub shape: Shape,
    pub model: Mat4,
    pub color: Color,
}

/// Every visible entity in `scene`, grouped by shape so each shape can be
/// drawn as one instanced batch. Translucent items come after all opaque
/// ones so they blend over what is behind them.
pub fn collect_draws(scene: &Scene) -> Vec<DrawItem> {
    let mut items: Vec<DrawItem> = scene
        .world
        .query::<(&Transform, &Renderable)>()
        .iter()
        .filter(|(_, (_, renderable))| renderable.visible)
        .map(|(_, (transform, renderable))| DrawItem {
            shape: renderable.shape,
            model: transform.matrix(),
            color: renderable.color,
        })
        .collect();

    // stable, so draw order within a shape follows the world's iteration order
    items.sort_by_key(|item| (item.color.a < 1.0, item.shape));
    items
}

/// Contiguous runs of one shape within a sorted draw list.
pub fn batches(items: &[DrawItem]) -> Vec<(Shape, std::ops::Range<u32>)> {
    let mut out: Vec<(Shape, std::ops::Range<u32>)> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        // instance ranges are u32 on the GPU; anything past that is not drawn
        let Ok(end) = u32::try_from(i + 1) else {
            break;
        };
        let start = end - 1;
        match out.last_mut() {
            Some((shape, range)) if *shape == item.shape => range.end = end,
            _ => out.push((item.shape, start..end)),
        }
    }
    out
}

/// [`Renderer`] backed by a window surface.
pub struct GpuRenderer {
    gpu: GpuContext,
    mesh_pass: MeshPass,
}

impl GpuRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let gpu = GpuContext::new(window)?;
        let mesh_pass = MeshPass::new(&gpu);
        Ok(Self { gpu, mesh_pass })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }
}

impl Renderer for GpuRenderer {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Outdated) => {
                // a resize raced this frame; draw the next one at the new size
                tracing::debug!("surface outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let items = collect_draws(scene);
        self.mesh_pass.ensure_depth_size(&self.gpu);
        self.mesh_pass.prepare(&self.gpu, &scene.camera, &items);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.mesh_pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pass.render(&mut render_pass, &items);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
