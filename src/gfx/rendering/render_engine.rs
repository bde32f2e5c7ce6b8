//! WGPU-based rendering engine for Tattie
//!
//! Owns the surface, device and queue, the shared bind group layouts and the
//! four render pipelines (basic, lambert, lambert_custom, lines). A frame is
//! one render pass: meshes grouped by shading model, then helper lines, then
//! the optional UI overlay.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::error::{Result, TattieError};
use crate::gfx::{
    lighting::ColorEncoding,
    resources::{
        global_bindings::{GlobalBindings, GlobalUBO},
        material::{create_material_layout, ShadingModel},
        texture_resource::TextureResource,
    },
    scene::{
        object::{create_object_layout, DrawObject},
        Scene,
    },
};
use crate::wgpu_utils::BindGroupLayoutWithDesc;

use super::frame_context::FrameContext;
use super::pipeline_manager::{PipelineConfig, PipelineManager, VertexLayout};

const LINES_PIPELINE: &str = "lines";

/// The encoding the shaders must apply for the requested output encoding
///
/// An `*Srgb` surface format encodes in hardware, so the shaders then write
/// linear values. On such a surface linear output cannot be produced at all.
pub fn shader_output_encoding(requested: ColorEncoding, surface: TextureFormat) -> ColorEncoding {
    if surface.is_srgb() {
        ColorEncoding::Linear
    } else {
        requested
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Fails when no adapter or device is available or when any shader or
    /// pipeline does not validate.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(TattieError::NoSurfaceFormat)?;
        if format.is_srgb() {
            log::warn!(
                "Surface only offers sRGB formats ({:?}); output is always sRGB encoded",
                format
            );
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let object_layout = create_object_layout(&device);
        let material_layout = create_material_layout(&device);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("basic", include_str!("shaders/basic.wgsl"))?;
        pipeline_manager.load_shader("lambert", include_str!("shaders/lambert.wgsl"))?;
        pipeline_manager.load_shader(
            "lambert_custom",
            include_str!("shaders/lambert_custom.wgsl"),
        )?;
        pipeline_manager.load_shader(LINES_PIPELINE, include_str!("shaders/lines.wgsl"))?;

        let mesh_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            object_layout.layout.clone(),
            material_layout.layout.clone(),
        ];
        for model in ShadingModel::ALL {
            let name = model.pipeline_name();
            pipeline_manager.register_pipeline(
                name,
                PipelineConfig::default()
                    .with_label(name)
                    .with_shader(name)
                    .with_bind_group_layouts(mesh_layouts.clone())
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_format(format),
            );
        }

        pipeline_manager.register_pipeline(
            LINES_PIPELINE,
            PipelineConfig::default()
                .with_label(LINES_PIPELINE)
                .with_shader(LINES_PIPELINE)
                .with_vertex_layout(VertexLayout::Line)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()])
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format),
        );

        pipeline_manager.create_all_pipelines()?;
        log::info!(
            "Render engine ready: {}x{} {:?}, {} pipelines",
            config.width,
            config.height,
            format,
            pipeline_manager.get_stats().total_pipelines
        );

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            material_layout,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Creates GPU resources for everything the scene holds
    pub fn prepare_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.object_layout,
            &self.material_layout,
        );
    }

    /// Re-uploads material parameters after they were edited
    pub fn update_materials(&self, scene: &mut Scene) {
        scene.update_materials(&self.device, &self.queue, &self.material_layout);
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Encoding the shaders apply on output for the requested display encoding
    pub fn shader_output_encoding(&self, requested: ColorEncoding) -> ColorEncoding {
        shader_output_encoding(requested, self.format)
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// Uploads the frame's uniforms, then draws every visible object with
    /// the pipeline of its material followed by the visible line helpers.
    /// A lost or outdated surface is reconfigured and the frame skipped;
    /// other surface errors are returned.
    pub fn render_frame<F>(
        &mut self,
        frame: &FrameContext,
        scene: &mut Scene,
        ui_callback: Option<F>,
    ) -> std::result::Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next surface texture");
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        self.global_ubo.update_content(&self.queue, frame.global);
        for (object, uniform) in scene.objects.iter_mut().zip(&frame.objects) {
            object.upload_uniform(&self.queue, *uniform);
        }

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(global_bind_group) = self.global_bindings.bind_group() {
                render_pass.set_bind_group(0, global_bind_group, &[]);
            }

            let scene: &Scene = scene;
            for model in ShadingModel::ALL {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(model.pipeline_name())
                else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);

                for object in scene.objects.iter().filter(|o| o.visible) {
                    let material = scene.get_material_for_object(object);
                    if material.model() != model {
                        continue;
                    }
                    let (Some(object_bind_group), Some(material_bind_group)) =
                        (object.get_bind_group(), material.get_bind_group())
                    else {
                        log::trace!(
                            "Skipping '{}': GPU resources missing for it or material '{}'",
                            object.name,
                            material.name
                        );
                        continue;
                    };
                    render_pass.set_bind_group(1, object_bind_group, &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                    render_pass.draw_object(object);
                }
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(LINES_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                for helper in scene.helpers.iter().filter(|h| h.visible) {
                    if let Some(buffer) = helper.vertex_buffer() {
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                        render_pass.draw(0..helper.vertex_count(), 0..1);
                    }
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                self.device.as_ref(),
                self.queue.as_ref(),
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Convenience method for rendering without UI
    pub fn render_frame_simple(
        &mut self,
        frame: &FrameContext,
        scene: &mut Scene,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        self.render_frame(
            frame,
            scene,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        )
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized dimensions (a minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Resized surface to {}x{}", width, height);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_encodes_on_linear_surface() {
        assert_eq!(
            shader_output_encoding(ColorEncoding::Srgb, TextureFormat::Bgra8Unorm),
            ColorEncoding::Srgb
        );
        assert_eq!(
            shader_output_encoding(ColorEncoding::Linear, TextureFormat::Bgra8Unorm),
            ColorEncoding::Linear
        );
    }

    #[test]
    fn test_srgb_surface_encodes_in_hardware() {
        assert_eq!(
            shader_output_encoding(ColorEncoding::Srgb, TextureFormat::Bgra8UnormSrgb),
            ColorEncoding::Linear
        );
    }
}
