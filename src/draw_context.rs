/*
MIT License

Copyright (c) 2021, 2022, 2024, 2025 Vincent Hiribarren

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use bytemuck::NoUninit;
use log::{debug, info};
use pollster::FutureExt;
use wgpu::util::DeviceExt;
use wgpu::{
    DepthBiasState, PipelineCompilationOptions, PipelineLayoutDescriptor, StencilState,
    SurfaceConfiguration, Texture,
};
use winit::window::Window;

use crate::config::RenderSettings;
use crate::math::Mat4;

pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn surface_ratio(&self) -> f32 {
        if self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }
}

enum DrawMode {
    Direct {
        vertex_count: u32,
    },
    Indexed {
        format: wgpu::IndexFormat,
        index_count: u32,
        index_buffer: wgpu::Buffer,
    },
}

pub enum DrawModeParams<'a> {
    Direct { vertex_count: u32 },
    Indexed { index_data: IndexData<'a> },
}

pub enum IndexData<'a> {
    U32(&'a [u32]),
    U16(&'a [u16]),
}

impl IndexData<'_> {
    #[must_use]
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            IndexData::U32(_) => wgpu::IndexFormat::Uint32,
            IndexData::U16(_) => wgpu::IndexFormat::Uint16,
        }
    }
    #[must_use]
    pub fn size(&self) -> u32 {
        let len = match self {
            IndexData::U32(data) => data.len(),
            IndexData::U16(data) => data.len(),
        };
        u32::try_from(len).expect("Index count should fit in u32")
    }
    #[must_use]
    pub fn data(&self) -> &[u8] {
        match self {
            IndexData::U32(data) => bytemuck::cast_slice(data),
            IndexData::U16(data) => bytemuck::cast_slice(data),
        }
    }
}

pub trait UniformType {
    type AlignedType: NoUninit;
    fn apply_alignment(&self) -> Self::AlignedType;
}

macro_rules! impl_uniform {
    ( $($type:ty),+ ) => {
        $(
            impl UniformType for $type {
                type AlignedType = Self;
                fn apply_alignment(&self) -> Self::AlignedType {
                    *self
                }
            }
        )*
    };
}
impl_uniform!(f32, [f32; 4], [[f32; 4]; 4], Mat4);

pub struct Uniform<T> {
    value: T,
    buffer: wgpu::Buffer,
    queue: Rc<wgpu::Queue>,
}

impl<T: UniformType> Uniform<T> {
    pub fn new(context: &DrawContext, value: T) -> Self {
        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Uniform Buffer"),
                contents: bytemuck::cast_slice(&[value.apply_alignment()]),
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
            });
        let queue = Rc::clone(&context.queue);
        Self {
            value,
            buffer,
            queue,
        }
    }
    pub fn read_uniform(&self) -> &T {
        &self.value
    }
    pub fn write_uniform(&mut self, data: T) {
        self.value = data;
        self.queue.write_buffer(
            &self.buffer,
            0 as wgpu::BufferAddress,
            bytemuck::cast_slice(&[self.value.apply_alignment()]),
        );
    }
}

pub struct BindingSlot<'a> {
    pub bind_group: u32,
    pub binding: u32,
    pub resource: &'a dyn AsBindingResource,
}

pub trait AsBindingResource {
    fn binding_resource(&self) -> wgpu::BindingResource;
    fn binding_type(&self) -> wgpu::BindingType;
}

impl<T> AsBindingResource for Uniform<T>
where
    T: UniformType,
{
    fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
    fn binding_type(&self) -> wgpu::BindingType {
        wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        }
    }
}

struct VertexBufferSlot {
    buffer: wgpu::Buffer,
    array_stride: wgpu::BufferAddress,
    attributes: Vec<wgpu::VertexAttribute>,
}

pub struct DrawableBuilder<'a> {
    context: &'a DrawContext,
    vtx_shader_module: &'a wgpu::ShaderModule,
    frg_shader_module: &'a wgpu::ShaderModule,
    used_locations: HashSet<u32>,
    vertex_buffers: Vec<VertexBufferSlot>,
    draw_mode: DrawMode,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_compare: wgpu::CompareFunction,
    binding_groups:
        Vec<Option<BTreeMap<u32, (wgpu::BindingResource<'a>, wgpu::BindGroupLayoutEntry)>>>,
}

impl<'a> DrawableBuilder<'a> {
    pub fn new(
        context: &'a DrawContext,
        vtx_shader_module: &'a wgpu::ShaderModule,
        frg_shader_module: &'a wgpu::ShaderModule,
        draw_params: DrawModeParams,
    ) -> Self {
        let draw_mode = match draw_params {
            DrawModeParams::Direct { vertex_count } => DrawMode::Direct { vertex_count },
            DrawModeParams::Indexed { index_data } => {
                let index_buffer =
                    context
                        .device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Index Buffer"),
                            contents: index_data.data(),
                            usage: wgpu::BufferUsages::INDEX,
                        });
                DrawMode::Indexed {
                    format: index_data.format(),
                    index_count: index_data.size(),
                    index_buffer,
                }
            }
        };
        Self {
            context,
            vtx_shader_module,
            frg_shader_module,
            used_locations: HashSet::new(),
            vertex_buffers: Vec::new(),
            binding_groups: Vec::new(),
            draw_mode,
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            depth_compare: wgpu::CompareFunction::LessEqual,
        }
    }
    pub fn set_topology(&mut self, topology: wgpu::PrimitiveTopology) -> &mut Self {
        self.topology = topology;
        self
    }
    pub fn set_cull_mode(&mut self, cull_mode: Option<wgpu::Face>) -> &mut Self {
        self.cull_mode = cull_mode;
        self
    }
    pub fn set_depth_compare(&mut self, depth_compare: wgpu::CompareFunction) -> &mut Self {
        self.depth_compare = depth_compare;
        self
    }
    pub fn add_binding_slot(
        &mut self,
        binding_slot: &BindingSlot<'a>,
    ) -> Result<&mut Self, anyhow::Error> {
        let bind_group = binding_slot.bind_group as usize;
        let already_bound = self
            .binding_groups
            .get(bind_group)
            .and_then(Option::as_ref)
            .is_some_and(|bindings| bindings.contains_key(&binding_slot.binding));
        if already_bound {
            bail!(
                "Binding {} of group {} already used!",
                binding_slot.binding,
                binding_slot.bind_group
            );
        }
        if bind_group >= self.binding_groups.len() {
            self.binding_groups.resize(bind_group + 1, None);
        }
        let bindings = self.binding_groups[bind_group].get_or_insert_with(BTreeMap::new);
        let bind_group_layout_entry = wgpu::BindGroupLayoutEntry {
            binding: binding_slot.binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: binding_slot.resource.binding_type(),
            count: None,
        };
        bindings.insert(
            binding_slot.binding,
            (
                binding_slot.resource.binding_resource(),
                bind_group_layout_entry,
            ),
        );
        Ok(self)
    }
    fn reserve_locations(
        &mut self,
        attributes: &[wgpu::VertexAttribute],
    ) -> Result<(), anyhow::Error> {
        let mut reserved = self.used_locations.clone();
        for attribute in attributes {
            if !reserved.insert(attribute.shader_location) {
                bail!("Location {} already used!", attribute.shader_location);
            }
        }
        self.used_locations = reserved;
        Ok(())
    }
    /// One buffer holding a single attribute.
    pub fn add_attribute<T>(
        &mut self,
        shader_location: u32,
        data: &[T],
        format: wgpu::VertexFormat,
    ) -> Result<&mut Self, anyhow::Error>
    where
        T: NoUninit,
    {
        self.add_vertex_buffer(
            data,
            format.size(),
            &[wgpu::VertexAttribute {
                format,
                offset: 0,
                shader_location,
            }],
        )
    }
    /// One buffer of interleaved attributes, `array_stride` bytes per vertex.
    pub fn add_vertex_buffer<T>(
        &mut self,
        data: &[T],
        array_stride: wgpu::BufferAddress,
        attributes: &[wgpu::VertexAttribute],
    ) -> Result<&mut Self, anyhow::Error>
    where
        T: NoUninit,
    {
        self.reserve_locations(attributes)?;
        let buffer = self
            .context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.vertex_buffers.push(VertexBufferSlot {
            buffer,
            array_stride,
            attributes: attributes.to_vec(),
        });
        Ok(self)
    }
    pub fn build(self) -> anyhow::Result<Drawable> {
        let device = &self.context.device;
        let mut bind_groups = BTreeMap::<u32, wgpu::BindGroup>::new();
        let mut bind_group_layouts = Vec::new();
        for (group_id, group) in self.binding_groups.into_iter().enumerate() {
            let group_id = u32::try_from(group_id).expect("Value should fit in u32");
            let mut bind_group_layout_entries = Vec::new();
            let mut bind_group_entries = Vec::new();
            for (bind_id, (bind, entry)) in group.unwrap_or_default() {
                bind_group_layout_entries.push(entry);
                bind_group_entries.push(wgpu::BindGroupEntry {
                    binding: bind_id,
                    resource: bind,
                });
            }
            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: None,
                    entries: &bind_group_layout_entries,
                });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: None,
                layout: &bind_group_layout,
                entries: &bind_group_entries,
            });
            bind_group_layouts.push(bind_group_layout);
            bind_groups.insert(group_id, bind_group);
        }

        let vertex_buffer_layouts = self
            .vertex_buffers
            .iter()
            .map(|slot| wgpu::VertexBufferLayout {
                array_stride: slot.array_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &slot.attributes,
            })
            .collect::<Vec<_>>();
        let vertex_state = wgpu::VertexState {
            module: self.vtx_shader_module,
            entry_point: None,
            buffers: &vertex_buffer_layouts,
            compilation_options: PipelineCompilationOptions::default(),
        };
        let fragment_state = wgpu::FragmentState {
            module: self.frg_shader_module,
            entry_point: None,
            targets: &[Some(wgpu::ColorTargetState {
                format: self.context.surface_config.format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: PipelineCompilationOptions::default(),
        };
        let pipeline = self.context.check_validation("Could not link shaders", || {
            let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: None,
                bind_group_layouts: &bind_group_layouts.iter().collect::<Vec<_>>(),
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                cache: None,
                label: Some("Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: vertex_state,
                fragment: Some(fragment_state),
                primitive: wgpu::PrimitiveState {
                    topology: self.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_mode,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DrawContext::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: self.depth_compare,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: self.context.multisample_config.get_multisample_count(),
                    ..Default::default()
                },
                multiview: None,
            })
        })?;

        Ok(Drawable {
            draw_mode: self.draw_mode,
            buffers: self
                .vertex_buffers
                .into_iter()
                .map(|slot| slot.buffer)
                .collect(),
            pipeline,
            bind_groups,
        })
    }
}

pub struct Drawable {
    draw_mode: DrawMode,
    buffers: Vec<wgpu::Buffer>,
    pipeline: wgpu::RenderPipeline,
    bind_groups: BTreeMap<u32, wgpu::BindGroup>,
}

impl Drawable {
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        for (group_id, bind_group) in &self.bind_groups {
            render_pass.set_bind_group(*group_id, bind_group, &[]);
        }
        for (slot, vertex_buffer) in self.buffers.iter().enumerate() {
            let slot = u32::try_from(slot).expect("Value should fit in u32");
            render_pass.set_vertex_buffer(slot, vertex_buffer.slice(..));
        }
        match &self.draw_mode {
            DrawMode::Direct { vertex_count } => {
                render_pass.draw(0..*vertex_count, 0..1);
            }
            DrawMode::Indexed {
                format,
                index_count,
                index_buffer,
            } => {
                render_pass.set_index_buffer(index_buffer.slice(..), *format);
                render_pass.draw_indexed(0..*index_count, 0, 0..1);
            }
        }
    }
}

pub struct MultiSampleConfig {
    multisample_count: u32,
}

impl MultiSampleConfig {
    #[must_use]
    pub fn get_multisample_count(&self) -> u32 {
        self.multisample_count.max(1)
    }
    #[must_use]
    pub fn is_multisample_enabled(&self) -> bool {
        self.multisample_count > 1
    }
}

trait DeviceLocalExt {
    fn create_depth_texture(
        &self,
        surface_config: &wgpu::SurfaceConfiguration,
        multisample_config: &MultiSampleConfig,
    ) -> wgpu::Texture;
    fn create_multisample_texture(
        &self,
        surface_config: &wgpu::SurfaceConfiguration,
        multisample_config: &MultiSampleConfig,
    ) -> Option<wgpu::Texture>;
}

impl DeviceLocalExt for wgpu::Device {
    fn create_depth_texture(
        &self,
        surface_config: &SurfaceConfiguration,
        multisample_config: &MultiSampleConfig,
    ) -> Texture {
        self.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: surface_config.width,
                height: surface_config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: multisample_config.get_multisample_count(),
            dimension: wgpu::TextureDimension::D2,
            view_formats: &[],
            format: DrawContext::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        })
    }

    fn create_multisample_texture(
        &self,
        surface_config: &SurfaceConfiguration,
        multisample_config: &MultiSampleConfig,
    ) -> Option<Texture> {
        multisample_config.is_multisample_enabled().then(|| {
            self.create_texture(&wgpu::TextureDescriptor {
                label: Some("Multisample Texture"),
                size: wgpu::Extent3d {
                    width: surface_config.width,
                    height: surface_config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: multisample_config.get_multisample_count(),
                dimension: wgpu::TextureDimension::D2,
                format: surface_config.format,
                view_formats: &[],
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            })
        })
    }
}

enum DrawTarget {
    Texture(wgpu::Texture),
    Surface(wgpu::Surface<'static>),
}

impl DrawTarget {
    fn new_texture_target(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::Texture(Self::create_texture(device, width, height))
    }
    fn configure(&mut self, device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) {
        match self {
            Self::Texture(texture) => {
                *texture =
                    Self::create_texture(device, surface_config.width, surface_config.height);
            }
            Self::Surface(surface) => {
                surface.configure(device, surface_config);
            }
        }
    }
    fn create_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Draw Target Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[wgpu::TextureFormat::Rgba8UnormSrgb],
        })
    }
}

pub struct DrawContext {
    multisample_texture: Option<wgpu::Texture>,
    draw_target: DrawTarget,
    clear_color: wgpu::Color,
    pub multisample_config: MultiSampleConfig,
    pub depth_texture: wgpu::Texture,
    pub queue: Rc<wgpu::Queue>,
    pub device: wgpu::Device,
    pub surface_config: wgpu::SurfaceConfiguration,
}

impl DrawContext {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub async fn new(
        window: Option<Arc<Window>>,
        dimensions: Dimensions,
        settings: &RenderSettings,
    ) -> anyhow::Result<Self> {
        let Dimensions { width, height } = dimensions;
        let multisample_config = MultiSampleConfig {
            multisample_count: settings.multisample_count,
        };
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = window
            .map(|w| instance.create_surface(w))
            .transpose()
            .context("Could not create rendering surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: surface.as_ref(),
            })
            .await
            .ok_or_else(|| anyhow!("Could not create WebGPU adapter"))?;
        let adapter_info = adapter.get_info();
        info!(
            "Graphics adapter: {} ({:?}, driver {})",
            adapter_info.name, adapter_info.backend, adapter_info.driver_info
        );
        debug!("{:?}", adapter.features());
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device Descriptor"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .context("Could not create WebGPU device")?;
        let mut draw_target = surface.map_or_else(
            || DrawTarget::new_texture_target(&device, width, height),
            DrawTarget::Surface,
        );
        let surface_format = if let DrawTarget::Surface(s) = &draw_target {
            let surface_caps = s.get_capabilities(&adapter);
            surface_caps
                .formats
                .iter()
                .find(|f| f.is_srgb())
                .or_else(|| surface_caps.formats.first())
                .copied()
                .ok_or_else(|| anyhow!("Surface is not compatible with the adapter"))?
        } else {
            wgpu::TextureFormat::Rgba8UnormSrgb
        };
        let surface_config = wgpu::SurfaceConfiguration {
            desired_maximum_frame_latency: 2,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            view_formats: vec![],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            present_mode: wgpu::PresentMode::Fifo,
        };
        draw_target.configure(&device, &surface_config);
        let depth_texture = device.create_depth_texture(&surface_config, &multisample_config);
        let multisample_texture =
            device.create_multisample_texture(&surface_config, &multisample_config);

        Ok(Self {
            multisample_config,
            multisample_texture,
            draw_target,
            device,
            queue: Rc::new(queue),
            surface_config,
            depth_texture,
            clear_color: settings.clear_color,
        })
    }

    /// Runs `f` and turns any validation error it raised into an error
    /// prefixed by `what`.
    pub fn check_validation<T, F>(&self, what: &str, f: F) -> anyhow::Result<T>
    where
        F: FnOnce() -> T,
    {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f();
        if let Some(error) = self.device.pop_error_scope().block_on() {
            bail!("{what}: {error}");
        }
        Ok(value)
    }

    pub fn create_shader_module(&self, wgsl_shader: &str) -> anyhow::Result<wgpu::ShaderModule> {
        self.check_validation("Could not compile shader", || {
            self.device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: None,
                    source: wgpu::ShaderSource::Wgsl(wgsl_shader.into()),
                })
        })
    }

    pub fn load_shader_module(&self, path: impl AsRef<Path>) -> anyhow::Result<wgpu::ShaderModule> {
        let path = path.as_ref();
        let wgsl_shader = fs::read_to_string(path)
            .with_context(|| format!("Could not read shader file {}", path.display()))?;
        debug!("Loaded shader {} ({} bytes)", path.display(), wgsl_shader.len());
        self.create_shader_module(&wgsl_shader)
            .with_context(|| format!("Invalid shader file {}", path.display()))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to {width}x{height}");
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.draw_target
            .configure(&self.device, &self.surface_config);
        self.depth_texture = self
            .device
            .create_depth_texture(&self.surface_config, &self.multisample_config);
        self.multisample_texture = self
            .device
            .create_multisample_texture(&self.surface_config, &self.multisample_config);
    }

    pub fn surface_ratio(&self) -> f32 {
        self.surface_dimensions().surface_ratio()
    }

    pub fn surface_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.surface_config.width,
            height: self.surface_config.height,
        }
    }

    fn acquire_surface_texture(&self) -> anyhow::Result<Option<wgpu::SurfaceTexture>> {
        let DrawTarget::Surface(surface) = &self.draw_target else {
            return Ok(None);
        };
        match surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                surface.configure(&self.device, &self.surface_config);
                Ok(None)
            }
            Err(err) => Err(err).context("Could not acquire next frame"),
        }
    }

    /// Returns `false` when the frame was skipped.
    pub fn render_scene<C>(&self, callback: C) -> anyhow::Result<bool>
    where
        C: FnOnce(wgpu::RenderPass<'_>),
    {
        let surface_texture = self.acquire_surface_texture()?;
        let displayed_view = match (&self.draw_target, &surface_texture) {
            (DrawTarget::Texture(texture), _) => {
                texture.create_view(&wgpu::TextureViewDescriptor::default())
            }
            (DrawTarget::Surface(_), Some(surface_texture)) => surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            (DrawTarget::Surface(_), None) => return Ok(false),
        };
        let depth_texture_view = self
            .depth_texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let multisample_view = self
            .multisample_texture
            .as_ref()
            .map(|texture| texture.create_view(&wgpu::TextureViewDescriptor::default()));
        let (pass_view, pass_resolve_target) = match &multisample_view {
            Some(multisample_view) => (multisample_view, Some(&displayed_view)),
            None => (&displayed_view, None),
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Command Encoder"),
            });
        let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render pass"),
            timestamp_writes: None,
            occlusion_query_set: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: pass_view,
                resolve_target: pass_resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
        });
        callback(render_pass);
        self.queue.submit(std::iter::once(encoder.finish()));
        if let Some(s) = surface_texture {
            s.present();
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_ratio_handles_zero_height() {
        let dimensions = Dimensions {
            width: 800,
            height: 400,
        };
        assert!((dimensions.surface_ratio() - 2.0).abs() < f32::EPSILON);
        let flat = Dimensions {
            width: 800,
            height: 0,
        };
        assert!((flat.surface_ratio() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn index_data_reports_format_and_size() {
        let small = [0u16, 1, 2, 2, 3, 0];
        let index_data = IndexData::U16(&small);
        assert_eq!(index_data.format(), wgpu::IndexFormat::Uint16);
        assert_eq!(index_data.size(), 6);
        assert_eq!(index_data.data().len(), 12);

        let large = [0u32, 1, 2];
        let index_data = IndexData::U32(&large);
        assert_eq!(index_data.format(), wgpu::IndexFormat::Uint32);
        assert_eq!(index_data.size(), 3);
        assert_eq!(index_data.data().len(), 12);
    }

    #[test]
    fn multisample_count_never_below_one() {
        let disabled = MultiSampleConfig {
            multisample_count: 0,
        };
        assert_eq!(disabled.get_multisample_count(), 1);
        assert!(!disabled.is_multisample_enabled());
        let enabled = MultiSampleConfig {
            multisample_count: 4,
        };
        assert_eq!(enabled.get_multisample_count(), 4);
        assert!(enabled.is_multisample_enabled());
    }

    #[test]
    fn matrix_uniform_keeps_column_layout() {
        let mut mat = Mat4::IDENTITY;
        mat.translate(1.0, 2.0, 3.0);
        let aligned = mat.apply_alignment();
        let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&aligned));
        assert_eq!(&bytes[12..16], &[1.0, 2.0, 3.0, 1.0]);
    }

    const TRIANGLE: [[f32; 4]; 3] = [
        [-0.5, -0.5, 0.0, 1.0],
        [0.5, -0.5, 0.0, 1.0],
        [0.0, 0.5, 0.0, 1.0],
    ];

    fn headless_context() -> DrawContext {
        let dimensions = Dimensions {
            width: 64,
            height: 64,
        };
        DrawContext::new(None, dimensions, &RenderSettings::default())
            .block_on()
            .expect("Headless draw context should be available")
    }

    fn attribute(shader_location: u32) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location,
        }
    }

    #[test]
    fn shader_location_can_only_be_used_once() -> anyhow::Result<()> {
        let context = headless_context();
        let shader = context.create_shader_module(crate::PASSTHROUGH_SHADER)?;
        let mut builder = DrawableBuilder::new(
            &context,
            &shader,
            &shader,
            DrawModeParams::Direct { vertex_count: 3 },
        );
        builder.add_attribute(0, &TRIANGLE, wgpu::VertexFormat::Float32x4)?;
        let err = builder
            .add_attribute(0, &TRIANGLE, wgpu::VertexFormat::Float32x4)
            .err()
            .expect("Location 0 is already taken");
        assert_eq!(err.to_string(), "Location 0 already used!");

        let stride = wgpu::VertexFormat::Float32x4.size();
        assert!(
            builder
                .add_vertex_buffer(&TRIANGLE, stride, &[attribute(1), attribute(1)])
                .is_err()
        );
        assert_eq!(builder.vertex_buffers.len(), 1);
        builder.add_vertex_buffer(&TRIANGLE, stride, &[attribute(1)])?;
        assert_eq!(builder.vertex_buffers.len(), 2);
        Ok(())
    }

    #[test]
    fn binding_slot_can_only_be_used_once() -> anyhow::Result<()> {
        let context = headless_context();
        let shader = context.create_shader_module(crate::PASSTHROUGH_SHADER)?;
        let uniform = Uniform::new(&context, 1.0_f32);
        let mut builder = DrawableBuilder::new(
            &context,
            &shader,
            &shader,
            DrawModeParams::Direct { vertex_count: 3 },
        );
        let slot = BindingSlot {
            bind_group: 1,
            binding: 2,
            resource: &uniform,
        };
        builder.add_binding_slot(&slot)?;
        assert!(builder.add_binding_slot(&slot).is_err());
        assert_eq!(builder.binding_groups.len(), 2);
        assert!(builder.binding_groups[0].is_none());
        assert_eq!(builder.binding_groups[1].as_ref().map(BTreeMap::len), Some(1));
        Ok(())
    }

    #[test]
    fn invalid_shader_is_an_error() {
        let context = headless_context();
        let err = context
            .create_shader_module("fn broken(")
            .err()
            .expect("Broken WGSL should not compile");
        assert!(err.to_string().starts_with("Could not compile shader"));
        assert!(
            context
                .load_shader_module("/nonexistent/broken.wgsl")
                .is_err()
        );
    }

    #[test]
    fn empty_resize_is_ignored() -> anyhow::Result<()> {
        let mut context = headless_context();
        context.resize(0, 32);
        context.resize(32, 0);
        let dimensions = context.surface_dimensions();
        assert_eq!((dimensions.width, dimensions.height), (64, 64));
        context.resize(32, 16);
        let dimensions = context.surface_dimensions();
        assert_eq!((dimensions.width, dimensions.height), (32, 16));
        assert!(context.render_scene(|_| {})?);
        Ok(())
    }
}
