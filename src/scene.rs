use cgmath::{Vector2, Vector4};
use gl::types::*;
use std::fmt;
use crate::config::{DrawMode, RenderConfig};
use crate::gl_api::buffer::VertexBuffer;
use crate::gl_api::error::{GlError, GlResult};
use crate::gl_api::immediate::{LegacyFns, Primitive};
use crate::gl_api::loader::Capabilities;
use crate::gl_api::shader::program::{Program, ProgramBuilder, ProgramError};
use crate::gl_api::shader::shader::{ShaderError, ShaderType};
use crate::gl_api::shader::ShaderSource;
use crate::gl_api::uniform::Uniform;
use crate::gl_api::vertex_array::VertexArray;

const VERTEX_SHADER: &str = include_str!("../res/triangle.glslv");
const FRAGMENT_SHADER: &str = include_str!("../res/triangle.glslf");

vertex! {
    vertex Point {
        pos: Vector2<f32>,
    }
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { pos: Vector2::new(x, y) }
    }
}

pub fn points(config: &RenderConfig) -> Vec<Point> {
    config.vertices.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

#[derive(Debug)]
pub enum SceneError {
    Unsupported(String),
    ProgramCreation,
    Program(ProgramError),
    Gl(GlError),
}

impl From<GlError> for SceneError {
    fn from(err: GlError) -> Self {
        SceneError::Gl(err)
    }
}

impl From<ProgramError> for SceneError {
    fn from(err: ProgramError) -> Self {
        SceneError::Program(err)
    }
}

impl From<ShaderError> for SceneError {
    fn from(err: ShaderError) -> Self {
        SceneError::Program(ProgramError::Shader(err))
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SceneError::Unsupported(msg) => write!(f, "{}", msg),
            SceneError::ProgramCreation => write!(f, "could not create a shader program"),
            SceneError::Program(err) => write!(f, "{}", err),
            SceneError::Gl(err) => write!(f, "{}", err),
        }
    }
}

impl ::std::error::Error for SceneError {}

/// Decides which path actually draws, given what the driver provides.
pub fn select_mode(requested: DrawMode, caps: &Capabilities, fallback: bool) -> Result<DrawMode, SceneError> {
    resolve_mode(requested, caps.buffer_objects(), caps.legacy.is_some(), fallback)
}

fn resolve_mode(requested: DrawMode, buffer_objects: bool, legacy: bool, fallback: bool) -> Result<DrawMode, SceneError> {
    match requested {
        DrawMode::Buffer if buffer_objects => Ok(DrawMode::Buffer),
        DrawMode::Buffer if fallback && legacy => {
            log::warn!("buffer objects are unavailable, falling back to immediate mode");
            Ok(DrawMode::Immediate)
        }
        DrawMode::Buffer => Err(SceneError::Unsupported(
            "buffer objects are unavailable on this context".to_owned(),
        )),
        DrawMode::Immediate if legacy => Ok(DrawMode::Immediate),
        DrawMode::Immediate => Err(SceneError::Unsupported(
            "immediate mode needs a compatibility profile context".to_owned(),
        )),
    }
}

pub trait Renderer {
    fn mode(&self) -> DrawMode;
    fn draw(&mut self) -> GlResult<()>;
}

struct TriangleUniforms {
    color: Uniform<Vector4<f32>>,
}

/// Draws from a vertex buffer that is filled once at startup.
pub struct BufferRenderer {
    program: Program<Point, TriangleUniforms>,
    vao: VertexArray,
    vbo: VertexBuffer<Point>,
}

impl BufferRenderer {
    pub fn new(config: &RenderConfig, points: &[Point]) -> Result<Self, SceneError> {
        let vertex = ShaderSource::or_embedded(config.vertex_shader.as_ref(), VERTEX_SHADER)
            .create(ShaderType::Vertex)?;
        let fragment = ShaderSource::or_embedded(config.fragment_shader.as_ref(), FRAGMENT_SHADER)
            .create(ShaderType::Fragment)?;

        let program: Program<Point, TriangleUniforms> = ProgramBuilder::new(vertex, fragment)
            .ok_or(SceneError::ProgramCreation)?
            .with_attribute(0, "position")
            .build(|builder| {
                Ok(TriangleUniforms {
                    color: builder.uniform("color")?,
                })
            })?;
        program.bind()?;
        program.env().color.set(Vector4::from(config.color))?;

        let mut vao = VertexArray::new()?;
        let mut vbo = VertexBuffer::new()?;
        vbo.upload(points, config.usage.into())?;
        vao.add_buffer(&vbo)?;

        Ok(BufferRenderer { program, vao, vbo })
    }
}

impl Renderer for BufferRenderer {
    fn mode(&self) -> DrawMode {
        DrawMode::Buffer
    }

    fn draw(&mut self) -> GlResult<()> {
        self.vao.bind()?;
        self.program.bind()?;
        unsafe { gl_call!(DrawArrays(gl::TRIANGLES, 0, self.vbo.len() as GLsizei)) }
    }
}

/// Sends every vertex again each frame with `glBegin`/`glEnd`.
pub struct ImmediateRenderer {
    legacy: LegacyFns,
    points: Vec<Point>,
    color: Vector4<f32>,
}

impl ImmediateRenderer {
    pub fn new(config: &RenderConfig, legacy: LegacyFns, points: Vec<Point>) -> Self {
        ImmediateRenderer {
            legacy,
            points,
            color: Vector4::from(config.color),
        }
    }
}

impl Renderer for ImmediateRenderer {
    fn mode(&self) -> DrawMode {
        DrawMode::Immediate
    }

    fn draw(&mut self) -> GlResult<()> {
        let mut block = self.legacy.begin(Primitive::Triangles);
        block.color(self.color);
        for point in &self.points {
            block.vertex(point.pos);
        }
        block.finish()
    }
}

pub fn build(config: &RenderConfig, caps: &Capabilities) -> Result<Box<dyn Renderer>, SceneError> {
    let mode = select_mode(config.mode, caps, config.fallback_to_immediate)?;
    let points = points(config);
    log::info!("drawing {} vertices in {} mode", points.len(), mode);

    match mode {
        DrawMode::Buffer => Ok(Box::new(BufferRenderer::new(config, &points)?)),
        DrawMode::Immediate => {
            let legacy = caps
                .legacy
                .ok_or_else(|| SceneError::Unsupported("legacy entry points are not loaded".to_owned()))?;
            Ok(Box::new(ImmediateRenderer::new(config, legacy, points)))
        }
    }
}

pub fn set_clear_color(color: [f32; 4]) -> GlResult<()> {
    unsafe { gl_call!(ClearColor(color[0], color[1], color[2], color[3])) }
}

pub fn clear() -> GlResult<()> {
    unsafe { gl_call!(Clear(gl::COLOR_BUFFER_BIT)) }
}

pub fn set_viewport(width: u32, height: u32) -> GlResult<()> {
    log::debug!("viewport resized to {}x{}", width, height);
    unsafe { gl_call!(Viewport(0, 0, width as GLsizei, height as GLsizei)) }
}
