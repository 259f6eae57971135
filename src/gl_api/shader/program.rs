use crate::gl_api::error::{GlError, GlResult};
use crate::gl_api::layout::VertexAttribute;
use crate::gl_api::shader::shader::{CompiledShader, Shader, ShaderError, ShaderType};
use crate::gl_api::uniform::{BoundUniform, Uniform};
use gl;
use gl::types::*;
use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;

pub struct UniformBlockBuilder<'p> {
    program: &'p RawLinkedProgram,
}

#[derive(Clone, Debug)]
pub enum UniformError {
    NameError(String),
    Gl(GlError),
}

impl From<GlError> for UniformError {
    fn from(err: GlError) -> Self {
        UniformError::Gl(err)
    }
}

impl<'p> UniformBlockBuilder<'p> {
    pub fn uniform<U: BoundUniform>(&self, name: &str) -> Result<Uniform<U>, UniformError> {
        self.program.0.bind()?;
        let c_string = CString::new(name).map_err(|_| UniformError::NameError(name.to_owned()))?;
        let location = unsafe { gl_call!(GetUniformLocation(self.program.0.id, c_string.as_ptr()))? };
        if location == -1 {
            Err(UniformError::NameError(name.to_owned()))
        } else {
            Ok(Uniform::new(location))
        }
    }
}

pub struct ProgramBuilder {
    program: RawProgram,
    vertex: Shader,
    fragment: Shader,
    attributes: Vec<(GLuint, String)>,
}

impl ProgramBuilder {
    pub fn new(vertex: Shader, fragment: Shader) -> Option<Self> {
        assert_eq!(vertex.shader_type, ShaderType::Vertex);
        assert_eq!(fragment.shader_type, ShaderType::Fragment);
        Some(ProgramBuilder {
            program: RawProgram::new()?,
            vertex,
            fragment,
            attributes: Vec::new(),
        })
    }

    /// Pins the attribute `name` to `slot`. Shaders older than GLSL 3.30 have
    /// no `layout(location = ...)`, so this is how they agree with the slots
    /// a `VertexArray` fills.
    pub fn with_attribute(mut self, slot: GLuint, name: &str) -> Self {
        self.attributes.push((slot, name.to_owned()));
        self
    }

    pub fn build<I, E, F: FnOnce(UniformBlockBuilder) -> Result<E, ProgramError>>(self, func: F) -> Result<Program<I, E>, ProgramError> {
        self.program.attach_shader(&self.vertex.compile()?)?;
        self.program.attach_shader(&self.fragment.compile()?)?;
        for (slot, name) in &self.attributes {
            self.program.bind_attribute(*slot, name)?;
        }
        // The uniform interface can only be built from a linked program, so
        // it is handed to the caller through this closure.
        let raw = self.program.link()?;
        let environment = func(UniformBlockBuilder { program: &raw })?;
        Ok(Program {
            raw,
            environment,
            _marker: PhantomData,
        })
    }
}

pub struct Program<I, E> {
    raw: RawLinkedProgram,
    environment: E,
    _marker: PhantomData<I>,
}

impl<In: VertexAttribute, Env> Program<In, Env> {
    pub fn env(&self) -> &Env {
        &self.environment
    }

    pub fn bind(&self) -> GlResult<()> {
        self.raw.0.bind()
    }
}

#[derive(Debug)]
pub struct RawProgram {
    id: GLuint,
    _marker: ::std::marker::PhantomData<*mut ()>,
}

impl RawProgram {
    pub(crate) fn new() -> Option<Self> {
        let id = unsafe { gl_call!(CreateProgram()).ok()? };
        match id {
            0 => None,
            id => Some(RawProgram {
                id,
                _marker: ::std::marker::PhantomData,
            }),
        }
    }

    pub(crate) fn bind(&self) -> GlResult<()> {
        unsafe { gl_call!(UseProgram(self.id)) }
    }

    pub(crate) fn attach_shader(&self, shader: &CompiledShader) -> Result<(), ProgramError> {
        unsafe {
            gl_call!(AttachShader(self.id, shader.shader.id))?;
        }
        Ok(())
    }

    pub(crate) fn bind_attribute(&self, slot: GLuint, name: &str) -> Result<(), ProgramError> {
        let c_name = CString::new(name).map_err(|_| ProgramError::Other(format!("invalid attribute name {:?}", name)))?;
        unsafe {
            gl_call!(BindAttribLocation(self.id, slot, c_name.as_ptr()))?;
        }
        Ok(())
    }

    pub(crate) fn link(self) -> Result<RawLinkedProgram, ProgramError> {
        unsafe {
            assert!(self.id != 0);
            gl_call!(LinkProgram(self.id))?;
            check_program_status(self.id, gl::LINK_STATUS)?;
        }
        self.bind()?;
        Ok(RawLinkedProgram(self))
    }
}

impl Drop for RawProgram {
    fn drop(&mut self) {
        unsafe {
            let _ = gl_call!(DeleteProgram(self.id));
        }
    }
}

#[derive(Debug)]
pub struct RawLinkedProgram(RawProgram);

#[derive(Debug)]
pub enum ProgramError {
    Uniform(UniformError),
    Other(String),
    Shader(ShaderError),
    Gl(GlError),
}

impl From<GlError> for ProgramError {
    fn from(err: GlError) -> Self {
        ProgramError::Gl(err)
    }
}

impl From<ShaderError> for ProgramError {
    fn from(err: ShaderError) -> Self {
        ProgramError::Shader(err)
    }
}

impl From<UniformError> for ProgramError {
    fn from(err: UniformError) -> Self {
        ProgramError::Uniform(err)
    }
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProgramError::Uniform(UniformError::NameError(name)) => write!(f, "no active uniform named {:?}", name),
            ProgramError::Uniform(UniformError::Gl(err)) => write!(f, "uniform lookup failed: {}", err),
            ProgramError::Other(log) => write!(f, "program failed to link:\n{}", log),
            ProgramError::Shader(err) => write!(f, "{}", err),
            ProgramError::Gl(err) => write!(f, "{}", err),
        }
    }
}

impl ::std::error::Error for ProgramError {}

fn check_program_status(id: GLuint, ty: GLenum) -> Result<(), ProgramError> {
    let mut status = 1;
    unsafe {
        gl_call!(GetProgramiv(id, ty, &mut status))?;
    }

    if status == 0 {
        Err(ProgramError::Other(program_info_log(id).unwrap_or_default()))
    } else {
        Ok(())
    }
}

fn program_info_log(id: GLuint) -> Option<String> {
    unsafe {
        let mut length = 0;
        gl_call!(GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut length)).ok()?;
        if length <= 0 {
            None
        } else {
            let mut buffer = vec![0u8; length as usize];
            let mut written = 0;
            gl_call!(GetProgramInfoLog(id, length, &mut written, buffer.as_mut_ptr() as *mut GLchar)).ok()?;
            buffer.truncate(written.max(0) as usize);
            Some(String::from_utf8_lossy(&buffer).into_owned())
        }
    }
}
