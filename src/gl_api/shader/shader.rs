use gl;
use gl::types::*;
use std::ffi::CString;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use crate::gl_api::error::GlError;

pub type ShaderResult<T> = Result<T, ShaderError>;

#[derive(Debug)]
pub enum ShaderError {
    Creation(ShaderType),
    Compile(ShaderType, String),
    NulInSource,
    Io(io::Error),
    Gl(GlError),
}

impl From<GlError> for ShaderError {
    fn from(err: GlError) -> Self {
        ShaderError::Gl(err)
    }
}

impl From<io::Error> for ShaderError {
    fn from(err: io::Error) -> Self {
        ShaderError::Io(err)
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderError::Creation(ty) => write!(f, "could not create {:?} shader", ty),
            ShaderError::Compile(ty, log) => write!(f, "{:?} shader failed to compile:\n{}", ty, log),
            ShaderError::NulInSource => write!(f, "shader source contains a nul byte"),
            ShaderError::Io(err) => write!(f, "could not read shader source: {}", err),
            ShaderError::Gl(err) => write!(f, "{}", err),
        }
    }
}

impl ::std::error::Error for ShaderError {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum ShaderType {
    Vertex = gl::VERTEX_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
}

#[derive(Debug)]
pub struct Shader {
    pub(crate) id: GLuint,
    pub shader_type: ShaderType,
    _marker: ::std::marker::PhantomData<*mut ()>,
}

impl Shader {
    pub fn new(shader_type: ShaderType) -> ShaderResult<Self> {
        let id = unsafe { gl_call!(CreateShader(shader_type as GLenum))? };
        match id {
            0 => Err(ShaderError::Creation(shader_type)),
            id => Ok(Shader {
                id,
                shader_type,
                _marker: ::std::marker::PhantomData,
            }),
        }
    }

    pub fn source(&self, source: &str) -> ShaderResult<()> {
        let c_source = CString::new(source).map_err(|_| ShaderError::NulInSource)?;
        unsafe {
            gl_call!(ShaderSource(self.id, 1, &c_source.as_ptr(), ::std::ptr::null()))?;
        }
        Ok(())
    }

    pub fn source_from_file<P: AsRef<Path>>(&self, path: P) -> ShaderResult<()> {
        let source = fs::read_to_string(path)?;
        self.source(&source)
    }

    pub fn compile(self) -> ShaderResult<CompiledShader> {
        unsafe {
            gl_call!(CompileShader(self.id))?;
            let mut status = 0;
            gl_call!(GetShaderiv(self.id, gl::COMPILE_STATUS, &mut status))?;
            if status == 0 {
                let log = shader_info_log(self.id).unwrap_or_default();
                return Err(ShaderError::Compile(self.shader_type, log));
            }
        }
        Ok(CompiledShader { shader: self })
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        // Shaders attached to a program are only flagged for deletion here,
        // the program keeps them alive until it is deleted itself.
        unsafe {
            let _ = gl_call!(DeleteShader(self.id));
        }
    }
}

#[derive(Debug)]
pub struct CompiledShader {
    pub(crate) shader: Shader,
}

fn shader_info_log(id: GLuint) -> Option<String> {
    unsafe {
        let mut length = 0;
        gl_call!(GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut length)).ok()?;
        if length <= 0 {
            return None;
        }
        let mut buffer = vec![0u8; length as usize];
        let mut written = 0;
        gl_call!(GetShaderInfoLog(id, length, &mut written, buffer.as_mut_ptr() as *mut GLchar)).ok()?;
        buffer.truncate(written.max(0) as usize);
        Some(String::from_utf8_lossy(&buffer).into_owned())
    }
}
