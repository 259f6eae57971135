use gl;
use gl::types::GLenum;
use std::fmt;

pub type GlResult<T> = Result<T, GlError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GlError {
    code: GLenum,
}

impl GlError {
    fn get_raw() -> GLenum {
        unsafe { gl::GetError() }
    }

    /// Wraps a raw `glGetError` value; `None` for `GL_NO_ERROR`.
    pub fn from_code(code: GLenum) -> Option<Self> {
        match code {
            gl::NO_ERROR => None,
            code => Some(GlError { code }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self.code {
            gl::INVALID_ENUM => "GL_INVALID_ENUM",
            gl::INVALID_VALUE => "GL_INVALID_VALUE",
            gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
            gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            _ => "GL_UNKNOWN_ERROR",
        }
    }

    pub fn map_value<T>(val: T) -> GlResult<T> {
        match Self::from_code(Self::get_raw()) {
            None => Ok(val),
            // GL specification states that it is undefined to issue any GL
            // calls after an out of memory error is received.
            Some(err) if err.code == gl::OUT_OF_MEMORY => {
                log::error!("{}, aborting", err);
                ::std::process::abort()
            }
            Some(err) => Err(err),
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.code)
    }
}

impl ::std::error::Error for GlError {}

macro_rules! gl_call {
    ($name:ident($($args:expr),*)) => {{
        $crate::gl_api::error::GlError::map_value(::gl::$name($($args),*))
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_error_is_none() {
        assert_eq!(GlError::from_code(gl::NO_ERROR), None);
    }

    #[test]
    fn known_codes_have_names() {
        let err = GlError::from_code(gl::INVALID_OPERATION).unwrap();
        assert_eq!(err.name(), "GL_INVALID_OPERATION");
        assert_eq!(err.to_string(), "GL_INVALID_OPERATION (0x0502)");
    }

    #[test]
    fn unknown_code_is_still_an_error() {
        let err = GlError::from_code(0xBEEF).unwrap();
        assert_eq!(err.name(), "GL_UNKNOWN_ERROR");
    }
}
