use cgmath::Vector4;
use crate::gl_api::error::{GlError, GlResult};

pub type UniformLocation = ::gl::types::GLint;

pub struct Uniform<T: ?Sized> {
    pub(crate) location: UniformLocation,
    _marker: ::std::marker::PhantomData<T>,
}

impl<T: ?Sized> Uniform<T> {
    pub(crate) fn new(location: UniformLocation) -> Self {
        Uniform { location, _marker: ::std::marker::PhantomData }
    }

    /// Sets the uniform on the currently bound program. Fails if the GLSL
    /// declaration does not match `T`.
    pub fn set(&self, value: T) -> GlResult<()> where T: BoundUniform + Sized {
        value.set(self)
    }
}

pub trait BoundUniform {
    fn set(&self, uniform: &Uniform<Self>) -> GlResult<()>;
}

macro_rules! uniform {
    // Macro cleanliness means that we can't use `self` in the macro invocation scope
    // without first introducing it into scope there (slightly unfortunate)
    ($self:ident, $type:ty => $func:ident($($expr:expr),*)) => (
        impl BoundUniform for $type {
            #[inline(always)]
            fn set(&$self, uniform: &Uniform<Self>) -> GlResult<()> {
                unsafe { GlError::map_value(::gl::$func(uniform.location, $($expr,)*)) }
            }
        }
    )
}

uniform!(self, Vector4<f32> => Uniform4f(self.x, self.y, self.z, self.w));
