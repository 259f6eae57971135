use super::error::GlResult;
use gl;
use gl::types::*;
use std::marker::PhantomData;

mod sealed {
    pub trait Sealed {}
}

pub trait BufferTarget: sealed::Sealed {
    const TARGET: GLenum;
}

macro_rules! buffer_target {
    ($name:ident : $enum:expr) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
        pub struct $name;
        impl sealed::Sealed for $name {}
        impl BufferTarget for $name {
            const TARGET: GLenum = $enum;
        }
    };
}

buffer_target!(Array: gl::ARRAY_BUFFER);

/// Usage type for buffers, provided as a performance hint. These values do not affect the behavior
/// of the buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum UsageType {
    /// The data store contents will be specified once by the application, and sourced at most a few times.
    StreamDraw = gl::STREAM_DRAW,
    /// The data store contents will be specified once by the application, and sourced many times.
    StaticDraw = gl::STATIC_DRAW,
    /// The data store contents will be respecified repeatedly by the application, and sourced many times.
    DynamicDraw = gl::DYNAMIC_DRAW,
}

/// Size in bytes of `count` tightly packed `T`s.
pub fn byte_len<T>(count: usize) -> usize {
    ::std::mem::size_of::<T>() * count
}

#[derive(Debug, Eq, PartialEq, Hash)]
pub struct Buffer<T, B: BufferTarget> {
    pub(crate) id: GLuint,
    length: usize,
    _phantom: PhantomData<(*mut T, B)>,
}

impl<T, B: BufferTarget> Buffer<T, B> {
    pub fn new() -> GlResult<Self> {
        let mut id = 0;
        unsafe {
            gl_call!(GenBuffers(1, &mut id))?;
        }
        Ok(Buffer {
            id,
            length: 0,
            _phantom: PhantomData,
        })
    }

    pub fn bind(&self) -> GlResult<()> {
        unsafe { gl_call!(BindBuffer(B::TARGET, self.id)) }
    }

    /// Copies data from `data` to the gpu's memory
    pub fn upload(&mut self, data: &[T], usage_type: UsageType) -> GlResult<()> {
        self.bind()?;
        log::debug!(
            "uploading {} elements ({} bytes) to buffer {} as {:?}",
            data.len(),
            byte_len::<T>(data.len()),
            self.id,
            usage_type
        );
        unsafe {
            // Could fail if OOM
            gl_call!(BufferData(
                B::TARGET,
                byte_len::<T>(data.len()) as GLsizeiptr,
                data.as_ptr() as *const _,
                usage_type as GLenum
            ))?;
        }
        self.length = data.len();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.length
    }

    /// Wraps a buffer name without calling `glGenBuffers`.
    #[cfg(test)]
    pub(crate) fn from_id(id: GLuint) -> Self {
        Buffer {
            id,
            length: 0,
            _phantom: PhantomData,
        }
    }
}

impl<T, B: BufferTarget> Drop for Buffer<T, B> {
    fn drop(&mut self) {
        // glGetError also reports errors left pending by earlier calls
        if let Err(err) = unsafe { gl_call!(DeleteBuffers(1, &self.id)) } {
            log::warn!("deleting buffer {}: {}", self.id, err);
        }
    }
}

pub type VertexBuffer<T> = Buffer<T, Array>;
