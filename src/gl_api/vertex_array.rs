use super::error::GlResult;
use gl::types::*;
use crate::gl_api::buffer::VertexBuffer;
use crate::gl_api::layout::{self, VertexAttribute};

#[derive(Debug)]
pub struct VertexArray {
    pub(crate) id: GLuint,
    index: u32,
    _marker: ::std::marker::PhantomData<*mut ()>,
}

impl VertexArray {
    pub fn new() -> GlResult<Self> {
        let mut id = 0;
        unsafe {
            gl_call!(GenVertexArrays(1, &mut id))?;
        }
        Ok(VertexArray {
            id,
            index: 0,
            _marker: ::std::marker::PhantomData,
        })
    }

    pub fn bind(&self) -> GlResult<()> {
        unsafe { gl_call!(BindVertexArray(self.id)) }
    }

    /// Records the attribute layout of `T` for `buffer`, using the slots
    /// after the ones already taken by earlier buffers.
    // NOTE: need explicit lifetimes here because the buffer needs to outlive
    // `self`
    pub fn add_buffer<'s, 'b: 's, T: VertexAttribute>(&'s mut self, buffer: &'b VertexBuffer<T>) -> GlResult<()> {
        self.bind()?;
        buffer.bind()?;

        let formats = layout::attrib_formats::<T>(self.index);
        for format in &formats {
            log::debug!("vertex array {}: {:?}", self.id, format);
            format.apply()?;
        }
        self.index += formats.len() as u32;

        Ok(())
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if let Err(err) = unsafe { gl_call!(DeleteVertexArrays(1, &self.id)) } {
            log::warn!("deleting vertex array {}: {}", self.id, err);
        }
    }
}
