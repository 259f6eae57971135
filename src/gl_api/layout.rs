use cgmath::Vector2;
use gl::types::*;
use crate::gl_api::error::GlResult;

/// One call to `glVertexAttrib{I}Pointer`, described as plain data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AttribFormat {
    /// Attribute index the shader reads from.
    pub slot: GLuint,
    /// How many components the attribute has (1-4). This is not a size in
    /// bytes.
    pub components: GLint,
    pub ty: GLenum,
    pub normalized: bool,
    /// Integer attributes go through `glVertexAttribIPointer` and are not
    /// converted to floats.
    pub integer: bool,
    /// Bytes between the start of one vertex and the start of the next.
    pub stride: GLsizei,
    /// Byte offset of the attribute inside a vertex.
    pub offset: usize,
}

impl AttribFormat {
    pub fn apply(&self) -> GlResult<()> {
        unsafe {
            gl_call!(EnableVertexAttribArray(self.slot))?;
            if self.integer {
                gl_call!(VertexAttribIPointer(
                    self.slot,
                    self.components,
                    self.ty,
                    self.stride,
                    self.offset as *const _
                ))
            } else {
                gl_call!(VertexAttribPointer(
                    self.slot,
                    self.components,
                    self.ty,
                    self.normalized as GLboolean,
                    self.stride,
                    self.offset as *const _
                ))
            }
        }
    }
}

pub unsafe trait VertexAttribute {
    /// Push the formats for this type's attributes, starting at `base_slot`,
    /// onto `out`. Returns the number of slots used, so the caller can find
    /// the slot of the next attribute.
    fn describe(base_slot: u32, offset: usize, stride: GLsizei, out: &mut Vec<AttribFormat>) -> u32;
    const NUM_ATTRS: usize;
}

/// The attribute layout of a buffer of tightly packed `T`s.
pub fn attrib_formats<T: VertexAttribute>(base_slot: u32) -> Vec<AttribFormat> {
    let mut formats = Vec::with_capacity(T::NUM_ATTRS);
    T::describe(base_slot, 0, ::std::mem::size_of::<T>() as GLsizei, &mut formats);
    formats
}

macro_rules! vertex {
    (vertex $name:ident {
        $($attrib:ident: $attrib_type:ty,)*
    }) => {
        #[derive(Copy, Clone, Debug, PartialEq)]
        #[repr(C)]
        pub struct $name {
            $(pub $attrib: $attrib_type),*
        }

        unsafe impl $crate::gl_api::layout::VertexAttribute for $name {
            fn describe(
                mut slot: u32,
                offset: usize,
                stride: ::gl::types::GLsizei,
                out: &mut Vec<$crate::gl_api::layout::AttribFormat>,
            ) -> u32 {
                let base = slot;
                $(
                    let field_offset = offset + ::std::mem::offset_of!($name, $attrib);
                    slot += <$attrib_type as $crate::gl_api::layout::VertexAttribute>::describe(slot, field_offset, stride, out);
                )*
                slot - base
            }

            const NUM_ATTRS: usize = 0 $(+ <$attrib_type as $crate::gl_api::layout::VertexAttribute>::NUM_ATTRS)*;
        }
    }
}

macro_rules! layout_simple {
    (@IMPL $type:ty, $gl_type:ident, $amount:expr, $integer:expr) => {
        unsafe impl VertexAttribute for $type {
            fn describe(slot: u32, offset: usize, stride: GLsizei, out: &mut Vec<AttribFormat>) -> u32 {
                out.push(AttribFormat {
                    slot,
                    components: $amount,
                    ty: ::gl::$gl_type,
                    normalized: false,
                    integer: $integer,
                    stride,
                    offset,
                });
                1
            }

            const NUM_ATTRS: usize = 1;
        }
    };
    ($type:ty: iptr $gl_type:ident $amount:expr) => {
        layout_simple!(@IMPL $type, $gl_type, $amount, true);
    };
    ($type:ty: $gl_type:ident $amount:expr) => {
        layout_simple!(@IMPL $type, $gl_type, $amount, false);
    };
}

unsafe impl VertexAttribute for () {
    fn describe(_slot: u32, _offset: usize, _stride: GLsizei, _out: &mut Vec<AttribFormat>) -> u32 {
        0
    }
    const NUM_ATTRS: usize = 0;
}

layout_simple!([f32; 3]: FLOAT 3);
layout_simple!(Vector2<f32>: FLOAT 2);
layout_simple!(u32: iptr UNSIGNED_INT 1);

#[cfg(test)]
mod tests {
    use super::*;

    vertex! {
        vertex Interleaved {
            coords: [f32; 3],
            texture: [f32; 3],
            normal: [f32; 3],
        }
    }

    vertex! {
        vertex Tagged {
            pos: Vector2<f32>,
            id: u32,
        }
    }

    #[test]
    fn interleaved_vertex_uses_whole_vertex_stride() {
        let formats = attrib_formats::<Interleaved>(0);
        assert_eq!(Interleaved::NUM_ATTRS, 3);
        assert_eq!(formats.len(), 3);

        let offsets = formats.iter().map(|f| f.offset).collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert!(formats.iter().all(|f| f.stride == 36));
        assert!(formats.iter().all(|f| f.components == 3 && f.ty == gl::FLOAT));
        assert_eq!(formats.iter().map(|f| f.slot).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn integer_attributes_are_not_normalized_floats() {
        let formats = attrib_formats::<Tagged>(4);
        assert_eq!(formats[0].slot, 4);
        assert!(!formats[0].integer);
        assert_eq!(formats[1].slot, 5);
        assert!(formats[1].integer);
        assert_eq!(formats[1].ty, gl::UNSIGNED_INT);
        assert_eq!(formats[1].offset, 8);
        assert_eq!(formats[1].stride, 12);
    }

    #[test]
    fn unit_has_no_attributes() {
        assert!(attrib_formats::<()>(0).is_empty());
    }
}
