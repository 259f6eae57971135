//! Fixed-function immediate mode: `glBegin`, one call per vertex, `glEnd`.
//!
//! The `gl` crate only generates core profile bindings, so these entry points
//! are loaded by hand from the same proc address loader. They only resolve on
//! a compatibility profile context.

use cgmath::{Vector2, Vector4};
use gl;
use gl::types::*;
use std::fmt;
use std::mem;
use std::os::raw::c_void;
use crate::gl_api::error::{GlError, GlResult};

type BeginFn = unsafe extern "system" fn(GLenum);
type EndFn = unsafe extern "system" fn();
type Vertex2fFn = unsafe extern "system" fn(GLfloat, GLfloat);
type Color4fFn = unsafe extern "system" fn(GLfloat, GLfloat, GLfloat, GLfloat);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissingEntryPoint(pub &'static str);

impl fmt::Display for MissingEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "legacy entry point `{}` is not available", self.0)
    }
}

impl ::std::error::Error for MissingEntryPoint {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum Primitive {
    Triangles = gl::TRIANGLES,
}

#[derive(Copy, Clone)]
pub struct LegacyFns {
    begin: BeginFn,
    end: EndFn,
    vertex2f: Vertex2fFn,
    color4f: Color4fFn,
}

impl fmt::Debug for LegacyFns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LegacyFns").finish_non_exhaustive()
    }
}

macro_rules! load_legacy {
    ($loader:ident, $name:expr => $ty:ty) => {{
        let ptr = $loader($name);
        if ptr.is_null() {
            return Err(MissingEntryPoint($name));
        }
        // SAFETY: the loader resolved `$name`, whose C signature is `$ty`.
        unsafe { mem::transmute::<*const c_void, $ty>(ptr) }
    }};
}

impl LegacyFns {
    pub fn load<F>(mut loader: F) -> Result<Self, MissingEntryPoint>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        Ok(LegacyFns {
            begin: load_legacy!(loader, "glBegin" => BeginFn),
            end: load_legacy!(loader, "glEnd" => EndFn),
            vertex2f: load_legacy!(loader, "glVertex2f" => Vertex2fFn),
            color4f: load_legacy!(loader, "glColor4f" => Color4fFn),
        })
    }

    /// Opens a `glBegin`/`glEnd` block. `glEnd` is issued when the returned
    /// guard is dropped or `finish`ed.
    pub fn begin(&self, primitive: Primitive) -> ImmediateBlock<'_> {
        unsafe { (self.begin)(primitive as GLenum) };
        ImmediateBlock { fns: self, ended: false }
    }
}

/// An open `glBegin` block. Only vertex and color commands are legal until it
/// ends, so nothing in here touches `glGetError`.
pub struct ImmediateBlock<'f> {
    fns: &'f LegacyFns,
    ended: bool,
}

impl<'f> ImmediateBlock<'f> {
    pub fn color(&mut self, color: Vector4<f32>) -> &mut Self {
        unsafe { (self.fns.color4f)(color.x, color.y, color.z, color.w) };
        self
    }

    pub fn vertex(&mut self, pos: Vector2<f32>) -> &mut Self {
        unsafe { (self.fns.vertex2f)(pos.x, pos.y) };
        self
    }

    /// Ends the block and reports any error raised inside it.
    pub fn finish(mut self) -> GlResult<()> {
        self.end();
        GlError::map_value(())
    }

    fn end(&mut self) {
        if !self.ended {
            unsafe { (self.fns.end)() };
            self.ended = true;
        }
    }
}

impl<'f> Drop for ImmediateBlock<'f> {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl_api::test_support::{stub_gl, StubGl};
    use std::ptr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    unsafe extern "system" fn stub() {}

    static BEGINS: AtomicUsize = AtomicUsize::new(0);
    static ENDS: AtomicUsize = AtomicUsize::new(0);
    static VERTICES: Mutex<Vec<(f32, f32)>> = Mutex::new(Vec::new());

    unsafe extern "system" fn count_begin(_mode: GLenum) {
        BEGINS.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "system" fn count_end() {
        ENDS.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "system" fn record_vertex(x: GLfloat, y: GLfloat) {
        if let Ok(mut vertices) = VERTICES.lock() {
            vertices.push((x, y));
        }
    }

    unsafe extern "system" fn ignore_color(_r: GLfloat, _g: GLfloat, _b: GLfloat, _a: GLfloat) {}

    /// Counting legacy entry points. The returned guard serializes tests that
    /// share the counters.
    fn counting_fns() -> (StubGl, LegacyFns) {
        let stubs = stub_gl();
        BEGINS.store(0, Ordering::SeqCst);
        ENDS.store(0, Ordering::SeqCst);
        VERTICES.lock().unwrap_or_else(|e| e.into_inner()).clear();
        let fns = LegacyFns {
            begin: count_begin,
            end: count_end,
            vertex2f: record_vertex,
            color4f: ignore_color,
        };
        (stubs, fns)
    }

    #[test]
    fn dropped_block_ends_once() {
        let (_stubs, fns) = counting_fns();
        {
            let mut block = fns.begin(Primitive::Triangles);
            block.vertex(Vector2::new(0.0, 0.0));
            assert_eq!(ENDS.load(Ordering::SeqCst), 0);
        }
        assert_eq!(BEGINS.load(Ordering::SeqCst), 1);
        assert_eq!(ENDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn finished_block_ends_once_and_checks_errors() {
        let (stubs, fns) = counting_fns();
        let block = fns.begin(Primitive::Triangles);
        assert_eq!(block.finish(), Ok(()));
        assert_eq!(ENDS.load(Ordering::SeqCst), 1);

        let block = fns.begin(Primitive::Triangles);
        stubs.raise(gl::INVALID_OPERATION);
        assert!(block.finish().is_err());
        assert_eq!(BEGINS.load(Ordering::SeqCst), 2);
        assert_eq!(ENDS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn vertices_are_sent_in_order() {
        let (_stubs, fns) = counting_fns();
        let mut block = fns.begin(Primitive::Triangles);
        block
            .color(Vector4::new(1.0, 1.0, 1.0, 1.0))
            .vertex(Vector2::new(-0.5, -0.5))
            .vertex(Vector2::new(0.0, 0.5))
            .vertex(Vector2::new(0.5, 0.5));
        block.finish().unwrap();
        let vertices = VERTICES.lock().unwrap().clone();
        assert_eq!(vertices, vec![(-0.5, -0.5), (0.0, 0.5), (0.5, 0.5)]);
    }

    #[test]
    fn missing_entry_point_is_named() {
        let err = LegacyFns::load(|name| {
            if name == "glVertex2f" {
                ptr::null()
            } else {
                stub as *const c_void
            }
        })
        .unwrap_err();
        assert_eq!(err, MissingEntryPoint("glVertex2f"));
    }

    #[test]
    fn loads_when_every_entry_point_resolves() {
        let mut requested = vec![];
        let fns = LegacyFns::load(|name| {
            requested.push(name);
            stub as *const c_void
        });
        assert!(fns.is_ok());
        assert_eq!(requested, vec!["glBegin", "glEnd", "glVertex2f", "glColor4f"]);
    }
}
