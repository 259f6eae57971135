//! Stub GL entry points, so error paths can be exercised without a context.
//!
//! The `gl` function table is process-global. Every test that loads into it
//! holds the guard returned by `stub_gl` or `no_gl` for its whole body.

use gl::types::*;
use std::os::raw::c_void;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

static GL_LOCK: Mutex<()> = Mutex::new(());
static PENDING_ERROR: AtomicU32 = AtomicU32::new(gl::NO_ERROR);
static FAILING: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
static CALLS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn lock<T>(mutex: &'static Mutex<T>) -> MutexGuard<'static, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Logs a call to `name` and raises `GL_INVALID_OPERATION` if it was told to
/// fail.
fn record(name: &'static str) {
    lock(&CALLS).push(name);
    if lock(&FAILING).contains(&name) {
        PENDING_ERROR.store(gl::INVALID_OPERATION, Ordering::SeqCst);
    }
}

unsafe extern "system" fn get_error() -> GLenum {
    PENDING_ERROR.swap(gl::NO_ERROR, Ordering::SeqCst)
}

unsafe extern "system" fn use_program(_program: GLuint) {
    record("glUseProgram");
}

unsafe extern "system" fn delete_program(_program: GLuint) {
    record("glDeleteProgram");
}

unsafe extern "system" fn get_uniform_location(_program: GLuint, _name: *const GLchar) -> GLint {
    record("glGetUniformLocation");
    3
}

unsafe extern "system" fn uniform_4f(_location: GLint, _x: GLfloat, _y: GLfloat, _z: GLfloat, _w: GLfloat) {
    record("glUniform4f");
}

unsafe extern "system" fn bind_buffer(_target: GLenum, _buffer: GLuint) {
    record("glBindBuffer");
}

unsafe extern "system" fn delete_buffers(_n: GLsizei, _buffers: *const GLuint) {
    record("glDeleteBuffers");
}

unsafe extern "system" fn bind_vertex_array(_array: GLuint) {
    record("glBindVertexArray");
}

unsafe extern "system" fn delete_vertex_arrays(_n: GLsizei, _arrays: *const GLuint) {
    record("glDeleteVertexArrays");
}

fn stub_address(name: &str) -> *const c_void {
    match name {
        "glGetError" => get_error as *const c_void,
        "glUseProgram" => use_program as *const c_void,
        "glDeleteProgram" => delete_program as *const c_void,
        "glGetUniformLocation" => get_uniform_location as *const c_void,
        "glUniform4f" => uniform_4f as *const c_void,
        "glBindBuffer" => bind_buffer as *const c_void,
        "glDeleteBuffers" => delete_buffers as *const c_void,
        "glBindVertexArray" => bind_vertex_array as *const c_void,
        "glDeleteVertexArrays" => delete_vertex_arrays as *const c_void,
        _ => ptr::null(),
    }
}

pub(crate) struct StubGl {
    _guard: MutexGuard<'static, ()>,
}

impl StubGl {
    /// Every later call to `name` leaves `GL_INVALID_OPERATION` pending.
    pub(crate) fn fail(&self, name: &'static str) {
        lock(&FAILING).push(name);
    }

    /// Leaves `code` pending, as if an earlier call had raised it.
    pub(crate) fn raise(&self, code: GLenum) {
        PENDING_ERROR.store(code, Ordering::SeqCst);
    }

    /// Stubbed entry points called so far, in order.
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        lock(&CALLS).clone()
    }
}

fn reset() -> MutexGuard<'static, ()> {
    let guard = lock(&GL_LOCK);
    PENDING_ERROR.store(gl::NO_ERROR, Ordering::SeqCst);
    lock(&FAILING).clear();
    lock(&CALLS).clear();
    guard
}

/// Loads the stub entry points. Anything not stubbed stays unloaded.
pub(crate) fn stub_gl() -> StubGl {
    let guard = reset();
    gl::load_with(stub_address);
    StubGl { _guard: guard }
}

/// Unloads every entry point, as before a context exists.
pub(crate) fn no_gl() -> MutexGuard<'static, ()> {
    let guard = reset();
    gl::load_with(|_| ptr::null());
    guard
}
