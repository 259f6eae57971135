use gl;
use gl::types::*;
use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_void;
use crate::gl_api::immediate::LegacyFns;

/// Entry points the buffer object path cannot run without.
const BUFFER_ENTRY_POINTS: &[(&str, fn() -> bool)] = &[
    ("glGenBuffers", gl::GenBuffers::is_loaded),
    ("glBindBuffer", gl::BindBuffer::is_loaded),
    ("glBufferData", gl::BufferData::is_loaded),
    ("glDeleteBuffers", gl::DeleteBuffers::is_loaded),
    ("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded),
    ("glEnableVertexAttribArray", gl::EnableVertexAttribArray::is_loaded),
    ("glGenVertexArrays", gl::GenVertexArrays::is_loaded),
    ("glBindVertexArray", gl::BindVertexArray::is_loaded),
    ("glDeleteVertexArrays", gl::DeleteVertexArrays::is_loaded),
    ("glCreateShader", gl::CreateShader::is_loaded),
    ("glCreateProgram", gl::CreateProgram::is_loaded),
    ("glUseProgram", gl::UseProgram::is_loaded),
    ("glGetUniformLocation", gl::GetUniformLocation::is_loaded),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
    pub es: bool,
}

impl GlVersion {
    /// Parses the string returned by `glGetString(GL_VERSION)`, e.g.
    /// `"4.6 (Compatibility Profile) Mesa 23.1.4"` or `"OpenGL ES 3.2 v1.r32p1"`.
    pub fn parse(version: &str) -> Option<Self> {
        let version = version.trim();
        let (es, rest) = match version.strip_prefix("OpenGL ES") {
            Some(rest) => (true, rest.trim_start_matches(|c: char| !c.is_ascii_digit())),
            None => (false, version),
        };

        let number = rest.split_whitespace().next()?;
        let mut parts = number.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some(GlVersion { major, minor, es })
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.es {
            write!(f, "OpenGL ES {}.{}", self.major, self.minor)
        } else {
            write!(f, "OpenGL {}.{}", self.major, self.minor)
        }
    }
}

/// What the current context turned out to support.
#[derive(Debug)]
pub struct Capabilities {
    pub version: Option<GlVersion>,
    pub version_string: String,
    pub renderer: String,
    pub vendor: String,
    /// Buffer object entry points the driver did not provide.
    pub missing: Vec<&'static str>,
    pub legacy: Option<LegacyFns>,
}

impl Capabilities {
    pub fn buffer_objects(&self) -> bool {
        self.missing.is_empty()
    }
}

fn missing_buffer_entry_points() -> Vec<&'static str> {
    BUFFER_ENTRY_POINTS
        .iter()
        .filter(|(_, is_loaded)| !is_loaded())
        .map(|&(name, _)| name)
        .collect()
}

fn gl_string(name: GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            String::new()
        } else {
            CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
        }
    }
}

/// Loads every GL entry point through `loader` and reports which drawing
/// paths are usable. The context that `loader` resolves against must be
/// current.
pub fn load_with<F>(mut loader: F) -> Capabilities
where
    F: FnMut(&'static str) -> *const c_void,
{
    gl::load_with(&mut loader);

    let version_string = gl_string(gl::VERSION);
    let version = GlVersion::parse(&version_string);
    let legacy = match version {
        Some(GlVersion { es: true, .. }) => None,
        _ => match LegacyFns::load(&mut loader) {
            Ok(fns) => Some(fns),
            Err(err) => {
                log::debug!("{}", err);
                None
            }
        },
    };
    let caps = Capabilities {
        version,
        version_string,
        renderer: gl_string(gl::RENDERER),
        vendor: gl_string(gl::VENDOR),
        missing: missing_buffer_entry_points(),
        legacy,
    };

    match caps.version {
        Some(version) => log::info!("{} ({})", version, caps.version_string),
        None => log::warn!("unrecognized GL version string {:?}", caps.version_string),
    }
    log::info!("GL renderer: {} ({})", caps.renderer, caps.vendor);
    if !caps.buffer_objects() {
        log::warn!("buffer objects unavailable, missing {}", caps.missing.join(", "));
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_desktop_versions() {
        assert_eq!(
            GlVersion::parse("4.6 (Compatibility Profile) Mesa 23.1.4"),
            Some(GlVersion { major: 4, minor: 6, es: false })
        );
        assert_eq!(
            GlVersion::parse("3.0"),
            Some(GlVersion { major: 3, minor: 0, es: false })
        );
        assert_eq!(
            GlVersion::parse("4.6.0 NVIDIA 535.54.03"),
            Some(GlVersion { major: 4, minor: 6, es: false })
        );
    }

    #[test]
    fn parses_es_versions() {
        let version = GlVersion::parse("OpenGL ES 3.2 v1.r32p1").unwrap();
        assert_eq!(version, GlVersion { major: 3, minor: 2, es: true });
        assert_eq!(version.to_string(), "OpenGL ES 3.2");
        assert_eq!(
            GlVersion::parse("OpenGL ES-CM 1.1"),
            Some(GlVersion { major: 1, minor: 1, es: true })
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(GlVersion::parse(""), None);
        assert_eq!(GlVersion::parse("four point six"), None);
        assert_eq!(GlVersion::parse("4"), None);
    }

    #[test]
    fn nothing_is_loaded_without_a_context() {
        let _gl = crate::gl_api::test_support::no_gl();
        assert_eq!(missing_buffer_entry_points().len(), BUFFER_ENTRY_POINTS.len());
    }

    #[test]
    fn only_unresolved_entry_points_are_missing() {
        let _gl = crate::gl_api::test_support::stub_gl();
        let missing = missing_buffer_entry_points();
        assert!(!missing.contains(&"glUseProgram"));
        assert!(!missing.contains(&"glBindBuffer"));
        assert!(missing.contains(&"glGenBuffers"));
        assert!(missing.contains(&"glCreateProgram"));
    }
}
