use std::path::PathBuf;

pub mod program;
pub mod shader;

use self::shader::*;

/// Where a shader stage gets its GLSL from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShaderSource {
    Embedded(&'static str),
    File(PathBuf),
}

impl ShaderSource {
    /// Uses `path` when one is configured, `embedded` otherwise.
    pub fn or_embedded(path: Option<&PathBuf>, embedded: &'static str) -> Self {
        match path {
            Some(path) => ShaderSource::File(path.clone()),
            None => ShaderSource::Embedded(embedded),
        }
    }

    pub fn create(&self, shader_type: ShaderType) -> ShaderResult<Shader> {
        let shader = Shader::new(shader_type)?;
        match self {
            ShaderSource::Embedded(source) => shader.source(source)?,
            ShaderSource::File(path) => {
                log::debug!("loading {:?} shader from {}", shader_type, path.display());
                shader.source_from_file(path)?
            }
        }
        Ok(shader)
    }
}
