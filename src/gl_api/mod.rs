#[macro_use]
pub mod error;
#[macro_use]
pub mod layout;

pub mod buffer;
pub mod immediate;
pub mod loader;
pub mod shader;
pub mod uniform;
pub mod vertex_array;

#[cfg(test)]
pub(crate) mod test_support;
