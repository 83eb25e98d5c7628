pub mod fixed;
pub mod registry;

pub use fixed::FixedResolver;
pub use registry::RegistryResolver;
