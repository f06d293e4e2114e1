pub mod builtin;
#[allow(clippy::module_inception)]
pub mod executor;
pub mod spawner;

pub use builtin::WorkingDir;
pub use executor::Executor;
