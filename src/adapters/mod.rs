// Adapters layer: concrete implementations of the domain ports (Go toolchain, local filesystem).

pub mod go;
pub mod process;
pub mod storage;

pub use go::GoToolchain;
pub use storage::LocalStorage;
