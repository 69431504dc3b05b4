// # KumaApi Implementations
//
// Implementations of the KumaApi trait that live in the core crate.
// The Socket.IO client lives in `kuma-client`.

pub mod memory;

pub use memory::MemoryKumaApi;
