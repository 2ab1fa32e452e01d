//! Identity storage backends
//!
//! Only a process-lifetime in-memory backend is provided.

mod memory;
mod traits;

pub use memory::MemoryIdentityRepository;
pub use traits::IdentityRepository;
