/// Use mimalloc as the global allocator for all binaries.
/// Every input line is its own small heap allocation that moves between
/// queues, so allocator speed dominates on large inputs.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod sort;
