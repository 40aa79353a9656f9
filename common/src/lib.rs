pub mod port_allocator;
pub mod probe;
pub mod retrier;
