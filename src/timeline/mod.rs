/// Partitioning of the output duration across background images.
pub mod allocator;
