// Domain layer: value objects and ports. No I/O here.

pub mod model;
pub mod ports;
