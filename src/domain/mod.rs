// Domain layer: core records and the store port. No I/O here.

pub mod model;
pub mod ports;
