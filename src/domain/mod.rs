// Domain layer: wire models, money and the ports the core talks through.

pub mod model;
pub mod money;
pub mod ports;
