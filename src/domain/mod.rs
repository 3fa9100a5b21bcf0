// Domain layer: message models and the ports (store, relay) the board service depends on.

pub mod model;
pub mod ports;
