// Domain layer: lender models, the canonical state list and the ports the engine talks through.

pub mod model;
pub mod ports;
pub mod states;
