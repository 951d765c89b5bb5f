// Domain layer: schema, value types and the ports the prediction service depends on.

pub mod model;
pub mod ports;
pub mod schema;
