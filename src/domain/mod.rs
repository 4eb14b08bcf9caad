// Domain layer: models, the domain-block parser, prompt text and ports.
// Nothing here talks to the network or the file system.

pub mod catalog;
pub mod model;
pub mod ports;
pub mod prompt;
