// Application layer: institution sources and the runner that ties sources, engine and output files together.

pub mod pipelines;
pub mod runner;
