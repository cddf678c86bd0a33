mod generator;

pub use generator::{ParticleField, TargetRule};
