//! ECS Components для entity симуляции
//!
//! Организация по доменам:
//! - actor: здоровье и маркер цели (Health, Hunted)
//! - movement: navigation provider (NavAgent) и поворот
//! - world: line-of-sight геометрия (Occluder, BodyPartOf)

pub mod actor;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use world::*;
