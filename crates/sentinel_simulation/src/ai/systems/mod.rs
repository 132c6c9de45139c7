//! AI systems (ECS обвязка вокруг AgentBrain)

pub mod fsm;
pub mod perception;
pub mod targeting;

// Re-export all systems
pub use fsm::*;
pub use perception::*;
pub use targeting::*;
