//! Combat systems (ECS ↔ движок)

pub mod damage;
pub mod enemy;
pub mod shooter;

// Re-export all systems
pub use damage::*;
pub use enemy::*;
pub use shooter::*;
