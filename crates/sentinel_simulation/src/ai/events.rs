//! AI Events — broadcast переходов FSM
//!
//! FSM ничего не ждёт от подписчиков: UI, звук, аналитика читают
//! AgentStateChanged на своих системах.

use bevy::prelude::*;

use super::brain::AgentState;

/// Агент сменил поведенческий state
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AgentStateChanged {
    pub agent: Entity,
    pub from: AgentState,
    pub to: AgentState,
    /// Simulation time перехода (секунды)
    pub at: f64,
}
