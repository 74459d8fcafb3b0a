//! Decision core of the adventure-map AI.
//!
//! Each turn the engine rebuilds its analyzers, runs the multi-actor chain
//! pathfinder, lets every behavior propose goals, scores them with the fuzzy
//! priority evaluator and executes the best task until nothing worthwhile
//! remains. See `TurnEngine::make_turn` for the outer loop.

pub mod analyzers;
pub mod behaviors;
pub mod config;
pub mod engine;
pub mod error;
pub mod goals;
pub mod interrupt;
pub mod pathfinding;
pub mod worker;

pub use config::{AiConfig, ScanDepth};
pub use engine::TurnEngine;
pub use error::{Result, RuntimeError};
pub use interrupt::Interrupt;
pub use worker::{AiWorker, Command, GameHost, TurnEvent, WorkerHandle};
