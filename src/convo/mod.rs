//! Conversational state: bounded per-channel history, trigger-phrase
//! gating, and the single-flight turn controller that drives the
//! transcribe → generate → synthesize pipeline.

pub mod history;
pub mod trigger;
pub mod turn;

pub use history::{ConversationHistory, HistoryEntry, Role};
pub use trigger::strip_trigger;
pub use turn::{ConversationTurnController, TurnGate, TurnOutcome, TurnPhase, TurnSettings};
