//! The human at the controls
//!
//! Queue Client operations never touch the network before
//! [`Operator::confirm`] returns `true`, and report failures through
//! [`Operator::alert`] instead of returning early to a render loop.

/// Operator interaction and feedback
pub trait Operator {
    /// Explicit yes/no gate
    fn confirm(&self, prompt: &str) -> bool;

    /// Show a failure message
    fn alert(&self, message: &str);

    /// Audible feedback after a successful enqueue
    fn play_delete_sound(&self) {}

    /// Haptic feedback after a successful enqueue
    fn vibrate(&self) {}
}
