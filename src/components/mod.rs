pub mod alerts;
pub mod card;
pub mod haptic_button;
pub mod modal;
pub mod search_bar;
pub mod svg;
