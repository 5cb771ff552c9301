//! The composer modal as a pure state machine.
//!
//! Slack re-sends the full view state with every interaction, so each
//! step is a function of that snapshot alone: [`interpreter`] reads it,
//! [`transition`] decides the next view, [`composer`] builds it from the
//! [`catalog`] templates, and [`submission`] turns the final snapshot into
//! outbound messages.

pub mod catalog;
pub mod composer;
pub mod interpreter;
pub mod rich_text;
pub mod state;
pub mod submission;
pub mod transition;

pub use composer::{COMPOSER_CALLBACK_ID, compose_form_view, compose_modal, initial_modal};
pub use interpreter::{CtaCount, FeatureFlags, FormSelection, interpret};
pub use state::{ControlValue, FormState};
pub use submission::{CtaButton, OutboundMessage, SubmissionError, assemble};
pub use transition::{FormMode, Trigger, ViewReplace, transition};
