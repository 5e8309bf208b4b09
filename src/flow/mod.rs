//! The three-step posting flow: pick media, adjust, caption.
//!
//! [`PostFlowController`] owns the [`PostFlowState`] of one flow instance and
//! applies [`FlowEvent`]s to it. [`StepRoute`] is the string boundary used
//! when a step has to be addressed from outside (bookmarks, deep links).

pub mod controller;
pub mod route;
pub mod state;

pub use controller::{FlowEvent, PostFlowController, Rejection, SubmitTicket, Transition};
pub use route::{RouteError, StepRoute};
pub use state::{AdjustState, CaptionState, PickMediaState, PostFlowState, Step};
