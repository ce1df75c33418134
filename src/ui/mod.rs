//! UI Controller: explicit state, events, and a pure transition function,
//! plus [`Session`] which applies effects against real resources.

pub mod event;
pub mod preview;
pub mod session;
pub mod state;
pub mod update;

pub use event::{Effect, Event};
pub use preview::{Preview, PreviewHandle, PreviewId, PreviewRegistry};
pub use session::{PendingRun, Session};
pub use state::{Phase, ResultView, SelectedFile, UiState};
pub use update::{update, Transition};
