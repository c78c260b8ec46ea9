pub mod controller;
pub mod snapshot;

pub use controller::WorkflowController;
pub use snapshot::Snapshot;
