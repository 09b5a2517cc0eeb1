// lib/src/admission/mod.rs

pub mod desk;
pub mod poller;
pub mod queue;

pub use desk::{AdmissionDesk, RequestHandle, StatusWatch};
pub use poller::{spawn_poller, PollControl, PollHandle};
pub use queue::IncomingQueue;
