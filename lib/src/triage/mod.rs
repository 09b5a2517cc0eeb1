// lib/src/triage/mod.rs

pub mod audio_capture;
pub mod classifier;

pub use audio_capture::{AudioRecorder, AudioSource, CaptureStream, FileAudioSource};
pub use classifier::{ClassifiedSymptoms, TriageClassifier};
