#![allow(dead_code)]

pub mod recording_notifier;

pub use recording_notifier::RecordingNotifier;
