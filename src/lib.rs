#![allow(clippy::doc_markdown)]

pub mod core;
pub mod error;
pub mod input;
pub mod prelude;

pub use self::{
    core::{
        NoopRecorder,
        Options,
        Price,
        PriceSeries,
        Quote,
        Recorder,
        Selector,
        Snapshot,
        Summary,
        TracingRecorder,
        Upcoming,
    },
    error::Error,
};
