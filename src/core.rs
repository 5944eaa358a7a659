mod price;
mod quote;
mod recorder;
mod selector;
mod series;
mod snapshot;

pub use self::{
    price::Price,
    quote::Quote,
    recorder::{NoopRecorder, Recorder, TracingRecorder},
    selector::{Options, Selector},
    series::{PriceSeries, Summary},
    snapshot::{Snapshot, Upcoming},
};
