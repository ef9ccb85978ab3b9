//! Minimal terminal runtime: a frame loop that measures elapsed time between
//! ticks and forwards key and focus events to an [`App`].

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
