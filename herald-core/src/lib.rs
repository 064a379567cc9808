//! herald-core: event window resolution and reminder composition for the herald notifier

pub mod clock;
pub mod error;
pub mod event;
pub mod message;
pub mod time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::WindowError;
pub use event::EventInfo;
pub use message::{compose, Headline, NotificationMessage, Section};
pub use time::{
    format_countdown, format_instant, resolve, resolve_in, TimeWindow, DEFAULT_INPUT_TZ,
    DEFAULT_REPORTING_TZ, TIMESTAMP_LAYOUT,
};
