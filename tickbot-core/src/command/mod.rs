//! Command surface
//!
//! [`Commands`] is the application's handle on the channel tables. It only
//! stores targets, speeds and attach requests; the tick scheduler does all
//! the moving. The `wait_*` and `rest_*` methods suspend on the tick signal
//! until the scheduler has caught up.
//!
//! The tick signal wakes a single waiter, so only one task should await
//! through a given set of tables at a time.

mod surface;
mod wait;

pub use surface::Commands;
