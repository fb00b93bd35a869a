//! Monotonic time source

/// Monotonic millisecond clock
///
/// The value wraps after roughly 49 days; consumers compare timestamps with
/// wrapping subtraction.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
