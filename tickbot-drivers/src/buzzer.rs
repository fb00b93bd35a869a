//! Buzzer patterns

use embedded_hal::delay::DelayNs;
use tickbot_hal::DigitalIo;

/// Sound a buzzer `times` times, `duration_ms` on then `duration_ms` off
///
/// Blocks for `2 * duration_ms * times` milliseconds.
pub fn beep<IO, D>(io: &mut IO, delay: &mut D, pin: u8, duration_ms: u32, times: u8)
where
    IO: DigitalIo,
    D: DelayNs,
{
    for _ in 0..times {
        io.set_high(pin);
        delay.delay_ms(duration_ms);
        io.set_low(pin);
        delay.delay_ms(duration_ms);
    }
}
