//! Async waits on the tick signal
//!
//! Each wait checks its condition, then sleeps until the next logic tick
//! and checks again. A signal raised between the check and the sleep is
//! kept by the signal, so no tick is missed.

use tickbot_hal::Clock;

use super::surface::Commands;
use crate::channel::{ChannelId, ChannelKind, PwmId, ServoId, SwitchId};
use crate::error::ControlError;

impl<C: Clock> Commands<'_, C> {
    async fn wait_for<F>(&self, mut done: F) -> Result<(), ControlError>
    where
        F: FnMut() -> Result<bool, ControlError>,
    {
        loop {
            if done()? {
                return Ok(());
            }
            self.tables.tick_signal().wait().await;
        }
    }

    /// Wait until a pulse-width or servo channel reaches its target
    pub async fn wait_until_settled(&self, id: ChannelId) -> Result<(), ControlError> {
        self.wait_for(|| self.is_settled(id)).await
    }

    /// Wait until an output reaches its target
    pub async fn wait_for_pwm(&self, id: PwmId) -> Result<(), ControlError> {
        self.wait_for(|| self.pwm_settled(id)).await
    }

    /// Wait until every output reaches its target
    pub async fn wait_for_pwms(&self) {
        let _ = self
            .wait_for(|| Ok(self.all_settled(ChannelKind::Pwm)))
            .await;
    }

    /// Wait until a servo reaches its target
    pub async fn wait_for_servo(&self, id: ServoId) -> Result<(), ControlError> {
        self.wait_for(|| self.servo_settled(id)).await
    }

    /// Wait until every servo reaches its target
    pub async fn wait_for_servos(&self) {
        let _ = self
            .wait_for(|| Ok(self.all_settled(ChannelKind::Servo)))
            .await;
    }

    /// Let a servo finish its move, then unpower it
    ///
    /// Returns once the scheduler has detached the actuator. The next
    /// [`move_to`](Commands::move_to) re-attaches it.
    pub async fn rest_servo(&self, id: ServoId) -> Result<(), ControlError> {
        self.wait_for_servo(id).await?;
        let channel = self.tables.servo(id)?;
        channel.request_attach(false);
        self.wait_for(|| Ok(!channel.is_attached())).await
    }

    /// Let every servo finish its move, then unpower them all
    pub async fn rest_servos(&self) {
        self.wait_for_servos().await;
        for channel in self.tables.servos() {
            channel.request_attach(false);
        }
        let _ = self
            .wait_for(|| Ok(self.tables.servos().iter().all(|c| !c.is_attached())))
            .await;
    }

    /// Wait until a switch has been held for at least `min_hold_ms`
    pub async fn wait_for_switch_on(&self, id: SwitchId, min_hold_ms: u32) -> Result<(), ControlError> {
        self.wait_for(|| self.switch_active(id, min_hold_ms)).await
    }

    /// Wait until a switch no longer counts as held for `min_hold_ms`
    ///
    /// With a hold of 0 this waits for the release; a longer hold also
    /// returns while a press is still younger than `min_hold_ms`.
    pub async fn wait_for_switch_off(&self, id: SwitchId, min_hold_ms: u32) -> Result<(), ControlError> {
        self.wait_for(|| Ok(!self.switch_active(id, min_hold_ms)?)).await
    }
}
