// ── Controller abstraction ──
//
// Full lifecycle management for one encoder connection: login and
// periodic re-login, the self-rescheduling poll loop, reconnect on
// failure, and action dispatch. Everything observable is published
// through the `Surface`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::command::{Action, DispatchReport, action_catalog};
use crate::config::ControllerConfig;
use crate::dispatch;
use crate::error::CoreError;
use crate::model::{Channel, DeviceRef};
use crate::poll::{self, CycleSnapshot};
use crate::registry::ChannelRegistry;
use crate::scheduler::{TimerKind, TimerSet};
use crate::session::{EncoderClient, Session};
use crate::surface::{ConnectionStatus, Feedback, Surface};

// ── ConnectionContext ────────────────────────────────────────────

/// State belonging to one connection lifetime. Replaced wholesale on
/// reconnect; the epoch tells in-flight work whether its results still
/// apply.
struct ConnectionContext {
    epoch: u64,
    client: Option<EncoderClient>,
    session: Option<Session>,
    device: Option<DeviceRef>,
    registry: ChannelRegistry,
}

impl ConnectionContext {
    fn new(epoch: u64) -> Self {
        Self {
            epoch,
            client: None,
            session: None,
            device: None,
            registry: ChannelRegistry::new(),
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Nothing here returns
/// connection errors to the caller: failures are logged, reflected in
/// [`ConnectionStatus`], and turned into a retry or a reconnect.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: RwLock<ControllerConfig>,
    surface: Surface,
    timers: TimerSet,
    context: Mutex<ConnectionContext>,
    /// Held for the duration of a poll cycle.
    cycle: Mutex<()>,
}

impl Controller {
    /// Create a controller. Does NOT connect; call
    /// [`connect()`](Self::connect).
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                config: RwLock::new(config),
                surface: Surface::new(),
                timers: TimerSet::new(),
                context: Mutex::new(ConnectionContext::new(0)),
                cycle: Mutex::new(()),
            }),
        }
    }

    pub async fn config(&self) -> ControllerConfig {
        self.inner.config.read().await.clone()
    }

    pub fn surface(&self) -> &Surface {
        &self.inner.surface
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.surface.status()
    }

    /// Timers currently pending.
    pub fn armed_timers(&self) -> Vec<TimerKind> {
        self.inner.timers.armed_kinds()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Publish the action catalog and log in. The first poll cycle
    /// starts as soon as the session is established.
    pub async fn connect(&self) {
        let api = self.inner.config.read().await.api;
        self.inner.surface.publish_actions(action_catalog(api));
        self.login().await;
    }

    /// One login attempt.
    ///
    /// Cancels every pending timer first. On success: status `ok`, poll
    /// immediately, re-login after the reauth interval. On failure:
    /// status `error`, session cleared, retry after the retry delay.
    /// With incomplete configuration: status `bad_config`, nothing
    /// scheduled.
    pub async fn login(&self) {
        let inner = &self.inner;
        inner.timers.cancel_all();
        let config = inner.config.read().await.clone();

        if !config.is_complete() {
            warn!("host, username and password are all required");
            inner.surface.set_status(ConnectionStatus::BadConfig);
            return;
        }

        let (epoch, client) = {
            let mut ctx = inner.context.lock().await;
            if ctx.session.is_none() {
                inner.surface.set_status(ConnectionStatus::Connecting);
            }
            let client = if let Some(client) = &ctx.client {
                client.clone()
            } else {
                match EncoderClient::from_config(&config) {
                    Ok(client) => {
                        ctx.client = Some(client.clone());
                        client
                    }
                    Err(e) => {
                        error!(error = %e, "cannot build encoder client");
                        inner.surface.record_error(e.to_string());
                        inner.surface.set_status(ConnectionStatus::BadConfig);
                        return;
                    }
                }
            };
            (ctx.epoch, client)
        };

        info!(host = %config.host, api = %config.api, "logging in");
        let result = client.login(&config.username, &config.password).await;

        let mut ctx = inner.context.lock().await;
        if ctx.epoch != epoch {
            debug!("discarding login result from a replaced connection");
            return;
        }

        match result {
            Ok(session) => {
                ctx.session = Some(session);
                inner.surface.set_status(ConnectionStatus::Ok);
                info!("session established");
                inner.timers.arm(TimerKind::Poll, Duration::ZERO, self.poll_task());
                inner
                    .timers
                    .arm(TimerKind::Reauth, config.reauth_interval, self.login_task());
            }
            Err(e) => {
                ctx.session = None;
                error!(error = %e, retry_in = ?config.login_retry_delay, "login failed");
                inner.surface.record_error(e.to_string());
                inner.surface.set_status(ConnectionStatus::Error);
                inner
                    .timers
                    .arm(TimerKind::LoginRetry, config.login_retry_delay, self.login_task());
            }
        }
    }

    /// Cancel all timers, stop running timer actions and drop the
    /// session. Known channels are kept. Idempotent.
    pub async fn disconnect(&self) {
        let mut ctx = self.inner.context.lock().await;
        self.inner.timers.shutdown();
        ctx.epoch += 1;
        ctx.session = None;
        ctx.client = None;
        drop(ctx);

        self.inner.surface.set_status(ConnectionStatus::Disconnected);
        debug!("disconnected");
    }

    /// Replace the configuration and start a fresh connection lifetime.
    pub async fn update_config(&self, config: ControllerConfig) {
        self.disconnect().await;
        {
            let mut ctx = self.inner.context.lock().await;
            *ctx = ConnectionContext::new(ctx.epoch + 1);
        }
        self.inner.surface.reset();
        *self.inner.config.write().await = config;
        info!("configuration updated");
        self.connect().await;
    }

    // ── Poll loop ────────────────────────────────────────────────

    /// Run one poll cycle now.
    ///
    /// On success the next cycle is scheduled after the poll interval.
    /// On failure the connection is torn down and a login is scheduled
    /// after the reconnect delay; the error is returned for callers that
    /// want it.
    pub async fn poll_cycle(&self) -> Result<(), CoreError> {
        let inner = &self.inner;
        let _cycle = inner.cycle.lock().await;
        let (poll_interval, reconnect_delay) = {
            let config = inner.config.read().await;
            (config.poll_interval, config.reconnect_delay)
        };

        let (epoch, client, token, device) = {
            let ctx = inner.context.lock().await;
            let (Some(client), Some(session)) = (&ctx.client, &ctx.session) else {
                return Err(CoreError::Disconnected);
            };
            (
                ctx.epoch,
                client.clone(),
                session.token.clone(),
                ctx.device.clone(),
            )
        };

        let result = poll::fetch_cycle(&client, &token, device.as_ref()).await;

        let mut ctx = inner.context.lock().await;
        if ctx.epoch != epoch {
            debug!("discarding poll result from a replaced connection");
            return Ok(());
        }

        match result {
            Ok(snapshot) => {
                self.apply(&mut ctx, snapshot);
                inner.surface.record_cycle();
                inner.timers.arm(TimerKind::Poll, poll_interval, self.poll_task());
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "poll cycle failed, reconnecting");
                inner.surface.record_error(e.to_string());
                self.reconnect(&mut ctx, reconnect_delay);
                Err(e)
            }
        }
    }

    fn apply(&self, ctx: &mut ConnectionContext, snapshot: CycleSnapshot) {
        let surface = &self.inner.surface;
        surface.set_values(snapshot.device_values());

        if let Some(device) = snapshot.device {
            info!(device_id = ?device.id, name = ?device.name, "encoder device discovered");
            ctx.device = Some(device);
        }

        if let Some(channels) = snapshot.channels {
            let outcome = ctx.registry.reconcile(channels);
            surface.set_values(outcome.values);
            if outcome.grew {
                info!(added = ?outcome.added, total = ctx.registry.len(), "channel list grew");
                surface.publish_variables(ctx.registry.variable_definitions());
                surface.publish_choices(ctx.registry.choices().to_vec());
            }
            surface.publish_channels(ctx.registry.snapshot());
            surface.bump_feedbacks();
        }
    }

    /// Tear down the connection and schedule a fresh login.
    fn reconnect(&self, ctx: &mut ConnectionContext, delay: Duration) {
        self.inner.timers.cancel_all();
        *ctx = ConnectionContext::new(ctx.epoch + 1);
        self.inner.surface.reset();
        self.inner.surface.set_status(ConnectionStatus::Connecting);
        self.inner
            .timers
            .arm(TimerKind::Reconnect, delay, self.login_task());
    }

    fn poll_task(&self) -> BoxFuture<'static, ()> {
        let ctrl = self.clone();
        Box::pin(async move {
            let _ = ctrl.poll_cycle().await;
        })
    }

    fn login_task(&self) -> BoxFuture<'static, ()> {
        let ctrl = self.clone();
        Box::pin(async move { ctrl.login().await })
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Dispatch an action with the current session.
    ///
    /// Per-channel failures are logged and listed in the report; they
    /// never affect the session or the poll loop.
    pub async fn execute(&self, action: Action) -> Result<DispatchReport, CoreError> {
        let (client, token, device, known) = {
            let ctx = self.inner.context.lock().await;
            let (Some(client), Some(session)) = (&ctx.client, &ctx.session) else {
                return Err(CoreError::Disconnected);
            };
            (
                client.clone(),
                session.token.clone(),
                ctx.device.clone(),
                ctx.registry.ids(),
            )
        };

        let report = match action {
            Action::Channel { command, channel } => {
                dispatch::dispatch_each(
                    &client,
                    &token,
                    device.as_ref(),
                    std::slice::from_ref(&channel),
                    command,
                )
                .await
            }
            Action::AllChannels { command } => {
                dispatch::dispatch_each(&client, &token, device.as_ref(), &known, command).await
            }
        };
        debug!(
            attempted = report.attempted.len(),
            failed = report.failed.len(),
            "action dispatched"
        );
        Ok(report)
    }

    // ── Observation ──────────────────────────────────────────────

    /// Latest channel snapshot, in registration order.
    pub fn channels(&self) -> Arc<Vec<Arc<Channel>>> {
        self.inner.surface.channels().latest()
    }

    pub fn check(&self, feedback: &Feedback) -> bool {
        self.inner.surface.check(feedback)
    }

    /// Wait for the next successful poll cycle.
    ///
    /// Fails early when login fails or the configuration is incomplete.
    pub async fn wait_for_cycle(&self, timeout: Duration) -> Result<(), CoreError> {
        let start = *self.inner.surface.cycles().current();
        self.wait_for_cycle_after(start, timeout).await
    }

    async fn wait_for_cycle_after(&self, start: u64, timeout: Duration) -> Result<(), CoreError> {
        let surface = &self.inner.surface;
        let mut cycles = surface.cycles();
        let mut status = surface.subscribe_status();

        let waited = tokio::time::timeout(timeout, async {
            tokio::select! {
                c = cycles.wait_for(|c| *c > start) => c.map(drop).ok_or(CoreError::Disconnected),
                s = status.wait_for(|s| matches!(s, ConnectionStatus::Error | ConnectionStatus::BadConfig)) => {
                    let last = surface.last_error();
                    Err(match s.map(|s| *s) {
                        Ok(ConnectionStatus::BadConfig) => CoreError::Config {
                            message: last.unwrap_or_else(|| "host, username and password are required".into()),
                        },
                        _ => CoreError::AuthenticationFailed {
                            message: last.unwrap_or_else(|| "login failed".into()),
                        },
                    })
                }
            }
        })
        .await;

        waited.map_err(|_| CoreError::WaitTimeout {
            what: "the first poll cycle",
            secs: timeout.as_secs(),
        })?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Connect, wait for one successful poll cycle, run `f`, disconnect.
    pub async fn oneshot<F, Fut, T>(
        config: ControllerConfig,
        wait: Duration,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let controller = Controller::new(config);
        let start = *controller.surface().cycles().current();
        controller.connect().await;

        let result = match controller.wait_for_cycle_after(start, wait).await {
            Ok(()) => f(controller.clone()).await,
            Err(e) => Err(e),
        };
        controller.disconnect().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn incomplete_config_is_bad_config() {
        let controller = Controller::new(ControllerConfig::default());
        controller.connect().await;
        assert_eq!(controller.status(), ConnectionStatus::BadConfig);
        assert!(controller.armed_timers().is_empty());
    }

    #[tokio::test]
    async fn execute_without_session_is_disconnected() {
        let controller = Controller::new(ControllerConfig::default());
        let action = Action::AllChannels {
            command: crate::model::ChannelCommand::Stop,
        };
        assert!(matches!(
            controller.execute(action).await,
            Err(CoreError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let controller = Controller::new(ControllerConfig::default());
        controller.disconnect().await;
        controller.disconnect().await;
        assert_eq!(controller.status(), ConnectionStatus::Disconnected);
        assert!(controller.armed_timers().is_empty());
    }
}
