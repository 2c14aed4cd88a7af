//! One verification session: the event-driven controller that owns the
//! dataset, the rate limiter, the form, and the timer queue.
//!
//! Nothing here blocks or spawns. A driver feeds events in
//! ([`Session::start`], [`Session::dataset_loaded`],
//! [`Session::input_changed`], [`Session::submit`]) and calls
//! [`Session::advance`] with the current time; [`Session::next_deadline`]
//! says when the next timer is due.
//!
//! The form is disabled before every suspension point (a pending result or a
//! cooldown), so two attempts can never overlap on the limiter.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::deeplink::{canonical_url, parse_startup_parameters, share_link};
use crate::engine::{VerificationResult, Verifier};
use crate::error::{LoadError, RateLimitError, ValidationError};
use crate::limiter::{LimiterState, RateLimiter};
use crate::presenter::{Clipboard, Presenter, Toast, ToastKind};

const TICK: Duration = Duration::from_secs(1);

/// Scheduled callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timer {
    /// Submit the deep-linked ID.
    AutoTrigger,
    /// Display the pending result.
    ResultReady,
    /// Advance the cooldown countdown by one second.
    CooldownTick,
}

/// What became of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Accepted; the result is shown when [`Timer::ResultReady`] fires.
    Pending,
    /// The input failed validation. The form stays usable.
    Rejected(ValidationError),
    /// The rate limiter refused the attempt and a cooldown started.
    Blocked(RateLimitError),
    /// The form was disabled, so nothing happened.
    Ignored,
}

#[derive(Debug, Default)]
struct TimerQueue {
    heap: BinaryHeap<Reverse<(Instant, u64, Timer)>>,
    seq: u64,
}

impl TimerQueue {
    fn schedule(&mut self, at: Instant, timer: Timer) {
        self.seq += 1;
        self.heap.push(Reverse((at, self.seq, timer)));
    }

    fn pop_due(&mut self, now: Instant) -> Option<(Instant, Timer)> {
        match self.heap.peek() {
            Some(Reverse((at, _, _))) if *at <= now => {
                self.heap.pop().map(|Reverse((at, _, timer))| (at, timer))
            }
            _ => None,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse((at, _, _))| *at)
    }
}

#[derive(Debug)]
enum DatasetState {
    Loading,
    Ready(Verifier),
    Failed,
}

/// A single page session.
#[derive(Debug)]
pub struct Session<P> {
    presenter: P,
    limiter: RateLimiter,
    dataset: DatasetState,
    input: String,
    in_flight: Option<VerificationResult>,
    auto_pending: bool,
    page: Option<Url>,
    last_verified: Option<String>,
    timers: TimerQueue,
    max_id_length: usize,
    auto_trigger_delay: Duration,
    result_delay: Duration,
    toast_duration: Duration,
}

impl<P: Presenter> Session<P> {
    /// Creates a session in the loading state with the form disabled.
    pub fn new(config: &Config, mut presenter: P) -> Self {
        presenter.set_loading(true);
        presenter.set_form_enabled(false);
        Self {
            presenter,
            limiter: RateLimiter::new(config.max_attempts, config.cooldown()),
            dataset: DatasetState::Loading,
            input: String::new(),
            in_flight: None,
            auto_pending: false,
            page: None,
            last_verified: None,
            timers: TimerQueue::default(),
            max_id_length: config.max_id_length,
            auto_trigger_delay: config.auto_trigger_delay(),
            result_delay: config.result_delay(),
            toast_duration: config.toast_duration(),
        }
    }

    /// Consumes the startup URL: prefills the input, rewrites history to the
    /// canonical URL, and schedules auto-verification if requested.
    pub fn start(&mut self, page: &Url, now: Instant) {
        let params = parse_startup_parameters(page);
        let canonical = canonical_url(page);

        if let Some(id) = &params.prefill_id {
            self.input_changed(id);
        }
        self.presenter.replace_url(&canonical);
        self.page = Some(canonical);

        if params.auto_trigger {
            if self.input.is_empty() {
                debug!("auto-trigger requested without an ID, ignoring");
            } else {
                debug!(id = %self.input, "scheduling auto-verification");
                self.timers
                    .schedule(now + self.auto_trigger_delay, Timer::AutoTrigger);
            }
        }
    }

    /// Completes dataset loading. A failure leaves the form disabled for the
    /// rest of the session.
    pub fn dataset_loaded(&mut self, loaded: Result<Dataset, LoadError>, now: Instant) {
        self.presenter.set_loading(false);
        match loaded {
            Ok(dataset) => {
                info!(records = dataset.len(), "session ready");
                let verifier = Verifier::new(dataset).with_max_id_length(self.max_id_length);
                self.dataset = DatasetState::Ready(verifier);
                self.presenter.set_form_enabled(self.form_enabled());
                if std::mem::take(&mut self.auto_pending) {
                    self.submit(now);
                }
            }
            Err(e) => {
                error!(error = %e, "certificate dataset failed to load");
                self.dataset = DatasetState::Failed;
                self.auto_pending = false;
                self.presenter.show_fatal(&e);
            }
        }
    }

    /// Records typed input, uppercased as it is entered.
    pub fn input_changed(&mut self, text: &str) {
        self.input = text.to_uppercase();
        self.presenter.set_input(&self.input);
    }

    /// Submits the current input.
    pub fn submit(&mut self, now: Instant) -> Submission {
        if !self.form_enabled() {
            warn!("submission while the form is disabled, ignoring");
            return Submission::Ignored;
        }

        if let Err(e) = self.limiter.attempt(now) {
            self.begin_cooldown(e.remaining_seconds, now);
            return Submission::Blocked(e);
        }

        let outcome = match &self.dataset {
            DatasetState::Ready(verifier) => verifier.verify(&self.input),
            _ => return Submission::Ignored,
        };

        match outcome {
            Ok(result) => {
                debug!(id = result.certificate_id(), verified = result.is_verified(), "lookup done");
                self.presenter.set_form_enabled(false);
                self.presenter.set_loading(true);
                self.in_flight = Some(result);
                self.timers.schedule(now + self.result_delay, Timer::ResultReady);
                Submission::Pending
            }
            Err(e) => {
                self.notify(ToastKind::Error, e.to_string());
                Submission::Rejected(e)
            }
        }
    }

    /// Fires every timer due at or before `now`, in schedule order. Returns
    /// the number fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((due, timer)) = self.timers.pop_due(now) {
            debug!(?timer, "timer fired");
            self.fire(timer, due);
            fired += 1;
        }
        fired
    }

    /// Returns when the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Copies a share link for the last verified certificate.
    ///
    /// Success and failure are both reported as toasts; the link is returned
    /// on success.
    pub fn share<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> Option<String> {
        let link = self
            .page
            .as_ref()
            .zip(self.last_verified.as_ref())
            .map(|(page, id)| share_link(page, id));
        let Some(link) = link else {
            self.notify(ToastKind::Info, "Verify a certificate before sharing".to_string());
            return None;
        };
        match clipboard.copy(&link) {
            Ok(()) => {
                self.notify(ToastKind::Success, "Link copied to clipboard".to_string());
                Some(link)
            }
            Err(e) => {
                warn!(error = %e, "share link copy failed");
                self.notify(ToastKind::Error, e.to_string());
                None
            }
        }
    }

    /// Returns true if a submission would be processed right now.
    pub fn form_enabled(&self) -> bool {
        matches!(self.dataset, DatasetState::Ready(_))
            && self.in_flight.is_none()
            && !self.limiter.is_cooling()
    }

    /// Returns true once the dataset has failed to load.
    pub fn is_failed(&self) -> bool {
        matches!(self.dataset, DatasetState::Failed)
    }

    /// Returns the current (uppercased) input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Returns the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the presenter mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Ends the session, returning the presenter.
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    fn fire(&mut self, timer: Timer, now: Instant) {
        match timer {
            Timer::AutoTrigger => match self.dataset {
                DatasetState::Loading => self.auto_pending = true,
                DatasetState::Ready(_) => {
                    self.submit(now);
                }
                DatasetState::Failed => {}
            },
            Timer::ResultReady => {
                if let Some(result) = self.in_flight.take() {
                    self.presenter.set_loading(false);
                    if let VerificationResult::Verified { record } = &result {
                        self.last_verified = Some(record.certificate_id.clone());
                    }
                    self.presenter.show_result(&result);
                    self.presenter.set_form_enabled(self.form_enabled());
                }
            }
            Timer::CooldownTick => match self.limiter.tick() {
                LimiterState::Cooling { remaining_seconds } => {
                    self.presenter.show_countdown(remaining_seconds);
                    self.timers.schedule(now + TICK, Timer::CooldownTick);
                }
                LimiterState::Open => {
                    info!("cooldown finished");
                    self.presenter.clear_countdown();
                    self.presenter.set_form_enabled(self.form_enabled());
                }
            },
        }
    }

    fn begin_cooldown(&mut self, remaining_seconds: u64, now: Instant) {
        warn!(remaining_seconds, "too many attempts, cooling down");
        self.presenter.set_form_enabled(false);
        self.presenter.show_countdown(remaining_seconds);
        self.timers.schedule(now + TICK, Timer::CooldownTick);
    }

    fn notify(&mut self, kind: ToastKind, message: String) {
        self.presenter.toast(Toast {
            kind,
            message,
            duration: self.toast_duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_pop_in_deadline_then_insertion_order() {
        let t0 = Instant::now();
        let mut q = TimerQueue::default();
        q.schedule(t0 + Duration::from_secs(2), Timer::CooldownTick);
        q.schedule(t0 + Duration::from_secs(1), Timer::ResultReady);
        q.schedule(t0 + Duration::from_secs(1), Timer::AutoTrigger);

        assert_eq!(q.next_deadline(), Some(t0 + Duration::from_secs(1)));
        assert_eq!(q.pop_due(t0), None);

        let later = t0 + Duration::from_secs(5);
        let order: Vec<Timer> = std::iter::from_fn(|| q.pop_due(later).map(|(_, t)| t)).collect();
        assert_eq!(
            order,
            vec![Timer::ResultReady, Timer::AutoTrigger, Timer::CooldownTick]
        );
    }
}
