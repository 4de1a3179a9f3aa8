use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("confab.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("confab.client.request_errors");

pub(crate) static CONTROLLER_SUBMITS: Counter = Counter::new("confab.controller.submits");
pub(crate) static CONTROLLER_SUBMITS_REJECTED: Counter =
    Counter::new("confab.controller.submits_rejected");
pub(crate) static CONTROLLER_TURN_ERRORS: Counter = Counter::new("confab.controller.turn_errors");
pub(crate) static CONTROLLER_STALE_REPLIES: Counter =
    Counter::new("confab.controller.stale_replies");
pub(crate) static CONTROLLER_RESETS: Counter = Counter::new("confab.controller.resets");
pub(crate) static CONTROLLER_RESET_ERRORS: Counter =
    Counter::new("confab.controller.reset_errors");
pub(crate) static CONTROLLER_TURN_DURATION: Moments =
    Moments::new("confab.controller.turn_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&CONTROLLER_SUBMITS);
    collector.register_counter(&CONTROLLER_SUBMITS_REJECTED);
    collector.register_counter(&CONTROLLER_TURN_ERRORS);
    collector.register_counter(&CONTROLLER_STALE_REPLIES);
    collector.register_counter(&CONTROLLER_RESETS);
    collector.register_counter(&CONTROLLER_RESET_ERRORS);
    collector.register_moments(&CONTROLLER_TURN_DURATION);
}
