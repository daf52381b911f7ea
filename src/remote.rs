// Remote joystick input
// Payloads arrive on the subscription between cycles; the runtime feeds them in with
// `on_payload` and then calls `poll` exactly once per cycle. Freshness lives only
// inside one cycle: `poll` reports it and resets it.

use tracing::{debug, warn};

use crate::config::RemoteConfig;
use crate::intent::{Axis, DirectionalIntent, Origin};
use crate::messages::RemoteCommand;

/// Result of draining the remote source for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePoll {
    pub intent: DirectionalIntent,
    pub fresh: bool,
}

impl RemotePoll {
    /// No remote command this cycle
    pub fn idle() -> Self {
        Self {
            intent: DirectionalIntent::neutral(Origin::Remote),
            fresh: false,
        }
    }
}

pub struct RemoteInput {
    config: RemoteConfig,
    pending: Option<DirectionalIntent>,
}

impl RemoteInput {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    /// Convert a decoded command to an intent, `None` if it carries no joystick axes
    pub fn decode(&self, cmd: &RemoteCommand) -> Option<DirectionalIntent> {
        let x = cmd.left_x_mapped?;
        let y = cmd.left_y_mapped.unwrap_or(0.0);

        let x = Axis::from_deadband(x as i64, self.config.deadband);
        let mut y = Axis::from_deadband(y as i64, self.config.deadband);
        if self.config.invert_y {
            y = y.inverted();
        }

        Some(DirectionalIntent::new(x, y, Origin::Remote))
    }

    /// Process one raw payload. Malformed payloads are logged and dropped.
    /// Returns true when the payload produced an intent.
    pub fn on_payload(&mut self, payload: &[u8]) -> bool {
        let cmd = match serde_json::from_slice::<RemoteCommand>(payload) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Failed to parse remote command: {}", e);
                return false;
            }
        };

        match self.decode(&cmd) {
            Some(intent) => {
                debug!(
                    "Remote joystick: x={:?} y={:?} -> {:?}",
                    cmd.left_x_mapped,
                    cmd.left_y_mapped,
                    intent.values()
                );
                // Latest command in the cycle wins
                self.pending = Some(intent);
                true
            }
            None => {
                debug!("Remote command without joystick axes ignored");
                false
            }
        }
    }

    /// Report this cycle's remote intent and reset freshness for the next cycle
    pub fn poll(&mut self) -> RemotePoll {
        match self.pending.take() {
            Some(intent) => RemotePoll {
                intent,
                fresh: true,
            },
            None => RemotePoll::idle(),
        }
    }
}

impl Default for RemoteInput {
    fn default() -> Self {
        Self::new(RemoteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_sets_fresh_for_one_poll() {
        let mut remote = RemoteInput::default();
        assert!(remote.on_payload(br#"{"left_x_mapped": 50, "left_y_mapped": 50}"#));

        let poll = remote.poll();
        assert!(poll.fresh);
        assert_eq!(poll.intent.values(), (1, 1));
        assert_eq!(poll.intent.origin, Origin::Remote);

        // Freshness never carries into the next cycle
        let poll = remote.poll();
        assert!(!poll.fresh);
    }

    #[test]
    fn test_deadband() {
        let mut remote = RemoteInput::default();
        for (x, y, expected) in [
            (-11, 11, (-1, 1)),
            (-10, 10, (0, 0)),
            (0, 0, (0, 0)),
            (11, -11, (1, -1)),
            (100, -100, (1, -1)),
        ] {
            let payload = format!(r#"{{"left_x_mapped": {}, "left_y_mapped": {}}}"#, x, y);
            assert!(remote.on_payload(payload.as_bytes()));
            let poll = remote.poll();
            assert!(poll.fresh);
            assert_eq!(poll.intent.values(), expected, "for ({}, {})", x, y);
        }
    }

    #[test]
    fn test_neutral_payload_is_still_fresh() {
        // A centred joystick is a real command: it overrides the local controller with Stop
        let mut remote = RemoteInput::default();
        assert!(remote.on_payload(br#"{"left_x_mapped": 0, "left_y_mapped": 0}"#));
        let poll = remote.poll();
        assert!(poll.fresh);
        assert_eq!(poll.intent.values(), (0, 0));
    }

    #[test]
    fn test_missing_fields_are_absence() {
        let mut remote = RemoteInput::default();
        assert!(!remote.on_payload(br#"{"battery": 7.4}"#));
        assert!(!remote.poll().fresh);
    }

    #[test]
    fn test_malformed_payload_is_absence() {
        let mut remote = RemoteInput::default();
        assert!(!remote.on_payload(b"not json at all"));
        assert!(!remote.on_payload(br#"{"left_x_mapped": "left"}"#));
        assert!(!remote.poll().fresh);
    }

    #[test]
    fn test_malformed_payload_keeps_earlier_intent() {
        let mut remote = RemoteInput::default();
        assert!(remote.on_payload(br#"{"left_x_mapped": -30, "left_y_mapped": 0}"#));
        assert!(!remote.on_payload(b"{"));
        let poll = remote.poll();
        assert!(poll.fresh);
        assert_eq!(poll.intent.values(), (-1, 0));
    }

    #[test]
    fn test_latest_payload_wins() {
        let mut remote = RemoteInput::default();
        remote.on_payload(br#"{"left_x_mapped": -30, "left_y_mapped": 0}"#);
        remote.on_payload(br#"{"left_x_mapped": 0, "left_y_mapped": -30}"#);
        assert_eq!(remote.poll().intent.values(), (0, -1));
    }

    #[test]
    fn test_missing_y_defaults_to_neutral() {
        let mut remote = RemoteInput::default();
        assert!(remote.on_payload(br#"{"left_x_mapped": 40}"#));
        assert_eq!(remote.poll().intent.values(), (1, 0));
    }

    #[test]
    fn test_invert_y() {
        let mut remote = RemoteInput::new(RemoteConfig {
            invert_y: true,
            ..RemoteConfig::default()
        });
        remote.on_payload(br#"{"left_x_mapped": 0, "left_y_mapped": -40}"#);
        assert_eq!(remote.poll().intent.values(), (0, 1));
    }
}
