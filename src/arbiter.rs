// Input arbitration: remote control is authoritative whenever it is fresh this cycle,
// the local controller is the fallback. There is no blending.

use crate::intent::{DirectionalIntent, Origin};
use crate::remote::RemotePoll;

/// Pick the governing intent for this cycle
pub fn select(
    remote: DirectionalIntent,
    remote_fresh: bool,
    local: DirectionalIntent,
) -> DirectionalIntent {
    if remote_fresh {
        remote.with_origin(Origin::Remote)
    } else {
        local.with_origin(Origin::Local)
    }
}

/// Same rule applied to the result of polling the remote source
pub fn select_poll(remote: RemotePoll, local: DirectionalIntent) -> DirectionalIntent {
    select(remote.intent, remote.fresh, local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Axis;

    const AXES: [Axis; 3] = [Axis::Negative, Axis::Neutral, Axis::Positive];

    #[test]
    fn test_remote_wins_only_when_fresh() {
        for rx in AXES {
            for ry in AXES {
                for lx in AXES {
                    for ly in AXES {
                        let remote = DirectionalIntent::new(rx, ry, Origin::Remote);
                        let local = DirectionalIntent::new(lx, ly, Origin::Local);

                        let picked = select(remote, true, local);
                        assert_eq!(picked, remote);

                        let picked = select(remote, false, local);
                        assert_eq!(picked, local);
                    }
                }
            }
        }
    }

    #[test]
    fn test_origin_is_retagged() {
        // Origin reflects the arbiter's decision, not what the caller passed in
        let remote = DirectionalIntent::new(Axis::Positive, Axis::Neutral, Origin::Local);
        let local = DirectionalIntent::new(Axis::Neutral, Axis::Positive, Origin::Remote);
        assert_eq!(select(remote, true, local).origin, Origin::Remote);
        assert_eq!(select(remote, false, local).origin, Origin::Local);
    }

    #[test]
    fn test_select_is_repeatable() {
        let remote = DirectionalIntent::new(Axis::Positive, Axis::Positive, Origin::Remote);
        let local = DirectionalIntent::new(Axis::Neutral, Axis::Negative, Origin::Local);
        let first = select(remote, false, local);
        let _ = select(remote, true, local);
        assert_eq!(select(remote, false, local), first);
    }

    #[test]
    fn test_select_poll() {
        let remote = RemotePoll {
            intent: DirectionalIntent::new(Axis::Positive, Axis::Positive, Origin::Remote),
            fresh: true,
        };
        let local = DirectionalIntent::new(Axis::Neutral, Axis::Negative, Origin::Local);
        let picked = select_poll(remote, local);
        assert_eq!(picked.values(), (1, 1));
        assert_eq!(picked.origin, Origin::Remote);

        let stale = RemotePoll::idle();
        assert_eq!(select_poll(stale, local), local);
    }
}
