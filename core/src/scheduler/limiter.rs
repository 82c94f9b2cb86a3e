//! Per-actor cooldown on the forced-spawn side channel.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use lure_types::ActorId;

/// Rate-limits "request spawn" calls per actor so scheduler nudges and
/// replacement requests cannot flood the host console.
#[derive(Debug)]
pub struct SpawnRateLimiter {
    cooldown: Duration,
    last_request: Mutex<HashMap<ActorId, Instant>>,
}

impl SpawnRateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_request: Mutex::new(HashMap::new()),
        }
    }

    /// True if the actor may fire a request at `now`. A granted acquire is
    /// recorded; a denied one is not.
    pub fn try_acquire(&self, actor: ActorId, now: Instant) -> bool {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match last.get(&actor) {
            Some(&previous) if now.duration_since(previous) < self.cooldown => false,
            _ => {
                last.insert(actor, now);
                true
            }
        }
    }

    /// Drop per-actor bookkeeping on disconnect.
    pub fn forget(&self, actor: ActorId) {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_gates_repeat_requests() {
        let limiter = SpawnRateLimiter::new(Duration::from_secs(30));
        let actor = ActorId::random();
        let t0 = Instant::now();

        assert!(limiter.try_acquire(actor, t0));
        assert!(!limiter.try_acquire(actor, t0 + Duration::from_secs(29)));
        assert!(limiter.try_acquire(actor, t0 + Duration::from_secs(30)));
    }

    #[test]
    fn test_denied_acquire_does_not_reset_the_clock() {
        let limiter = SpawnRateLimiter::new(Duration::from_secs(30));
        let actor = ActorId::random();
        let t0 = Instant::now();

        assert!(limiter.try_acquire(actor, t0));
        assert!(!limiter.try_acquire(actor, t0 + Duration::from_secs(20)));
        // 30s after the *granted* request, not the denied one
        assert!(limiter.try_acquire(actor, t0 + Duration::from_secs(31)));
    }

    #[test]
    fn test_actors_are_independent() {
        let limiter = SpawnRateLimiter::new(Duration::from_secs(30));
        let t0 = Instant::now();
        assert!(limiter.try_acquire(ActorId::random(), t0));
        assert!(limiter.try_acquire(ActorId::random(), t0));
    }

    #[test]
    fn test_forget_clears_the_cooldown() {
        let limiter = SpawnRateLimiter::new(Duration::from_secs(30));
        let actor = ActorId::random();
        let t0 = Instant::now();

        assert!(limiter.try_acquire(actor, t0));
        limiter.forget(actor);
        assert!(limiter.try_acquire(actor, t0 + Duration::from_secs(1)));
    }
}
