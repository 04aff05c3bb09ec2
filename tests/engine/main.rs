//! Integration tests for Layer 2: Engine
//!
//! Tests for the world, components, and resource loaders.

mod components;
mod loader;

use std::thread;
use std::time::{Duration, Instant};

use lette_engine::LoaderSystem;

/// Polls a loader until every started load has reported back.
pub fn settle<R: Send + 'static>(system: &mut LoaderSystem<R>) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut committed = 0;
    loop {
        committed += system.poll();
        if system.in_flight() == 0 {
            return committed;
        }
        assert!(Instant::now() < deadline, "loads did not finish in time");
        thread::sleep(Duration::from_millis(1));
    }
}
