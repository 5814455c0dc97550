//! In-memory tracking client for tests.
//!
//! A [`FakeContext`] resolves a scripted set of paths and lets tests push reports through
//! whatever callbacks a driver registered. Clones share state, so a test can keep one handle
//! while the driver owns another.

use glam::{DQuat, DVec3};
use osvr::{
    AnalogReport, ButtonReport, ButtonState, Callback, ClientContext, ClientInterface, Pose3,
    PoseReport, TimeValue,
};
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Weak};

slotmap::new_key_type! {
    struct SubscriptionKey;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Readiness {
    Ready,
    AfterUpdates(u32),
    Never,
}

struct Subscription {
    path: String,
    callback: Arc<Callback>,
}

struct Shared {
    readiness: Mutex<Readiness>,
    updates: AtomicU32,
    clock: AtomicI64,
    keep_after_free: AtomicBool,
    latched: Mutex<HashMap<String, f64>>,
    paths: Mutex<HashSet<String>>,
    subscriptions: Mutex<SlotMap<SubscriptionKey, Subscription>>,
}

#[derive(Clone)]
pub struct FakeContext(Arc<Shared>);

impl Default for FakeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeContext {
    /// A context that is ready immediately and resolves no paths.
    pub fn new() -> Self {
        Self(Arc::new(Shared {
            readiness: Mutex::new(Readiness::Ready),
            updates: AtomicU32::new(0),
            clock: AtomicI64::new(0),
            keep_after_free: AtomicBool::new(false),
            latched: Mutex::new(HashMap::new()),
            paths: Mutex::new(HashSet::new()),
            subscriptions: Mutex::new(SlotMap::with_key()),
        }))
    }

    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ctx = Self::new();
        for path in paths {
            ctx.add_path(path);
        }
        ctx
    }

    pub fn never_ready(self) -> Self {
        *self.0.readiness.lock().unwrap() = Readiness::Never;
        self
    }

    /// Reports ready once [`ClientContext::update`] has been called `count` times.
    pub fn ready_after_updates(self, count: u32) -> Self {
        *self.0.readiness.lock().unwrap() = Readiness::AfterUpdates(count);
        self
    }

    pub fn add_path(&self, path: impl Into<String>) {
        self.0.paths.lock().unwrap().insert(path.into());
    }

    /// Keeps callbacks registered after their interface is freed, like a client that is slow to
    /// tear down its delivery threads.
    pub fn keep_callbacks_after_free(self) -> Self {
        self.0.keep_after_free.store(true, Ordering::Relaxed);
        self
    }

    /// Analog callbacks registered on `path` get `value` delivered from inside
    /// [`ClientInterface::register_callback`], before it returns.
    pub fn latch_analog(&self, path: impl Into<String>, value: f64) {
        self.0.latched.lock().unwrap().insert(path.into(), value);
    }

    pub fn update_count(&self) -> u32 {
        self.0.updates.load(Ordering::Relaxed)
    }

    /// Paths with at least one live callback, sorted.
    pub fn subscribed_paths(&self) -> Vec<String> {
        let subs = self.0.subscriptions.lock().unwrap();
        let mut paths: Vec<String> = subs.values().map(|s| s.path.clone()).collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn subscription_count(&self) -> usize {
        self.0.subscriptions.lock().unwrap().len()
    }

    pub fn send_pose(&self, path: &str, translation: DVec3, rotation: DQuat) {
        let report = PoseReport {
            sensor: 0,
            pose: Pose3 {
                translation,
                rotation,
            },
        };
        let time = self.tick();
        self.dispatch(path, |cb| {
            if let Callback::Pose(f) = cb {
                f(&time, &report);
            }
        });
    }

    pub fn send_button(&self, path: &str, sensor: i32, pressed: bool) {
        let report = ButtonReport {
            sensor,
            state: ButtonState::from(pressed),
        };
        let time = self.tick();
        self.dispatch(path, |cb| {
            if let Callback::Button(f) = cb {
                f(&time, &report);
            }
        });
    }

    pub fn send_analog(&self, path: &str, value: f64) {
        let report = AnalogReport {
            sensor: 0,
            state: value,
        };
        let time = self.tick();
        self.dispatch(path, |cb| {
            if let Callback::Analog(f) = cb {
                f(&time, &report);
            }
        });
    }

    fn tick(&self) -> TimeValue {
        let micros = self.0.clock.fetch_add(1000, Ordering::Relaxed);
        TimeValue {
            seconds: micros / 1_000_000,
            microseconds: (micros % 1_000_000) as i32,
        }
    }

    fn dispatch(&self, path: &str, deliver: impl Fn(&Callback)) {
        // Callbacks run unlocked so they are free to touch the context themselves.
        let callbacks: Vec<Arc<Callback>> = self
            .0
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.path == path)
            .map(|s| s.callback.clone())
            .collect();

        for cb in callbacks {
            deliver(&cb);
        }
    }
}

impl ClientContext for FakeContext {
    fn check_status(&self) -> bool {
        match *self.0.readiness.lock().unwrap() {
            Readiness::Ready => true,
            Readiness::AfterUpdates(count) => self.update_count() >= count,
            Readiness::Never => false,
        }
    }

    fn update(&self) {
        self.0.updates.fetch_add(1, Ordering::Relaxed);
    }

    fn get_interface(&self, path: &str) -> Option<Box<dyn ClientInterface>> {
        if !self.0.paths.lock().unwrap().contains(path) {
            return None;
        }

        Some(Box::new(FakeInterface {
            path: path.to_owned(),
            shared: Arc::downgrade(&self.0),
            keys: Vec::new(),
        }))
    }
}

struct FakeInterface {
    path: String,
    shared: Weak<Shared>,
    keys: Vec<SubscriptionKey>,
}

impl ClientInterface for FakeInterface {
    fn path(&self) -> &str {
        &self.path
    }

    fn register_callback(&mut self, callback: Callback) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let callback = Arc::new(callback);
        let key = shared.subscriptions.lock().unwrap().insert(Subscription {
            path: self.path.clone(),
            callback: callback.clone(),
        });
        self.keys.push(key);

        let latched = shared.latched.lock().unwrap().get(&self.path).copied();
        if let (Some(value), Callback::Analog(f)) = (latched, &*callback) {
            let report = AnalogReport {
                sensor: 0,
                state: value,
            };
            f(&TimeValue::default(), &report);
        }
    }

    fn free(&mut self) {
        let Some(shared) = self.shared.upgrade() else {
            self.keys.clear();
            return;
        };
        if shared.keep_after_free.load(Ordering::Relaxed) {
            self.keys.clear();
            return;
        }
        let mut subs = shared.subscriptions.lock().unwrap();
        for key in self.keys.drain(..) {
            subs.remove(key);
        }
    }
}

impl Drop for FakeInterface {
    fn drop(&mut self) {
        self.free();
    }
}
