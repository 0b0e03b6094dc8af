//! Test double for the script-engine seam.
//!
//! Contexts and promises are plain shared state, so tests can assert
//! exactly what the core did to them: every promise records whether it was
//! fulfilled, rejected or discarded, and settles at most once (a second
//! settlement panics, which is how the exactly-once properties are
//! enforced).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use framewire_common::protocol::{CallArgs, ObjectRegistration, Result};
use framewire_renderer::dispatcher::CallDispatcher;
use framewire_renderer::engine::{ContextHandle, ScriptEngine};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a simulated script context.
#[derive(Clone)]
pub struct FakeContext {
    state: Arc<ContextState>,
}

struct ContextState {
    id: u64,
    alive: AtomicBool,
    has_frame: AtomicBool,
}

impl FakeContext {
    pub fn new() -> Self {
        FakeContext {
            state: Arc::new(ContextState {
                id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
                alive: AtomicBool::new(true),
                has_frame: AtomicBool::new(true),
            }),
        }
    }

    /// Simulates native destruction of the context backing.
    pub fn destroy(&self) {
        self.state.alive.store(false, Ordering::SeqCst);
        self.state.has_frame.store(false, Ordering::SeqCst);
    }

    /// Simulates a context with no resolvable script frame.
    pub fn drop_frame(&self) {
        self.state.has_frame.store(false, Ordering::SeqCst);
    }

    fn id(&self) -> u64 {
        self.state.id
    }
}

impl ContextHandle for FakeContext {
    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn is_alive(&self) -> bool {
        self.state.alive.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PromiseState {
    Pending,
    Fulfilled(CallArgs),
    Rejected(String),
    Discarded,
}

/// Handle to a simulated native promise. Clones share one state.
#[derive(Clone, Debug)]
pub struct FakePromise {
    state: Arc<Mutex<PromiseState>>,
}

impl FakePromise {
    pub fn state(&self) -> PromiseState {
        self.state.lock().unwrap().clone()
    }

    fn settle(&self, next: PromiseState) {
        let mut state = self.state.lock().unwrap();
        assert_eq!(*state, PromiseState::Pending, "promise settled twice");
        *state = next;
    }
}

struct InstalledObject {
    methods: Vec<String>,
    dispatcher: CallDispatcher<FakeEngine>,
}

/// Script engine double tracking installed globals and created promises.
#[derive(Default)]
pub struct FakeEngine {
    installed: Mutex<HashMap<(u64, String), InstalledObject>>,
    promises: Mutex<Vec<FakePromise>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Names of the globals installed in `ctx`, sorted.
    pub fn installed_objects(&self, ctx: &FakeContext) -> Vec<String> {
        let installed = self.installed.lock().unwrap();
        let mut names: Vec<String> = installed
            .keys()
            .filter(|(id, _)| *id == ctx.id())
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Simulates the script call `object.method(args)` in `ctx` through
    /// the installed forwarding callable.
    pub fn invoke(
        &self,
        ctx: &FakeContext,
        object: &str,
        method: &str,
        args: CallArgs,
    ) -> Result<FakePromise> {
        let dispatcher = {
            let installed = self.installed.lock().unwrap();
            let entry = installed
                .get(&(ctx.id(), object.to_string()))
                .unwrap_or_else(|| panic!("object '{}' not installed in context", object));
            assert!(
                entry.methods.iter().any(|m| m == method),
                "method '{}' not installed on '{}'",
                method,
                object
            );
            entry.dispatcher.clone()
        };
        dispatcher.dispatch_call(object, method, args, ctx)
    }

    /// Every promise the engine has created, in creation order.
    pub fn promises(&self) -> Vec<FakePromise> {
        self.promises.lock().unwrap().clone()
    }
}

impl ScriptEngine for FakeEngine {
    type Context = FakeContext;
    type Promise = FakePromise;

    fn create_promise(&self, ctx: &FakeContext) -> Option<FakePromise> {
        if !ctx.is_alive() || !ctx.state.has_frame.load(Ordering::SeqCst) {
            return None;
        }
        let promise = FakePromise {
            state: Arc::new(Mutex::new(PromiseState::Pending)),
        };
        self.promises.lock().unwrap().push(promise.clone());
        Some(promise)
    }

    fn fulfill(&self, ctx: &FakeContext, promise: FakePromise, value: CallArgs) {
        assert!(ctx.is_alive(), "fulfilled a promise in a dead context");
        promise.settle(PromiseState::Fulfilled(value));
    }

    fn reject(&self, ctx: &FakeContext, promise: FakePromise, error: &str) {
        assert!(ctx.is_alive(), "rejected a promise in a dead context");
        promise.settle(PromiseState::Rejected(error.to_string()));
    }

    fn discard(&self, promise: FakePromise) {
        promise.settle(PromiseState::Discarded);
    }

    fn install_object(
        &self,
        ctx: &FakeContext,
        registration: &ObjectRegistration,
        dispatcher: &CallDispatcher<Self>,
    ) -> bool {
        if !ctx.is_alive() {
            return false;
        }
        self.installed.lock().unwrap().insert(
            (ctx.id(), registration.name.clone()),
            InstalledObject {
                methods: registration.methods.clone(),
                dispatcher: dispatcher.clone(),
            },
        );
        true
    }

    fn remove_object(&self, ctx: &FakeContext, name: &str) -> bool {
        if !ctx.is_alive() {
            return false;
        }
        self.installed
            .lock()
            .unwrap()
            .remove(&(ctx.id(), name.to_string()))
            .is_some()
    }
}
