use std::{
    fmt,
    io::{self, Write},
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{Action, NotUnderstood, Object, ObjectId, SlotStore, SymbolId, Symbols};

/// In-memory sink for `print` output.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Arc<Mutex<String>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0.lock().clone()
    }

    /// Return everything written so far and clear the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.0.lock())
    }

    fn push(&self, text: &str) {
        self.0.lock().push_str(text);
    }
}

/// Where the runtime writes what objects print.
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    Buffer(OutputBuffer),
}

impl Output {
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        match self {
            Output::Stdout => io::stdout().lock().write_all(text.as_bytes()),
            Output::Stderr => io::stderr().lock().write_all(text.as_bytes()),
            Output::Buffer(buffer) => {
                buffer.push(text);
                Ok(())
            }
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        match self {
            Output::Stdout => io::stdout().lock().flush(),
            Output::Stderr => io::stderr().lock().flush(),
            Output::Buffer(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeCreateInfo {
    pub output: Output,
    /// Exit status used by the root `quit` slot.
    pub quit_code: i32,
}

/// Snapshot of a runtime's dispatch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub sends: u64,
    pub super_sends: u64,
    pub not_understood: u64,
    /// Chain levels visited by lookups.
    pub hops: u64,
    pub objects: u64,
}

#[derive(Debug, Default)]
struct DispatchCounters {
    sends: AtomicU64,
    super_sends: AtomicU64,
    not_understood: AtomicU64,
    hops: AtomicU64,
}

/// Symbols the runtime itself installs or sends.
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    pub parent: SymbolId,
    pub print: SymbolId,
    pub quit: SymbolId,
}

/// State shared by every object of one runtime.
pub struct RuntimeShared {
    pub symbols: Symbols,
    pub well_known: WellKnown,
    output: Output,
    quit_code: i32,
    id_gen: AtomicU64,
    counters: DispatchCounters,
}

impl RuntimeShared {
    fn new(info: RuntimeCreateInfo) -> Self {
        let symbols = Symbols::new();
        let well_known = WellKnown {
            parent: symbols.intern("parent"),
            print: symbols.intern("print"),
            quit: symbols.intern("quit"),
        };
        Self {
            symbols,
            well_known,
            output: info.output,
            quit_code: info.quit_code,
            id_gen: AtomicU64::new(0),
            counters: DispatchCounters::default(),
        }
    }

    pub(crate) fn next_object_id(&self) -> ObjectId {
        ObjectId(self.id_gen.fetch_add(1, Ordering::Relaxed))
    }

    /// Write `text` to the configured output. Failures are logged, never raised.
    pub fn emit(&self, text: &str) {
        if let Err(err) = self.output.write_str(text) {
            log::warn!("failed to write output: {err}");
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn quit_code(&self) -> i32 {
        self.quit_code
    }

    #[inline]
    pub(crate) fn record_send(&self) {
        self.counters.sends.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_super_send(&self) {
        self.counters.super_sends.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_hop(&self) {
        self.counters.hops.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_not_understood(&self) {
        self.counters.not_understood.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            sends: self.counters.sends.load(Ordering::Relaxed),
            super_sends: self.counters.super_sends.load(Ordering::Relaxed),
            not_understood: self.counters.not_understood.load(Ordering::Relaxed),
            hops: self.counters.hops.load(Ordering::Relaxed),
            objects: self.id_gen.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for RuntimeShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeShared")
            .field("symbols", &self.symbols)
            .field("output", &self.output)
            .field("quit_code", &self.quit_code)
            .field("stats", &self.stats())
            .finish()
    }
}

/// An independent object world: its own symbol table, counters, output and
/// root object.
#[derive(Debug)]
pub struct Runtime {
    shared: Arc<RuntimeShared>,
    root: Object,
}

impl Runtime {
    pub fn new(info: RuntimeCreateInfo) -> Self {
        let shared = Arc::new(RuntimeShared::new(info));
        let root = Object::new_root(shared.clone(), Self::root_slots(&shared.well_known));
        log::debug!("bootstrapped runtime with root {root}");
        Self { shared, root }
    }

    fn root_slots(names: &WellKnown) -> SlotStore {
        let mut store = SlotStore::new();
        let _ = store.insert(names.parent, Action::constant(None));
        let _ = store.insert(
            names.print,
            Action::new(|this, _| {
                this.runtime().emit(&format!("{this}\n"));
                Some(this.clone())
            }),
        );
        let _ = store.insert(
            names.quit,
            Action::new(|this, _| {
                let runtime = this.runtime();
                let code = runtime.quit_code();
                log::debug!("{this} asked to quit, exiting with status {code}");
                if let Err(err) = runtime.output().flush() {
                    log::warn!("failed to flush output before exit: {err}");
                }
                std::process::exit(code)
            }),
        );
        store
    }

    /// The parentless object every other object of this runtime descends from.
    pub fn root(&self) -> Object {
        self.root.clone()
    }

    pub fn shared(&self) -> &Arc<RuntimeShared> {
        &self.shared
    }

    pub fn intern(&self, name: &str) -> SymbolId {
        self.shared.symbols.intern(name)
    }

    pub fn stats(&self) -> DispatchStats {
        self.shared.stats()
    }
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// The process-wide runtime, built on first use.
pub fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Runtime::new(RuntimeCreateInfo::default()))
}

/// Root object of the process-wide runtime.
pub fn object() -> Object {
    runtime().root()
}

/// Intern `name` in the process-wide symbol table.
pub fn intern(name: &str) -> SymbolId {
    runtime().intern(name)
}

/// Log a failed lookup and count it against the receiver's runtime.
pub(crate) fn report(err: &NotUnderstood, receiver: Option<&Object>) {
    log::warn!("{err}");
    if let Some(receiver) = receiver {
        receiver.runtime().record_not_understood();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::send;
    use std::{
        sync::{Barrier, atomic::AtomicUsize},
        thread,
    };

    fn buffered() -> (Runtime, OutputBuffer) {
        let buffer = OutputBuffer::new();
        let runtime = Runtime::new(RuntimeCreateInfo {
            output: Output::Buffer(buffer.clone()),
            ..Default::default()
        });
        (runtime, buffer)
    }

    #[test]
    fn root_is_a_singleton() {
        assert_eq!(object(), object());
        assert!(object().parent().is_none());
    }

    #[test]
    fn concurrent_first_access_builds_one_root() {
        let cell: Arc<OnceLock<Runtime>> = Arc::new(OnceLock::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cell = cell.clone();
                let builds = builds.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let runtime = cell.get_or_init(|| {
                        builds.fetch_add(1, Ordering::SeqCst);
                        Runtime::new(RuntimeCreateInfo::default())
                    });
                    runtime.root()
                })
            })
            .collect();

        let roots: Vec<Object> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(roots.iter().all(|root| *root == roots[0]));
    }

    #[test]
    fn global_intern_is_idempotent() {
        assert_eq!(intern("x"), intern("x"));
        assert_ne!(intern("x"), intern("y"));
    }

    #[test]
    fn root_parent_is_null() {
        let (rt, _) = buffered();
        assert!(send(&rt.root(), "parent", None).is_none());
        assert_eq!(rt.stats().not_understood, 0);
    }

    #[test]
    fn root_print_reports_identity_and_returns_self() {
        let (rt, out) = buffered();
        let root = rt.root();
        let result = send(&root, "print", None);
        assert_eq!(result, Some(root.clone()));
        assert_eq!(out.take(), format!("{root}\n"));
    }

    #[test]
    fn print_is_inherited_with_receiver_identity() {
        let (rt, out) = buffered();
        let child = rt.root().clone_child();
        assert_eq!(send(&child, "print", None), Some(child.clone()));
        assert_eq!(out.take(), format!("{child}\n"));
    }

    #[test]
    fn baseline_slots_are_interned_up_front() {
        let (rt, _) = buffered();
        let symbols = &rt.shared().symbols;
        assert_eq!(symbols.find("parent"), Some(rt.shared().well_known.parent));
        assert_eq!(symbols.find("print"), Some(rt.shared().well_known.print));
        assert_eq!(symbols.find("quit"), Some(rt.shared().well_known.quit));
        assert!(rt.root().has_own_slot("quit"));
    }

    #[test]
    fn stats_count_objects() {
        let (rt, _) = buffered();
        let before = rt.stats().objects;
        let a = rt.root().clone_child();
        let _b = a.clone_child();
        assert_eq!(rt.stats().objects, before + 2);
    }

    #[test]
    fn runtimes_do_not_share_objects_or_counters() {
        let (a, _) = buffered();
        let (b, _) = buffered();
        assert_ne!(a.root(), b.root());
        send(&a.root(), "missing", None);
        assert_eq!(a.stats().not_understood, 1);
        assert_eq!(b.stats().not_understood, 0);
    }
}
