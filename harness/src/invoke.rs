//! Execution wrapper: one guarded call of a candidate.
//!
//! Every exit path (return, error, panic, arity mismatch) yields an
//! [`ExecutionOutcome`]; nothing propagates to the caller.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use serde_json::Value;
use tracing::{debug, warn};

use crate::candidate::Candidate;
use crate::console::CaptureBuffer;
use crate::core::outcome::{ExecutionOutcome, Failure, FailureKind};

pub const DEFAULT_CAPTURE_LIMIT_BYTES: usize = 1_000_000;

thread_local! {
    static CAPTURING_PANICS: Cell<bool> = const { Cell::new(false) };
    static PANIC_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// How candidate output is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Captured output beyond this many bytes is dropped.
    pub limit_bytes: usize,
    /// Mirror captured lines to the harness's stderr as they are written.
    pub echo_to_stderr: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            limit_bytes: DEFAULT_CAPTURE_LIMIT_BYTES,
            echo_to_stderr: false,
        }
    }
}

impl CaptureSettings {
    /// Fresh, empty capture for one invocation.
    pub fn new_buffer(&self) -> CaptureBuffer {
        let buffer = CaptureBuffer::new(self.limit_bytes);
        if self.echo_to_stderr {
            buffer.tee(Box::new(std::io::stderr()))
        } else {
            buffer
        }
    }
}

/// Call `candidate` with `args`, capturing its console output.
pub fn invoke(
    candidate: &mut dyn Candidate,
    args: &[Value],
    settings: &CaptureSettings,
) -> ExecutionOutcome {
    invoke_with(candidate, args, settings.new_buffer())
}

/// Like [`invoke`], with a caller-supplied capture buffer.
pub fn invoke_with(
    candidate: &mut dyn Candidate,
    args: &[Value],
    mut console: CaptureBuffer,
) -> ExecutionOutcome {
    let arity = candidate.arity();
    if args.len() != arity {
        debug!(
            candidate = candidate.name(),
            arity,
            args = args.len(),
            "arity mismatch, candidate not called"
        );
        return ExecutionOutcome::failed(
            Failure::arity_mismatch(arity, args.len()),
            console.finish(),
        );
    }

    let capture = PanicCapture::start();
    let result = panic::catch_unwind(AssertUnwindSafe(|| candidate.call(args, &mut console)));
    let site = capture.take_site();
    drop(capture);

    if console.dropped_bytes() > 0 {
        warn!(
            candidate = candidate.name(),
            dropped_bytes = console.dropped_bytes(),
            "captured output truncated"
        );
    }
    let captured = console.finish();

    match result {
        Ok(Ok(value)) => ExecutionOutcome::returned(value, captured),
        // Debug output carries the cause chain and any captured backtrace.
        Ok(Err(err)) => ExecutionOutcome::failed(
            Failure::new(FailureKind::RaisedError, format!("{err:?}")),
            captured,
        ),
        Err(payload) => ExecutionOutcome::failed(
            Failure::new(
                FailureKind::Panicked,
                panic_description(payload.as_ref(), site),
            ),
            captured,
        ),
    }
}

/// Where a candidate panicked, recorded by the panic hook.
#[derive(Debug, Default)]
struct PanicSite {
    location: Option<String>,
    backtrace: Option<String>,
}

/// Install the process panic hook once.
///
/// While a thread is inside an invocation the hook records the panic site
/// instead of printing; every other panic goes to the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING_PANICS.with(Cell::get) {
                previous(info);
                return;
            }
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            let backtrace = Backtrace::capture();
            let backtrace =
                (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string());
            PANIC_SITE.with(|site| {
                *site.borrow_mut() = Some(PanicSite {
                    location,
                    backtrace,
                });
            });
        }));
    });
}

/// Marks the current thread as running a candidate until dropped.
struct PanicCapture {
    outer: bool,
}

impl PanicCapture {
    fn start() -> Self {
        install_panic_hook();
        PANIC_SITE.with(|site| site.borrow_mut().take());
        Self {
            outer: CAPTURING_PANICS.with(|flag| flag.replace(true)),
        }
    }

    fn take_site(&self) -> Option<PanicSite> {
        PANIC_SITE.with(|site| site.borrow_mut().take())
    }
}

impl Drop for PanicCapture {
    fn drop(&mut self) {
        CAPTURING_PANICS.with(|flag| flag.set(self.outer));
    }
}

fn panic_description(payload: &(dyn Any + Send), site: Option<PanicSite>) -> String {
    let message = if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string payload".to_string()
    };
    let site = site.unwrap_or_default();
    let mut description = match site.location {
        Some(location) => format!("panicked at {location}: {message}"),
        None => format!("panicked: {message}"),
    };
    if let Some(backtrace) = site.backtrace {
        description.push_str("\n\nstack backtrace:\n");
        description.push_str(&backtrace);
    }
    description
}
