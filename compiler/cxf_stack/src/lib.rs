//! Stack safety for deep tree recursion.
//!
//! Resolution recurses along the AST and is only depth-guarded per name, not
//! overall. Deeply nested input can therefore still push the native call
//! stack hard; wrapping the recursive steps in [`ensure_sufficient_stack`]
//! grows the stack on demand instead of overflowing it.
//!
//! On WASM targets this is a passthrough.

/// Remaining stack below which we grow (64KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 64 * 1024;

/// Stack segment size allocated per growth (2MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if the red zone has been reached.
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_GROWTH, f)
}

/// Run `f` directly; WASM manages its own stack.
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
