//! Ori Invoke - compiled, cached member invocation.
//!
//! Resolving a member is the expensive part of late-bound invocation. This
//! crate resolves once per [`InvokerShape`], compiles the result into an
//! [`Invoker`] and keeps it in an [`InvokerCache`] for the rest of the
//! process.
//!
//! # Architecture
//!
//! - `shape`: the cache key (type, name, binding, signature, visibility, access)
//! - `compiler`: shape to invoker, branching per member kind
//! - `invoker`: argument checks and conversions around the bound call path
//! - `cache`: sharded compute-or-fetch map, first writer wins
//! - `reflector`: facade tying a host and a cache together
//!
//! # Tracing
//!
//! Enable with `RUST_LOG=ori_invoke=debug` (cache misses, builds, publish
//! races) or `RUST_LOG=ori_reflect=trace` (lookup paths), then call
//! [`init_tracing`].

use std::sync::Once;

mod cache;
mod compiler;
mod errors;
mod invoker;
mod reflector;
mod shape;

#[cfg(test)]
mod test_helpers;

pub use cache::InvokerCache;
pub use compiler::compile;
pub use errors::InvokeError;
pub use invoker::Invoker;
pub use reflector::{Reflector, ReflectorBuilder};
pub use shape::{Access, Binding, InvokerShape, ShapeDisplay};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times; does nothing
/// unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
