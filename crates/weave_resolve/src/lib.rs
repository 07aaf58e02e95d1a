//! Hierarchy resolution: threads a named signal or parameter through every
//! module and instance boundary between a set of endpoints.
//!
//! A request runs in five stages:
//!
//! 1. [`walker`] turns each endpoint into a chain of hops up to its root.
//! 2. [`merge`] combines the chains into one tree.
//! 3. [`reduce`] drops the inferred, non-branching top of that tree.
//! 4. [`realize`] creates declarations, ports and pins (or parameters and
//!    adjustments) for the remaining hops.
//! 5. [`aggregate`] joins them into a net (or tags them with the parameter).
//!
//! Request-level failures are returned as [`ResolveError`] before anything is
//! created. Problems with single hops are reported to the [`DiagnosticSink`]
//! and the rest of the request still goes through.
//!
//! # Usage
//!
//! ```ignore
//! let src = Endpoint::new(leaf);
//! let objects = connection(&mut db, &sink, "data", Some(&src), &[Endpoint::new(top)])?;
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod endpoint;
pub mod error;
pub mod errors;
pub mod merge;
pub mod names;
pub mod realize;
pub mod reduce;
pub mod walker;

use tracing::{debug, debug_span};
use weave_db::{Database, ObjectId, ObjectKind};
use weave_diagnostics::DiagnosticSink;

pub use endpoint::{ConnectionDir, Endpoint};
pub use error::ResolveError;
pub use merge::ConnTree;
pub use names::strip_direction_suffix;
pub use realize::Mode;
pub use walker::ConnNode;

use realize::Realizer;

/// Connects `signal` between `source` and `targets`.
///
/// The source is walked upwards and the targets downwards. Without a source,
/// each target keeps its own requested direction. Returns the created
/// declarations, ports and pins in creation order; they all belong to the new
/// net `signal`. An empty result (with a warning) is a valid outcome.
pub fn connection(
    db: &mut Database,
    sink: &DiagnosticSink,
    signal: &str,
    source: Option<&Endpoint>,
    targets: &[Endpoint],
) -> Result<Vec<ObjectId>, ResolveError> {
    let request = format!("connection {signal}");
    let _span = debug_span!("connection", signal).entered();

    if signal.is_empty() || (source.is_none() && targets.is_empty()) {
        return Err(ResolveError::EmptyRequest(request));
    }
    if db.net_by_name(signal).is_some() {
        return Err(ResolveError::NetExists(signal.to_string()));
    }

    let target_dir = |t: &Endpoint| {
        if source.is_some() {
            ConnectionDir::Down
        } else {
            t.dir
        }
    };
    let endpoints: Vec<(&Endpoint, ConnectionDir)> = source
        .map(|s| (s, ConnectionDir::Up))
        .into_iter()
        .chain(targets.iter().map(|t| (t, target_dir(t))))
        .collect();

    let Some(tree) = resolve_tree(db, sink, &request, signal, &endpoints)? else {
        return Ok(Vec::new());
    };
    let objects = Realizer::new(db, sink, request.as_str(), signal, Mode::Signal).realize(&tree)?;
    aggregate::aggregate_net(db, sink, &request, signal, objects)
}

/// Threads parameter `name` with `default_value` down to every target.
///
/// The root of the resolved tree gets the parameter itself (module-local if
/// `local` is set); each instance below gets an adjustment binding it to the
/// parameter of its parent module.
pub fn parameter(
    db: &mut Database,
    sink: &DiagnosticSink,
    name: &str,
    default_value: &str,
    targets: &[Endpoint],
    local: bool,
) -> Result<Vec<ObjectId>, ResolveError> {
    let request = format!("parameter {name}");
    let _span = debug_span!("parameter", name).entered();

    if name.is_empty() || targets.is_empty() {
        return Err(ResolveError::EmptyRequest(request));
    }
    let endpoints: Vec<(&Endpoint, ConnectionDir)> = targets
        .iter()
        .map(|t| (t, ConnectionDir::Default))
        .collect();

    let Some(tree) = resolve_tree(db, sink, &request, name, &endpoints)? else {
        return Ok(Vec::new());
    };
    let mode = Mode::Parameter {
        default_value,
        local,
    };
    let objects = Realizer::new(db, sink, request.as_str(), name, mode).realize(&tree)?;
    aggregate::tag_parameter(db, sink, &request, name, objects)
}

/// Validates the endpoints, then walks, merges and reduces them.
///
/// Returns `Ok(None)` with a warning when nothing is left to realize.
fn resolve_tree(
    db: &Database,
    sink: &DiagnosticSink,
    request: &str,
    name: &str,
    endpoints: &[(&Endpoint, ConnectionDir)],
) -> Result<Option<ConnTree>, ResolveError> {
    for (endpoint, _) in endpoints {
        let valid = db
            .object(endpoint.object)
            .is_some_and(|o| matches!(o.kind(), ObjectKind::Module | ObjectKind::Instance));
        if !valid {
            return Err(ResolveError::InvalidEndpoint {
                request: request.to_string(),
                endpoint: db.describe(endpoint.object),
            });
        }
    }

    let mut chains = Vec::with_capacity(endpoints.len());
    for (endpoint, dir) in endpoints {
        let mut chain = walker::walk(db, endpoint, *dir)?;
        chain.reverse();
        chains.push(chain);
    }
    debug!(chains = chains.len(), "hierarchy walked");

    let merged = merge::merge(db, &chains, db.intern(name)).map_err(|e| {
        ResolveError::NoCommonStart {
            request: request.to_string(),
            first: db.describe(e.first),
            other: db.describe(e.other),
        }
    })?;
    let Some(merged) = merged else {
        return Err(ResolveError::EmptyRequest(request.to_string()));
    };
    debug!(nodes = merged.size(), "chains merged");

    match reduce::reduce(merged) {
        Some(tree) => {
            debug!(root = %db.describe(tree.node.object), nodes = tree.size(), "tree reduced");
            Ok(Some(tree))
        }
        None => {
            sink.emit(errors::warn_insufficient_hierarchy(request));
            Ok(None)
        }
    }
}
