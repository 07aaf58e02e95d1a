//! Diagnostic codes and helper functions for hierarchy resolution.
//!
//! Error codes `E300`--`E303` cover hops that could not be realized; the
//! rest of the request still goes through. Warning codes `W300`--`W302`
//! cover requests that were resolved differently than asked, or not at all.

use weave_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Generated object id already exists.
pub const E300: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 300,
};

/// Instance hop without a name assigned by its parent.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// Content requested inside a resource module.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// Local parameter requested where the resolved root is not a module.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// Conflicting directions escalated to bidirectional.
pub const W300: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 300,
};

/// Not enough hierarchy information to realize anything.
pub const W301: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 301,
};

/// Realization produced no objects.
pub const W302: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 302,
};

/// Creates a diagnostic for a generated object whose id is taken.
pub fn error_id_collision(request: &str, id: &str) -> Diagnostic {
    Diagnostic::error(E300, format!("cannot create `{id}`: id already exists"))
        .with_subject(id)
        .with_note(format!("while resolving {request}"))
        .with_help("this hop is skipped; choose a different local name for the endpoint")
}

/// Creates a diagnostic for an instance hop with no connection name.
pub fn error_missing_parent_name(request: &str, instance: &str) -> Diagnostic {
    Diagnostic::error(
        E301,
        format!("no name assigned to instance `{instance}` by its parent"),
    )
    .with_subject(instance)
    .with_note(format!("while resolving {request}"))
}

/// Creates a diagnostic for content requested inside a resource module.
pub fn error_resource_content(request: &str, what: &str, module: &str) -> Diagnostic {
    Diagnostic::error(
        E302,
        format!("cannot create {what} in resource module `{module}`"),
    )
    .with_subject(module)
    .with_note(format!("while resolving {request}"))
}

/// Creates a diagnostic for a local parameter at a non-module root.
pub fn error_local_param_root(request: &str, root: &str) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("local parameter requested but resolved root `{root}` is not a module"),
    )
    .with_subject(root)
    .with_note(format!("while resolving {request}"))
}

/// Creates a warning for a direction conflict.
pub fn warn_direction_conflict(request: &str, id: &str) -> Diagnostic {
    Diagnostic::warning(
        W300,
        format!("conflicting directions at `{id}`, using bidirectional"),
    )
    .with_subject(id)
    .with_note(format!("while resolving {request}"))
}

/// Creates a warning for a request that collapsed to nothing.
pub fn warn_insufficient_hierarchy(request: &str) -> Diagnostic {
    Diagnostic::warning(W301, "insufficient hierarchy information, nothing to realize")
        .with_subject(request)
        .with_help("name the hops explicitly or add endpoints in other branches")
}

/// Creates a warning for a request that produced no objects.
pub fn warn_nothing_realized(request: &str) -> Diagnostic {
    Diagnostic::warning(W302, "no objects were generated").with_subject(request)
}
