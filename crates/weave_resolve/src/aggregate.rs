//! Net/Parameter Aggregator: binds the realized objects together.

use tracing::debug;
use weave_db::{Database, ObjectId};
use weave_diagnostics::DiagnosticSink;

use crate::error::ResolveError;
use crate::errors;

/// Joins the realized objects of a connection into the net `signal`.
///
/// Nothing is created when realization produced no objects.
pub fn aggregate_net(
    db: &mut Database,
    sink: &DiagnosticSink,
    request: &str,
    signal: &str,
    objects: Vec<ObjectId>,
) -> Result<Vec<ObjectId>, ResolveError> {
    if objects.is_empty() {
        sink.emit(errors::warn_nothing_realized(request));
        return Ok(objects);
    }
    let net = db.add_net(signal, &objects)?;
    debug!(net = %db.describe(net), members = objects.len(), "net aggregated");
    Ok(objects)
}

/// Stamps the constant `parameter` attribute on every realized object.
pub fn tag_parameter(
    db: &mut Database,
    sink: &DiagnosticSink,
    request: &str,
    name: &str,
    objects: Vec<ObjectId>,
) -> Result<Vec<ObjectId>, ResolveError> {
    if objects.is_empty() {
        sink.emit(errors::warn_nothing_realized(request));
        return Ok(objects);
    }
    for &object in &objects {
        db.attr_set(object, "parameter", name, true)?;
    }
    debug!(parameter = name, objects = objects.len(), "parameter tagged");
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_realization_creates_no_net() {
        let mut db = Database::new();
        let sink = DiagnosticSink::new();
        let out = aggregate_net(&mut db, &sink, "connection a", "a", Vec::new()).unwrap();
        assert!(out.is_empty());
        assert!(db.net_by_name("a").is_none());
        assert_eq!(sink.diagnostics()[0].code, errors::W302);
    }

    #[test]
    fn parameter_attribute_is_constant() {
        let mut db = Database::new();
        let m = db.add_module("M", false, false).unwrap();
        let p = db.add_parameter(m, "W", "1", false).unwrap();
        let sink = DiagnosticSink::new();
        tag_parameter(&mut db, &sink, "parameter W", "W", vec![p]).unwrap();
        assert_eq!(db.attr_get(p, "parameter"), Some("W"));
        assert!(db.attr_set(p, "parameter", "X", false).is_err());
    }
}
