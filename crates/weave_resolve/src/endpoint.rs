//! Connection endpoints and requested directions.

use weave_db::{ObjectId, PortDirection};

/// The direction requested for one side of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionDir {
    /// The value travels up the hierarchy (output ports).
    Up,
    /// The value travels down the hierarchy (input ports).
    Down,
    /// Both ways.
    Bidir,
    /// No preference; yields to any concrete direction.
    #[default]
    Default,
}

impl ConnectionDir {
    /// Unifies two directions.
    ///
    /// `Default` yields to the other side. Two different concrete directions
    /// become `Bidir`; the returned flag reports that conflict.
    pub fn merge(self, other: ConnectionDir) -> (ConnectionDir, bool) {
        match (self, other) {
            (a, b) if a == b => (a, false),
            (ConnectionDir::Default, b) => (b, false),
            (a, ConnectionDir::Default) => (a, false),
            _ => (ConnectionDir::Bidir, true),
        }
    }

    /// The port direction realized for a hop with this direction.
    pub fn port_direction(self) -> PortDirection {
        match self {
            ConnectionDir::Up => PortDirection::Output,
            ConnectionDir::Bidir => PortDirection::Bidirectional,
            ConnectionDir::Down | ConnectionDir::Default => PortDirection::Input,
        }
    }
}

/// One side of a requested connection or parameter.
///
/// ```ignore
/// let src = Endpoint::new(leaf).dir(ConnectionDir::Up);
/// let dst = Endpoint::new(top).named("foo").forced();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// The module or instance.
    pub object: ObjectId,
    /// The name to use at this endpoint instead of the signal name.
    pub local_name: Option<String>,
    /// The requested direction (only used for targets of a source-less connection).
    pub dir: ConnectionDir,
    /// Use the local name verbatim, without a generated suffix.
    pub force_name: bool,
    /// Connect the inverted signal.
    pub invert: bool,
}

impl Endpoint {
    /// Creates an endpoint with no local name and default direction.
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            local_name: None,
            dir: ConnectionDir::Default,
            force_name: false,
            invert: false,
        }
    }

    /// Sets the local name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    /// Uses the local name verbatim.
    pub fn forced(mut self) -> Self {
        self.force_name = true;
        self
    }

    /// Marks the connection as inverted.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Sets the requested direction.
    pub fn dir(mut self, dir: ConnectionDir) -> Self {
        self.dir = dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionDir::*;

    #[test]
    fn merge_same_direction() {
        assert_eq!(Up.merge(Up), (Up, false));
        assert_eq!(Default.merge(Default), (Default, false));
    }

    #[test]
    fn default_yields() {
        assert_eq!(Default.merge(Down), (Down, false));
        assert_eq!(Bidir.merge(Default), (Bidir, false));
    }

    #[test]
    fn conflict_is_commutative() {
        assert_eq!(Up.merge(Down), (Bidir, true));
        assert_eq!(Down.merge(Up), (Bidir, true));
        assert_eq!(Bidir.merge(Up), (Bidir, true));
    }

    #[test]
    fn port_directions() {
        assert_eq!(Up.port_direction(), PortDirection::Output);
        assert_eq!(Down.port_direction(), PortDirection::Input);
        assert_eq!(Default.port_direction(), PortDirection::Input);
        assert_eq!(Bidir.port_direction(), PortDirection::Bidirectional);
    }

    #[test]
    fn builder() {
        let ep = Endpoint::new(ObjectId::from_raw(2))
            .named("foo")
            .forced()
            .inverted()
            .dir(Up);
        assert_eq!(ep.local_name.as_deref(), Some("foo"));
        assert!(ep.force_name && ep.invert);
        assert_eq!(ep.dir, Up);
    }
}
