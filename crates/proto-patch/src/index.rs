//! Directives bucketed by target prototype.

use indexmap::IndexMap;
use proto_data::{PropertyCollection, PrototypeId};

use crate::directive::Directive;
use crate::value::ValueKind;

/// Target id → directives in load order. Built once; afterwards only
/// consumed and failed flags change.
#[derive(Debug, Default)]
pub struct DirectiveIndex {
    by_target: IndexMap<PrototypeId, Vec<Directive>>,
}

impl DirectiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, directive: Directive) {
        self.by_target.entry(directive.target()).or_default().push(directive);
    }

    pub fn get(&self, target: PrototypeId) -> &[Directive] {
        self.by_target.get(&target).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn get_mut(&mut self, target: PrototypeId) -> Option<&mut Vec<Directive>> {
        self.by_target.get_mut(&target)
    }

    /// True if any directive for `target` is still awaiting an attempt.
    pub fn has_pending(&self, target: PrototypeId) -> bool {
        self.get(target).iter().any(Directive::is_pending)
    }

    /// Payload of the first `Properties` directive for `target`.
    pub fn properties_for(&self, target: PrototypeId) -> Option<&PropertyCollection> {
        self.get(target)
            .iter()
            .filter(|directive| directive.kind() == ValueKind::Properties)
            .find_map(|directive| directive.value().as_properties())
    }

    /// Every directive not applied, failed ones included, in load order.
    pub fn unapplied(&self) -> impl Iterator<Item = &Directive> {
        self.iter().filter(|directive| !directive.is_consumed())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.by_target.values().flatten()
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.by_target.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}
