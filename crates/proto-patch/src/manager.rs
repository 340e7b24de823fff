//! The patch manager: directive index plus the construction-stack controller
//! the construction walker drives through [`ConstructionHooks`].

use std::collections::HashMap;

use proto_data::{ConstructionHooks, GameDatabase, ObjectHandle, PropertyCollection, PrototypeId};
use proto_patch_path::child_path;
use tracing::{debug, info, trace, warn};

use crate::directive::Directive;
use crate::error::PatchError;
use crate::index::DirectiveIndex;
use crate::loader;
use crate::mutate::apply_directive;
use crate::options::PatchOptions;
use crate::report::PatchReport;
use crate::resolve::resolve_container;

/// Owns the loaded directives and applies them while prototypes are built.
///
/// Construction is single-threaded and depth-first; every hook takes
/// `&mut self` and none of them block.
#[derive(Debug, Default)]
pub struct PatchManager {
    initialized: bool,
    index: DirectiveIndex,
    /// Roots currently open for patching, innermost last.
    stack: Vec<PrototypeId>,
    /// Structural path of each tracked child, relative to its enclosing root.
    paths: HashMap<ObjectHandle, String>,
    report: PatchReport,
}

impl PatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every directive file named by `options`.
    ///
    /// Returns whether the manager is initialized afterwards. A second call
    /// once initialized does nothing.
    pub fn initialize(&mut self, options: &PatchOptions, db: &mut GameDatabase) -> bool {
        if self.initialized {
            return true;
        }
        if !options.enabled {
            info!("prototype patching is disabled");
            return false;
        }
        if !options.directory.is_dir() {
            warn!(directory = %options.directory.display(), "patch directory not found");
            return false;
        }

        if let Err(err) = loader::load_directory(options, db, &mut self.index, &mut self.report) {
            warn!(%err, "failed to list patch directory");
            return false;
        }
        info!(
            loaded = self.report.loaded,
            disabled = self.report.disabled,
            invalid = self.report.invalid_targets + self.report.invalid_records,
            "prototype patch directives loaded"
        );
        self.initialized = true;
        true
    }

    /// Load directives from in-memory text and mark the manager initialized.
    pub fn load_source(&mut self, source: &str, text: &str, db: &mut GameDatabase) {
        loader::load_source(source, text, db, &mut self.index, &mut self.report);
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True when no root is open for patching.
    pub fn is_quiescent(&self) -> bool {
        self.stack.is_empty()
    }

    /// Directives not applied so far, including those that failed.
    pub fn outstanding(&self) -> impl Iterator<Item = &Directive> {
        self.index.unapplied()
    }

    pub fn report(&self) -> &PatchReport {
        &self.report
    }

    pub fn index(&self) -> &DirectiveIndex {
        &self.index
    }

    // ── Exit handling ─────────────────────────────────────────────────────

    /// The root `id` finished: pop it and attempt all its pending directives.
    ///
    /// A directive that fails here is reported once and never attempted again.
    fn exit_root(&mut self, db: &mut GameDatabase, id: PrototypeId, root: ObjectHandle) {
        self.stack.pop();
        debug!(prototype = %db.prototypes.display_name(id), depth = self.stack.len(), "closed prototype for patching");

        if let Some(directives) = self.index.get_mut(id) {
            for directive in directives.iter_mut().filter(|directive| directive.is_pending()) {
                match attempt(db, root, directive) {
                    Ok(()) => {
                        directive.mark_consumed();
                        self.report.applied += 1;
                        info!(prototype = %directive.target_name(), path = %directive.path(), value = %directive.value(), "applied patch");
                    }
                    Err(err) => {
                        warn!(prototype = %directive.target_name(), path = %directive.path(), %err, "failed to apply patch");
                        directive.mark_failed();
                        self.report.failed += 1;
                        self.report
                            .record_failure(directive.target_name(), directive.path().raw.clone(), err);
                    }
                }
            }
        }

        if self.stack.is_empty() {
            trace!(entries = self.paths.len(), "clearing path table");
            self.paths.clear();
            debug!(summary = %self.report.summary(), "patch pass finished");
        }
    }

    /// A tracked child at `path` finished: apply the directives aimed exactly at it.
    fn exit_child(&mut self, db: &mut GameDatabase, object: ObjectHandle, path: &str) {
        let Some(&root) = self.stack.last() else {
            return;
        };
        let Some(directives) = self.index.get_mut(root) else {
            return;
        };

        for directive in directives
            .iter_mut()
            .filter(|directive| directive.is_pending() && directive.clear_path() == path)
        {
            match apply_directive(db, object, directive) {
                Ok(()) => {
                    directive.mark_consumed();
                    self.report.applied += 1;
                    info!(prototype = %directive.target_name(), path = %directive.path(), value = %directive.value(), "applied patch");
                }
                Err(err) => {
                    debug!(prototype = %directive.target_name(), path = %directive.path(), %err, "patch not applicable at child exit, retrying at root");
                }
            }
        }
    }
}

fn attempt(db: &mut GameDatabase, root: ObjectHandle, directive: &Directive) -> Result<(), PatchError> {
    let container = resolve_container(db, root, directive.container())?;
    apply_directive(db, container, directive)
}

impl ConstructionHooks for PatchManager {
    fn properties_override(&mut self, id: PrototypeId) -> Option<PropertyCollection> {
        if !self.initialized {
            return None;
        }
        self.index.properties_for(id).cloned()
    }

    fn enter(&mut self, id: PrototypeId) -> bool {
        if !self.initialized || !self.index.has_pending(id) {
            return false;
        }
        self.stack.push(id);
        debug!(
            prototype = %self.index.get(id).first().map_or("", Directive::target_name),
            depth = self.stack.len(),
            "opened prototype for patching"
        );
        true
    }

    fn register_path(
        &mut self,
        db: &GameDatabase,
        parent: ObjectHandle,
        child: Option<ObjectHandle>,
        field: &str,
        index: Option<usize>,
    ) {
        let Some(child) = child else {
            return;
        };
        let Some(&root) = self.stack.last() else {
            return;
        };

        let parent_path = if db.object(parent).data_ref == root {
            String::new()
        } else {
            match self.paths.get(&parent) {
                Some(path) => path.clone(),
                None => {
                    trace!(%parent, field, "parent is not part of an open root, ignoring child");
                    return;
                }
            }
        };

        let path = child_path(&parent_path, field, index);
        trace!(%child, path = %path, "registered child path");
        self.paths.insert(child, path);
    }

    fn exit(&mut self, db: &mut GameDatabase, object: ObjectHandle) {
        let Some(&top) = self.stack.last() else {
            return;
        };

        let data_ref = db.object(object).data_ref;
        if data_ref.is_valid() {
            if data_ref == top {
                self.exit_root(db, top, object);
            } else {
                trace!(%object, prototype = %db.prototypes.display_name(data_ref), "nested prototype exit, not the open root");
            }
            return;
        }

        match self.paths.get(&object).cloned() {
            Some(path) => self.exit_child(db, object, &path),
            None => trace!(%object, "exit for an untracked object"),
        }
    }
}
