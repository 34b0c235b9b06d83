use crate::coverage::TargetSet;
use crate::model::MethodDescriptor;
use crate::solver::TypeLookup;
use std::collections::HashMap;
use tracing::debug;

/// Decides whether a resolved call site reaches a coverage target.
///
/// Matching is deliberately loose: the method names must agree and the two
/// declaring classes must be related in either direction of the type
/// hierarchy. Parameters are never compared, so calls through overloads and
/// overrides still count as coverage.
#[derive(Debug)]
pub struct CoverageMatcher {
    /// Declaring class of each target, resolved once against the analysis
    /// classpath. `None` marks classes that could not be resolved; every
    /// match against them fails.
    target_classes: HashMap<String, Option<String>>,
}

impl CoverageMatcher {
    pub fn new<S: TypeLookup>(solver: &S, targets: &TargetSet) -> Self {
        let mut target_classes: HashMap<String, Option<String>> = HashMap::new();
        for target in targets.iter() {
            if target_classes.contains_key(&target.declaring_class) {
                continue;
            }
            let resolved = solver
                .resolve_fqcn(&target.declaring_class)
                .map(|hit| hit.fqcn);
            if resolved.is_none() {
                debug!(
                    "Target class not on the resolution classpath: {}",
                    target.declaring_class
                );
            }
            target_classes.insert(target.declaring_class.clone(), resolved);
        }
        Self { target_classes }
    }

    /// True when `call` covers `target`. The solver supplied here drives the
    /// assignability walk and may carry more types than the one the matcher
    /// was built with, such as the classes of the test file under scan.
    pub fn covers<S: TypeLookup>(
        &self,
        solver: &S,
        call: &MethodDescriptor,
        target: &MethodDescriptor,
    ) -> bool {
        if call.name != target.name {
            return false;
        }
        let Some(Some(target_class)) = self.target_classes.get(&target.declaring_class) else {
            return false;
        };
        solver.is_assignable(target_class, &call.declaring_class)
            || solver.is_assignable(&call.declaring_class, target_class)
    }
}
