//! Second builder pass: bodies and reference resolution

use crate::builder::arena::ClassifierRef;
use crate::builder::components::TargetBuilderComponents;
use crate::classifiers::ClassifierIndex;
use crate::error::CommonizerError;
use crate::mergedtree::MergedTree;
use commonizer_metadata::ClassifierId;
use indexmap::IndexMap;

pub struct DeclarationsBuilderPass2<'a> {
    tree: &'a MergedTree,
    classifiers: &'a ClassifierIndex,
}

impl<'a> DeclarationsBuilderPass2<'a> {
    pub fn new(tree: &'a MergedTree, classifiers: &'a ClassifierIndex) -> Self {
        Self { tree, classifiers }
    }

    /// Fill every skeleton built by pass 1 for `components`. Every classifier
    /// a body refers to must resolve: to a declaration built for the target,
    /// to one of its dependee declarations, or to an external classifier.
    pub fn run(&self, components: &mut TargetBuilderComponents) -> Result<(), CommonizerError> {
        let mut filled = 0usize;
        for id in self.tree.depth_first() {
            let Some(&decl_id) = components.built.get(&id) else {
                continue;
            };
            let node = self.tree.node(id);
            let Some(declaration) = components.source(node) else {
                continue;
            };

            let mut referenced: Vec<&ClassifierId> = Vec::new();
            declaration.for_each_classifier(&mut |classifier| referenced.push(classifier));

            let mut references = IndexMap::new();
            for classifier in referenced {
                if references.contains_key(classifier) {
                    continue;
                }
                let resolved = self.resolve(components, classifier).ok_or_else(|| {
                    CommonizerError::UnresolvedClassifier {
                        target: components.target().to_string(),
                        classifier: classifier.clone(),
                        referenced_from: self.tree.path(id),
                    }
                })?;
                references.insert(classifier.clone(), resolved);
            }

            components
                .declarations
                .fill(decl_id, declaration.clone(), references);
            filled += 1;
        }

        tracing::trace!(
            target_name = %components.target(),
            declarations = filled,
            "builder pass 2 finished"
        );
        Ok(())
    }

    fn resolve(
        &self,
        components: &TargetBuilderComponents,
        classifier: &ClassifierId,
    ) -> Option<ClassifierRef> {
        if let Some(id) = components.declarations.classifier(classifier) {
            return Some(ClassifierRef::Declared(id));
        }
        if let Some(id) = components.dependencies.classifier(classifier) {
            return Some(ClassifierRef::Dependency(id));
        }
        self.classifiers
            .is_externally_resolvable(components.slot(), classifier)
            .then(|| ClassifierRef::External(classifier.clone()))
    }
}
