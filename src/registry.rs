//! The validated directive set for one source unit.

use hashbrown::HashMap;

use crate::directive::{Category, Declaration, Kind, OptionMap, Path};

/// Read-only view over the validated declarations of one source unit.
///
/// Built by validation and immutable afterwards; a re-parse of the unit
/// produces a fresh registry rather than mutating this one.
#[derive(Debug, Clone)]
pub struct Registry {
    decls: Vec<Declaration>,
    by_path: HashMap<Path, usize>,
    uniform_defaults: OptionMap,
    sampler_defaults: OptionMap,
}

impl Registry {
    pub(crate) fn new(
        decls: Vec<Declaration>,
        uniform_defaults: OptionMap,
        sampler_defaults: OptionMap,
    ) -> Registry {
        let by_path = decls
            .iter()
            .enumerate()
            .map(|(idx, decl)| (decl.path.clone(), idx))
            .collect();
        Registry {
            decls,
            by_path,
            uniform_defaults,
            sampler_defaults,
        }
    }

    /// Looks up the declaration at `path`.
    pub fn lookup(&self, path: &Path) -> Option<&Declaration> {
        self.by_path.get(path).map(|&idx| &self.decls[idx])
    }

    /// Looks up the declaration at a dotted path string (`"super.name"`).
    pub fn lookup_dotted(&self, path: &str) -> Option<&Declaration> {
        self.lookup(&Path::from_dotted(path)?)
    }

    /// All declarations of `kind`, in source order.
    pub fn all_of_kind(&self, kind: Kind) -> impl Iterator<Item = &Declaration> {
        self.decls.iter().filter(move |decl| decl.kind == kind)
    }

    /// All declarations whose path starts with `prefix`, in source order.
    pub fn under<'a>(&'a self, prefix: &'a Path) -> impl Iterator<Item = &'a Declaration> + 'a {
        self.decls
            .iter()
            .filter(move |decl| decl.path.starts_with(prefix))
    }

    /// The fully resolved ambient option map for `category` at the end of the
    /// unit.
    pub fn defaults_for(&self, category: Category) -> &OptionMap {
        match category {
            Category::Uniform => &self.uniform_defaults,
            Category::Sampler => &self.sampler_defaults,
        }
    }

    /// All declarations, in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.decls.iter()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// True if the unit declared nothing.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
