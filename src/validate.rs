//! Semantic validation: cross-line rules and ambient default resolution.
//!
//! The walk is a single pass in source order. Scope rules (fixed policy, see
//! DESIGN.md):
//!
//! - `default <category> (...)` applies to the rest of the file,
//!   category-scoped, merged last-wins key-by-key. Keys of a mutually
//!   exclusive pair displace each other in the ambient state.
//! - An explicit `[n]` starts a binding group rooted at the directive's first
//!   path segment; later array-legal directives under the same root inherit
//!   the count (rest of file, last-wins).
//! - A label attaches to the next declaration; an unconsumed label is an
//!   error.
//!
//! Every semantic error across the unit is collected before the unit fails.

use std::num::NonZeroU32;

use hashbrown::HashMap;
use tracing::trace;

use crate::directive::{Category, Declaration, Directive, Literal, OptionMap, Path};
use crate::error::{Diagnostics, ParseError, SemanticError};
use crate::registry::Registry;
use crate::schema::{self, KindSet};

/// Validates one unit's parsed directives, resolving ambient defaults,
/// binding-group array counts and labels. Parse errors from the same unit are
/// folded into the final report.
pub(crate) fn validate_unit(
    directives: Vec<Directive>,
    parse_errors: Vec<ParseError>,
) -> Result<Registry, Diagnostics> {
    let mut errors: Vec<SemanticError> = Vec::new();
    let mut uniform_defaults = OptionMap::new();
    let mut sampler_defaults = OptionMap::new();
    let mut pending_label: Option<(u32, String)> = None;
    let mut group_counts: HashMap<String, NonZeroU32> = HashMap::new();
    let mut seen: HashMap<Path, u32> = HashMap::new();
    let mut resolved: Vec<Declaration> = Vec::new();

    for directive in directives {
        match directive {
            Directive::Label(label) => {
                if let Some((line, _)) = pending_label.replace((label.line, label.text)) {
                    // The earlier label was never attached to anything.
                    errors.push(SemanticError::DanglingLabel { line });
                }
            }
            Directive::DefaultScope(scope) => {
                let ambient = match scope.category {
                    Category::Uniform => &mut uniform_defaults,
                    Category::Sampler => &mut sampler_defaults,
                };
                let members = scope.category.members();
                check_conflicts_declared(
                    &scope.options,
                    members,
                    scope.line,
                    format!("default {}", scope.category),
                    &mut errors,
                );
                for (name, value) in scope.options {
                    match schema::option_def(&name) {
                        Some(def) if def.kinds.intersects(members) => {
                            if def.shape.matches(&value) {
                                merge_ambient(ambient, name, value, members);
                            } else {
                                errors.push(SemanticError::OptionTypeMismatch {
                                    line: scope.line,
                                    name,
                                    expected: def.shape.describe(),
                                    found: found_text(&value),
                                });
                            }
                        }
                        _ => errors.push(SemanticError::UnknownOption {
                            line: scope.line,
                            target: format!("default {}", scope.category),
                            name,
                        }),
                    }
                }
            }
            Directive::Declaration(mut decl) => {
                let kind = decl.kind;

                for (name, value) in &decl.options {
                    match schema::option_def(name) {
                        Some(def) if def.kinds.intersects(kind.bit()) => {
                            if !def.shape.matches(value) {
                                errors.push(SemanticError::OptionTypeMismatch {
                                    line: decl.line,
                                    name: name.clone(),
                                    expected: def.shape.describe(),
                                    found: found_text(value),
                                });
                            }
                        }
                        _ => errors.push(SemanticError::UnknownOption {
                            line: decl.line,
                            target: kind.token().to_string(),
                            name: name.clone(),
                        }),
                    }
                }
                check_conflicts_declared(
                    &decl.options,
                    kind.bit(),
                    decl.line,
                    kind.token().to_string(),
                    &mut errors,
                );

                let ambient = match kind.category() {
                    Some(Category::Uniform) => Some(&uniform_defaults),
                    Some(Category::Sampler) => Some(&sampler_defaults),
                    None => None,
                };
                if let Some(ambient) = ambient {
                    let explicit = decl.options.clone();
                    for (name, value) in ambient {
                        if explicit.contains_key(name) {
                            continue;
                        }
                        let Some(def) = schema::option_def(name) else {
                            continue;
                        };
                        // Keys the receiving kind does not accept are not
                        // inherited; value kinds share the uniform category
                        // but take no binding options.
                        if !def.kinds.intersects(kind.bit()) {
                            continue;
                        }
                        if conflicts_with_explicit(name, &explicit, kind.bit()) {
                            continue;
                        }
                        decl.options.insert(name.clone(), value.clone());
                    }
                }

                match seen.entry(decl.path.clone()) {
                    hashbrown::hash_map::Entry::Occupied(entry) => {
                        errors.push(SemanticError::DuplicatePath {
                            line: decl.line,
                            first_line: *entry.get(),
                            path: decl.path.clone(),
                        });
                        // First declaration wins; drop the duplicate.
                        continue;
                    }
                    hashbrown::hash_map::Entry::Vacant(entry) => {
                        entry.insert(decl.line);
                    }
                }

                let root = decl.path.root().map(str::to_string);
                match decl.array_count {
                    Some(_) if !kind.allows_array() => {
                        errors.push(SemanticError::ArrayNotAllowed {
                            line: decl.line,
                            kind,
                        });
                    }
                    Some(count) => {
                        if let Some(root) = &root {
                            group_counts.insert(root.clone(), count);
                        }
                    }
                    None if kind.allows_array() => {
                        if let Some(count) = root.as_ref().and_then(|r| group_counts.get(r)) {
                            decl.array_count = Some(*count);
                        }
                    }
                    None => {}
                }

                check_range(&decl, &mut errors);

                decl.label = pending_label.take().map(|(_, text)| text);

                trace!(line = decl.line, kind = %kind, path = %decl.path, "resolved directive");
                resolved.push(decl);
            }
        }
    }

    if let Some((line, _)) = pending_label {
        errors.push(SemanticError::DanglingLabel { line });
    }

    if parse_errors.is_empty() && errors.is_empty() {
        Ok(Registry::new(resolved, uniform_defaults, sampler_defaults))
    } else {
        Err(Diagnostics {
            parse: parse_errors,
            semantic: errors,
        })
    }
}

/// Reports mutually exclusive option pairs declared together on one
/// directive.
fn check_conflicts_declared(
    options: &OptionMap,
    applicable: KindSet,
    line: u32,
    target: String,
    errors: &mut Vec<SemanticError>,
) {
    for &(first, second, kinds) in schema::CONFLICTS {
        if kinds.intersects(applicable)
            && options.contains_key(first)
            && options.contains_key(second)
        {
            errors.push(SemanticError::ConflictingOptions {
                line,
                target: target.clone(),
                first,
                second,
            });
        }
    }
}

/// True if inheriting `name` would contradict an explicitly written key of a
/// mutually exclusive pair. The explicit key wins; the inherited one is
/// dropped.
fn conflicts_with_explicit(name: &str, explicit: &OptionMap, applicable: KindSet) -> bool {
    for &(first, second, kinds) in schema::CONFLICTS {
        if !kinds.intersects(applicable) {
            continue;
        }
        if (name == first && explicit.contains_key(second))
            || (name == second && explicit.contains_key(first))
        {
            return true;
        }
    }
    false
}

/// Merges one key into an ambient map, displacing the other half of a
/// mutually exclusive pair if present.
fn merge_ambient(ambient: &mut OptionMap, name: String, value: Literal, members: KindSet) {
    for &(first, second, kinds) in schema::CONFLICTS {
        if !kinds.intersects(members) {
            continue;
        }
        if name == first {
            ambient.remove(second);
        } else if name == second {
            ambient.remove(first);
        }
    }
    ambient.insert(name, value);
}

/// Checks `low <= high` component-wise and, when a default is also declared,
/// that the default lies inside the bounds. Bound and default arity were
/// already enforced by the parser.
fn check_range(decl: &Declaration, errors: &mut Vec<SemanticError>) {
    let Some(bounds) = &decl.range else {
        return;
    };
    let (Some(lo), Some(hi)) = (bounds.lo.components(), bounds.hi.components()) else {
        return;
    };
    if lo.iter().zip(&hi).any(|(l, h)| l > h) {
        errors.push(SemanticError::EmptyRange {
            line: decl.line,
            path: decl.path.clone(),
        });
        return;
    }
    let Some(default) = decl.default.as_ref().and_then(Literal::components) else {
        return;
    };
    let below = default.iter().zip(&lo).any(|(v, l)| v < l);
    let above = default.iter().zip(&hi).any(|(v, h)| v > h);
    if below || above {
        errors.push(SemanticError::DefaultOutOfRange {
            line: decl.line,
            path: decl.path.clone(),
        });
    }
}

fn found_text(value: &Literal) -> String {
    match value {
        Literal::Token(t) => format!("`{t}`"),
        other => other.type_name().to_string(),
    }
}
