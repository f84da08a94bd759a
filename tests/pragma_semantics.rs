//! End-to-end semantic scenarios: whole units through scan, parse and
//! validation.

use pretty_assertions::assert_eq;

use sigil::{parse_unit, Category, Diagnostics, Kind, Literal, Path, SemanticError};

fn diagnostics(source: &str) -> Diagnostics {
    parse_unit(source).expect_err("unit should fail validation")
}

#[test]
fn two_independent_declarations_land_in_the_registry() {
    let source = "\
#pragma float super.name : range(0..1) = 0.5\n\
#pragma bool bool_2_name = false\n";
    let registry = parse_unit(source).expect("unit should validate");
    assert_eq!(registry.len(), 2);

    let float = registry.lookup_dotted("super.name").expect("super.name");
    assert_eq!(float.kind, Kind::Float);
    assert_eq!(float.default, Some(Literal::Float(0.5)));
    let bounds = float.range.as_ref().expect("range");
    assert_eq!(bounds.lo, Literal::Float(0.0));
    assert_eq!(bounds.hi, Literal::Float(1.0));

    let flag = registry.lookup_dotted("bool_2_name").expect("bool_2_name");
    assert_eq!(flag.kind, Kind::Bool);
    assert_eq!(flag.default, Some(Literal::Bool(false)));
}

#[test]
fn default_inside_range_validates() {
    assert!(parse_unit("#pragma float x : range(0..1) = 0.5\n").is_ok());
}

#[test]
fn default_outside_range_is_rejected() {
    let diag = diagnostics("#pragma float x : range(0..1) = 1.5\n");
    assert_eq!(diag.len(), 1);
    assert!(matches!(
        diag.semantic[0],
        SemanticError::DefaultOutOfRange { line: 1, .. }
    ));
}

#[test]
fn inverted_range_is_rejected() {
    let diag = diagnostics("#pragma float x : range(1..0)\n");
    assert!(matches!(diag.semantic[0], SemanticError::EmptyRange { .. }));
}

#[test]
fn vector_range_is_checked_component_wise() {
    let diag = diagnostics("#pragma vec2 uv : range([0, 0]..[1, 1]) = [0.5, 1.5]\n");
    assert!(matches!(
        diag.semantic[0],
        SemanticError::DefaultOutOfRange { .. }
    ));
}

#[test]
fn duplicate_paths_across_kinds_are_rejected() {
    let diag = diagnostics("#pragma bool x\n#pragma float x\n");
    assert_eq!(
        diag.semantic,
        vec![SemanticError::DuplicatePath {
            line: 2,
            first_line: 1,
            path: Path::from_dotted("x").unwrap(),
        }]
    );
}

#[test]
fn filter_and_comparison_are_mutually_exclusive() {
    let diag = diagnostics("#pragma sampler s (filter=Linear, comparison=NotEqual)\n");
    assert!(matches!(
        diag.semantic[0],
        SemanticError::ConflictingOptions {
            first: "filter",
            second: "comparison",
            ..
        }
    ));
}

#[test]
fn ambient_uniform_defaults_are_inherited() {
    let source = "\
#pragma default uniform (calculate_size=true)\n\
#pragma uniform uni_name (dynamic_offset=true)\n";
    let registry = parse_unit(source).expect("unit should validate");
    let uni = registry.lookup_dotted("uni_name").expect("uni_name");
    assert_eq!(uni.options["calculate_size"], Literal::Bool(true));
    assert_eq!(uni.options["dynamic_offset"], Literal::Bool(true));
}

#[test]
fn explicit_options_override_ambient_defaults() {
    let source = "\
#pragma default sampler (filter=Nearest)\n\
#pragma sampler plain\n\
#pragma sampler sharp (filter=Linear)\n";
    let registry = parse_unit(source).expect("unit should validate");
    assert_eq!(
        registry.lookup_dotted("plain").unwrap().options["filter"],
        Literal::Token("Nearest".into())
    );
    assert_eq!(
        registry.lookup_dotted("sharp").unwrap().options["filter"],
        Literal::Token("Linear".into())
    );
}

#[test]
fn later_default_scopes_override_key_by_key() {
    let source = "\
#pragma default sampler (filter=Nearest, wrap=Clamp)\n\
#pragma default sampler (filter=Linear)\n\
#pragma sampler s\n";
    let registry = parse_unit(source).expect("unit should validate");
    let s = registry.lookup_dotted("s").unwrap();
    assert_eq!(s.options["filter"], Literal::Token("Linear".into()));
    assert_eq!(s.options["wrap"], Literal::Token("Clamp".into()));
    assert_eq!(
        registry.defaults_for(Category::Sampler)["filter"],
        Literal::Token("Linear".into())
    );
}

#[test]
fn explicit_comparison_displaces_inherited_filter() {
    let source = "\
#pragma default sampler (filter=Linear)\n\
#pragma sampler shadow (comparison=LessEqual)\n";
    let registry = parse_unit(source).expect("unit should validate");
    let shadow = registry.lookup_dotted("shadow").unwrap();
    assert_eq!(
        shadow.options["comparison"],
        Literal::Token("LessEqual".into())
    );
    assert!(!shadow.options.contains_key("filter"));
}

#[test]
fn value_kinds_share_the_uniform_category_but_take_no_binding_options() {
    let source = "\
#pragma default uniform (dynamic_offset=true)\n\
#pragma float x = 1.0\n";
    let registry = parse_unit(source).expect("unit should validate");
    assert!(registry.lookup_dotted("x").unwrap().options.is_empty());
}

#[test]
fn unknown_and_mistyped_options_are_rejected() {
    let diag = diagnostics("#pragma sampler s (frobnicate=true)\n");
    assert!(matches!(
        diag.semantic[0],
        SemanticError::UnknownOption { ref name, .. } if name == "frobnicate"
    ));

    let diag = diagnostics("#pragma sampler s (filter=Cubic)\n");
    assert!(matches!(
        diag.semantic[0],
        SemanticError::OptionTypeMismatch { ref name, .. } if name == "filter"
    ));

    let diag = diagnostics("#pragma default uniform (filter=Linear)\n");
    assert!(matches!(
        diag.semantic[0],
        SemanticError::UnknownOption { ref target, .. } if target == "default uniform"
    ));
}

#[test]
fn array_counts_inherit_within_a_binding_group() {
    let source = "\
#pragma texture atlas.base[4]\n\
#pragma texture atlas.normal\n\
#pragma texture lone\n";
    let registry = parse_unit(source).expect("unit should validate");
    let count = |path: &str| {
        registry
            .lookup_dotted(path)
            .unwrap()
            .array_count
            .map(|c| c.get())
    };
    assert_eq!(count("atlas.base"), Some(4));
    assert_eq!(count("atlas.normal"), Some(4));
    assert_eq!(count("lone"), None);
}

#[test]
fn array_counts_are_rejected_on_value_kinds() {
    let diag = diagnostics("#pragma float weights[4]\n");
    assert!(matches!(
        diag.semantic[0],
        SemanticError::ArrayNotAllowed {
            kind: Kind::Float,
            ..
        }
    ));
}

#[test]
fn labels_attach_to_the_next_declaration() {
    let source = "\
#pragma label \"Sun Intensity\"\n\
#pragma float sun.intensity : range(0..10) = 1.0\n\
#pragma float sun.azimuth\n";
    let registry = parse_unit(source).expect("unit should validate");
    assert_eq!(
        registry.lookup_dotted("sun.intensity").unwrap().label.as_deref(),
        Some("Sun Intensity")
    );
    assert_eq!(registry.lookup_dotted("sun.azimuth").unwrap().label, None);
}

#[test]
fn unconsumed_labels_are_rejected() {
    let diag = diagnostics("#pragma float x\n#pragma label \"Trailing\"\n");
    assert_eq!(
        diag.semantic,
        vec![SemanticError::DanglingLabel { line: 2 }]
    );

    let diag = diagnostics("#pragma label \"One\"\n#pragma label \"Two\"\n#pragma float x\n");
    assert_eq!(
        diag.semantic,
        vec![SemanticError::DanglingLabel { line: 1 }]
    );
}

#[test]
fn all_problems_are_reported_in_one_pass() {
    let source = "\
#pragma floot x\n\
#pragma float y : range(0..1) = 2.0\n\
#pragma bool z\n\
#pragma float z\n";
    let diag = diagnostics(source);
    assert_eq!(diag.parse.len(), 1);
    assert_eq!(diag.semantic.len(), 2);
    let report = diag.to_string();
    assert!(report.contains("unknown pragma kind"), "{report}");
    assert!(report.contains("outside its declared range"), "{report}");
    assert!(report.contains("already declared"), "{report}");
}

#[test]
fn registry_queries_cover_kind_prefix_and_order() {
    let source = "\
#pragma float sun.intensity = 1.0\n\
#pragma color sun.tint = [1, 1, 1, 1]\n\
#pragma float moon.intensity = 0.2\n\
#pragma sampler moon.samp\n";
    let registry = parse_unit(source).expect("unit should validate");

    let floats: Vec<String> = registry
        .all_of_kind(Kind::Float)
        .map(|d| d.path.to_string())
        .collect();
    assert_eq!(floats, vec!["sun.intensity", "moon.intensity"]);

    let sun = Path::from_dotted("sun").unwrap();
    let under_sun: Vec<String> = registry.under(&sun).map(|d| d.path.to_string()).collect();
    assert_eq!(under_sun, vec!["sun.intensity", "sun.tint"]);

    assert_eq!(registry.iter().count(), 4);
    assert!(registry.lookup_dotted("nonexistent").is_none());
}

#[test]
fn registries_are_rebuilt_per_unit() {
    let first = parse_unit("#pragma float a = 1.0\n").expect("first unit");
    let second = parse_unit("#pragma float b = 2.0\n").expect("second unit");
    assert!(first.lookup_dotted("b").is_none());
    assert!(second.lookup_dotted("a").is_none());
}

#[test]
fn pragma_free_source_validates_to_an_empty_registry() {
    let registry = parse_unit("fn main() {}\n").expect("empty unit");
    assert!(registry.is_empty());
    assert_eq!(registry.defaults_for(Category::Uniform).len(), 0);
}
