//! Table-driven option legality.
//!
//! Which option keys a directive may carry, what literal shape each value
//! must have, and which pairs are mutually exclusive, are all data in the
//! tables below. The validator's control flow never names an individual
//! option, so extending the vocabulary is a table edit.

use crate::directive::Literal;

bitflags::bitflags! {
    /// A set of directive kinds, used to key the option tables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct KindSet: u16 {
        const FLOAT   = 1 << 0;
        const INT     = 1 << 1;
        const UINT    = 1 << 2;
        const BOOL    = 1 << 3;
        const VEC2    = 1 << 4;
        const VEC3    = 1 << 5;
        const VEC4    = 1 << 6;
        const COLOR   = 1 << 7;
        const SAMPLER = 1 << 8;
        const TEXTURE = 1 << 9;
        const UNIFORM = 1 << 10;

        /// All value kinds.
        const VALUE = Self::FLOAT.bits()
            | Self::INT.bits()
            | Self::UINT.bits()
            | Self::BOOL.bits()
            | Self::VEC2.bits()
            | Self::VEC3.bits()
            | Self::VEC4.bits()
            | Self::COLOR.bits();
    }
}

/// Literal shape an option value must have.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OptionShape {
    /// `true` | `false`.
    Bool,
    /// One bare word out of a fixed set.
    Token(&'static [&'static str]),
}

impl OptionShape {
    /// True if `value` has this shape.
    pub(crate) fn matches(self, value: &Literal) -> bool {
        match (self, value) {
            (OptionShape::Bool, Literal::Bool(_)) => true,
            (OptionShape::Token(words), Literal::Token(t)) => words.contains(&t.as_str()),
            _ => false,
        }
    }

    /// Human-readable description of the accepted values.
    pub(crate) fn describe(self) -> String {
        match self {
            OptionShape::Bool => "a boolean".to_string(),
            OptionShape::Token(words) => format!("one of {}", words.join("|")),
        }
    }
}

/// One entry of the option vocabulary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OptionDef {
    /// Option key as written in source.
    pub name: &'static str,
    /// Required value shape.
    pub shape: OptionShape,
    /// Kinds this key is legal on.
    pub kinds: KindSet,
}

/// The complete option vocabulary.
pub(crate) const OPTIONS: &[OptionDef] = &[
    OptionDef {
        name: "calculate_size",
        shape: OptionShape::Bool,
        kinds: KindSet::UNIFORM,
    },
    OptionDef {
        name: "comparison",
        shape: OptionShape::Token(&[
            "Never",
            "Less",
            "Equal",
            "LessEqual",
            "Greater",
            "NotEqual",
            "GreaterEqual",
            "Always",
        ]),
        kinds: KindSet::SAMPLER,
    },
    OptionDef {
        name: "dynamic_offset",
        shape: OptionShape::Bool,
        kinds: KindSet::UNIFORM,
    },
    OptionDef {
        name: "filter",
        shape: OptionShape::Token(&["Nearest", "Linear"]),
        kinds: KindSet::SAMPLER,
    },
    OptionDef {
        name: "wrap",
        shape: OptionShape::Token(&["Clamp", "Repeat", "Mirror"]),
        kinds: KindSet::SAMPLER,
    },
];

/// Option pairs that must not be declared together on one directive.
pub(crate) const CONFLICTS: &[(&str, &str, KindSet)] =
    &[("filter", "comparison", KindSet::SAMPLER)];

/// Looks up an option key in the vocabulary.
pub(crate) fn option_def(name: &str) -> Option<&'static OptionDef> {
    OPTIONS.iter().find(|def| def.name == name)
}
