//! The directive data model: kinds, paths, literals and the parsed forms.

use core::fmt;
use std::collections::BTreeMap;
use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::schema::KindSet;

/// The declared kind of a pragma directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// Scalar `f32` uniform value.
    Float,
    /// Scalar signed integer uniform value.
    Int,
    /// Scalar unsigned integer uniform value.
    Uint,
    /// Boolean uniform value.
    Bool,
    /// Two-component vector value.
    Vec2,
    /// Three-component vector value.
    Vec3,
    /// Four-component vector value.
    Vec4,
    /// Four-component color value (RGBA).
    Color,
    /// Sampler binding configuration.
    Sampler,
    /// Texture binding configuration.
    Texture,
    /// Uniform buffer binding configuration.
    Uniform,
    /// Ambient default options for a category (`default uniform (...)`).
    Default,
    /// Display label attached to the following declaration.
    Label,
}

impl Kind {
    /// Resolves a pragma kind token (`"float"`, `"sampler"`, ...).
    pub fn from_token(word: &str) -> Option<Kind> {
        Some(match word {
            "float" => Kind::Float,
            "int" => Kind::Int,
            "uint" => Kind::Uint,
            "bool" => Kind::Bool,
            "vec2" => Kind::Vec2,
            "vec3" => Kind::Vec3,
            "vec4" => Kind::Vec4,
            "color" => Kind::Color,
            "sampler" => Kind::Sampler,
            "texture" => Kind::Texture,
            "uniform" => Kind::Uniform,
            "default" => Kind::Default,
            "label" => Kind::Label,
            _ => return None,
        })
    }

    /// The source token for this kind.
    pub fn token(self) -> &'static str {
        match self {
            Kind::Float => "float",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Bool => "bool",
            Kind::Vec2 => "vec2",
            Kind::Vec3 => "vec3",
            Kind::Vec4 => "vec4",
            Kind::Color => "color",
            Kind::Sampler => "sampler",
            Kind::Texture => "texture",
            Kind::Uniform => "uniform",
            Kind::Default => "default",
            Kind::Label => "label",
        }
    }

    /// Component arity for value kinds; `None` for binding/meta kinds.
    pub fn arity(self) -> Option<u32> {
        Some(match self {
            Kind::Float | Kind::Int | Kind::Uint | Kind::Bool => 1,
            Kind::Vec2 => 2,
            Kind::Vec3 => 3,
            Kind::Vec4 | Kind::Color => 4,
            Kind::Sampler | Kind::Texture | Kind::Uniform | Kind::Default | Kind::Label => {
                return None
            }
        })
    }

    /// True for kinds that declare a uniform value (and may carry a default).
    pub fn is_value(self) -> bool {
        matches!(
            self,
            Kind::Float
                | Kind::Int
                | Kind::Uint
                | Kind::Bool
                | Kind::Vec2
                | Kind::Vec3
                | Kind::Vec4
                | Kind::Color
        )
    }

    /// True for kinds that may carry a `range(..)` clause.
    ///
    /// Boolean and color values have no meaningful ordering, and binding kinds
    /// carry no value at all.
    pub fn is_ranged(self) -> bool {
        matches!(
            self,
            Kind::Float | Kind::Int | Kind::Uint | Kind::Vec2 | Kind::Vec3 | Kind::Vec4
        )
    }

    /// True for kinds that may declare a binding array count (`name[4]`).
    pub fn allows_array(self) -> bool {
        matches!(self, Kind::Sampler | Kind::Texture | Kind::Uniform)
    }

    /// The ambient default category this kind inherits from, if any.
    ///
    /// Value kinds live inside the uniform block, so they share the `uniform`
    /// category with explicit `uniform` declarations. `texture`, `default`
    /// and `label` inherit nothing.
    pub fn category(self) -> Option<Category> {
        match self {
            Kind::Sampler => Some(Category::Sampler),
            Kind::Uniform => Some(Category::Uniform),
            k if k.is_value() => Some(Category::Uniform),
            _ => None,
        }
    }

    pub(crate) fn bit(self) -> KindSet {
        match self {
            Kind::Float => KindSet::FLOAT,
            Kind::Int => KindSet::INT,
            Kind::Uint => KindSet::UINT,
            Kind::Bool => KindSet::BOOL,
            Kind::Vec2 => KindSet::VEC2,
            Kind::Vec3 => KindSet::VEC3,
            Kind::Vec4 => KindSet::VEC4,
            Kind::Color => KindSet::COLOR,
            Kind::Sampler => KindSet::SAMPLER,
            Kind::Texture => KindSet::TEXTURE,
            Kind::Uniform => KindSet::UNIFORM,
            Kind::Default | Kind::Label => KindSet::empty(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Target category of a `default` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// Uniform buffers and the values declared inside them.
    Uniform,
    /// Samplers.
    Sampler,
}

impl Category {
    /// Resolves a category token (`"uniform"` | `"sampler"`).
    pub fn from_token(word: &str) -> Option<Category> {
        match word {
            "uniform" => Some(Category::Uniform),
            "sampler" => Some(Category::Sampler),
            _ => None,
        }
    }

    /// The source token for this category.
    pub fn token(self) -> &'static str {
        match self {
            Category::Uniform => "uniform",
            Category::Sampler => "sampler",
        }
    }

    /// The kinds that belong to this category.
    pub(crate) fn members(self) -> KindSet {
        match self {
            Category::Uniform => KindSet::UNIFORM.union(KindSet::VALUE),
            Category::Sampler => KindSet::SAMPLER,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A dotted identifier path (`grand_parent.parent.name`).
///
/// Stored as segments rather than one string so structural queries (prefix
/// matching, grouping by root) never re-parse at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Builds a path from pre-validated segments.
    pub fn new(segments: Vec<String>) -> Path {
        Path { segments }
    }

    /// Splits a dotted string into a path, rejecting empty or non-identifier
    /// segments (`a..b`, `.a`, `a.`, `3d`).
    pub fn from_dotted(s: &str) -> Option<Path> {
        if s.is_empty() {
            return None;
        }
        let mut segments = Vec::new();
        for seg in s.split('.') {
            if !is_identifier(seg) {
                return None;
            }
            segments.push(seg.to_string());
        }
        Some(Path { segments })
    }

    /// The path's identifier segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The first segment, if the path is non-empty.
    pub fn root(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// True if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if `prefix`'s segments are a leading subsequence of this path's.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(seg)?;
            first = false;
        }
        Ok(())
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A literal value appearing in a pragma: a default, a range bound, or an
/// option value.
///
/// The set is closed. Option values are checked against a per-kind schema by
/// the validator, so an open-ended "anything goes" bag never reaches the
/// registry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// Floating-point scalar.
    Float(f32),
    /// Signed integer scalar.
    Int(i64),
    /// Boolean (`true` | `false`).
    Bool(bool),
    /// Quoted string.
    Str(String),
    /// Bare enumeration word (`Linear`, `Clamp`, ...).
    Token(String),
    /// Bracketed component list (`[0.0, 1.0]`).
    Vector(Vec<f32>),
}

impl Literal {
    /// Number of components: vector length, or 1 for scalars.
    pub fn arity(&self) -> u32 {
        match self {
            Literal::Vector(v) => v.len() as u32,
            _ => 1,
        }
    }

    /// Numeric view of the literal, if it has one.
    pub fn components(&self) -> Option<Vec<f32>> {
        match self {
            Literal::Float(v) => Some(vec![*v]),
            Literal::Int(v) => Some(vec![*v as f32]),
            Literal::Vector(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Float(_) => "float",
            Literal::Int(_) => "integer",
            Literal::Bool(_) => "bool",
            Literal::Str(_) => "string",
            Literal::Token(_) => "token",
            Literal::Vector(_) => "vector",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `{:?}` keeps the decimal point on whole floats, so the canonical
            // form re-lexes as a float rather than an integer.
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
            Literal::Token(t) => f.write_str(t),
            Literal::Vector(v) => {
                f.write_str("[")?;
                for (i, c) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Inclusive lower and upper bounds of a `range(lo..hi)` clause.
///
/// Both bounds have the owning kind's arity; the validator checks
/// `lo <= hi` component-wise.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Lower bound.
    pub lo: Literal,
    /// Upper bound.
    pub hi: Literal,
}

/// Ordered option map of one directive.
pub type OptionMap = BTreeMap<String, Literal>;

/// A pragma that declares metadata for a named shader object: a uniform
/// value, a uniform buffer, a sampler or a texture.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    /// Directive kind. Never [`Kind::Default`] or [`Kind::Label`].
    pub kind: Kind,
    /// Dotted path of the declared object.
    pub path: Path,
    /// Binding array count (`name[4]`), explicit or inherited.
    pub array_count: Option<NonZeroU32>,
    /// Declared value range.
    pub range: Option<Bounds>,
    /// Declared default value.
    pub default: Option<Literal>,
    /// Option map. After validation this holds the *effective* set: ambient
    /// category defaults overlaid with the explicitly written options.
    pub options: OptionMap,
    /// Display label attached by a preceding `label` directive.
    pub label: Option<String>,
    /// 1-based source line of the pragma.
    pub line: u32,
    /// Original annotation text, retained for diagnostics.
    pub raw_text: String,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path)?;
        if let Some(count) = self.array_count {
            write!(f, "[{count}]")?;
        }
        if let Some(bounds) = &self.range {
            write!(f, " : range({}..{})", bounds.lo, bounds.hi)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        write_options(f, &self.options)
    }
}

/// A `default <category> (...)` directive: mutates the ambient options every
/// later directive of that category starts from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefaultScope {
    /// Category the options apply to.
    pub category: Category,
    /// Option overrides, merged key-by-key into the ambient state.
    pub options: OptionMap,
    /// 1-based source line of the pragma.
    pub line: u32,
    /// Original annotation text, retained for diagnostics.
    pub raw_text: String,
}

impl fmt::Display for DefaultScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "default {}", self.category)?;
        write_options(f, &self.options)
    }
}

/// A `label "..."` directive. Carries no path; the validator attaches the
/// string to the immediately following declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Label {
    /// The display string.
    pub text: String,
    /// 1-based source line of the pragma.
    pub line: u32,
    /// Original annotation text, retained for diagnostics.
    pub raw_text: String,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label {}", Literal::Str(self.text.clone()))
    }
}

/// One parsed pragma line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Directive {
    /// A declaration binding metadata to a path.
    Declaration(Declaration),
    /// An ambient default-option update.
    DefaultScope(DefaultScope),
    /// A display label for the following declaration.
    Label(Label),
}

impl Directive {
    /// 1-based source line of the pragma.
    pub fn line(&self) -> u32 {
        match self {
            Directive::Declaration(d) => d.line,
            Directive::DefaultScope(d) => d.line,
            Directive::Label(l) => l.line,
        }
    }

    /// Original annotation text.
    pub fn raw_text(&self) -> &str {
        match self {
            Directive::Declaration(d) => &d.raw_text,
            Directive::DefaultScope(d) => &d.raw_text,
            Directive::Label(l) => &l.raw_text,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Declaration(d) => d.fmt(f),
            Directive::DefaultScope(d) => d.fmt(f),
            Directive::Label(l) => l.fmt(f),
        }
    }
}

fn write_options(f: &mut fmt::Formatter<'_>, options: &OptionMap) -> fmt::Result {
    if options.is_empty() {
        return Ok(());
    }
    f.write_str(" (")?;
    for (i, (name, value)) in options.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}={value}")?;
    }
    f.write_str(")")
}
