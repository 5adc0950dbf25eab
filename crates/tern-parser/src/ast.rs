//! AST - Abstract Syntax Tree for the Tern language
//!
//! Every node is a [`Node`]. Variants are grouped by namespace: [`expr`],
//! [`ty`], [`decl`], [`stmt`] and [`global`], plus the root
//! [`TranslationUnit`] and the two sentinels [`Empty`] (an optional part that
//! is absent) and [`RequiredButMissing`] (a required part the parser had to
//! synthesize after reporting an error).
//!
//! Internal nodes are located at the first token they consumed and own their
//! children outright.

use tern_error::{InternalError, Location};

/// A concrete node type that can be downcast from a [`Node`]
pub trait Variant: Sized {
    /// Qualified name, e.g. `expr::Binary`
    const NAME: &'static str;

    fn from_node(node: &Node) -> Option<&Self>;
}

/// Visibility of a top-level definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Local,
    Exported,
}

/// Any syntax tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Empty(Empty),
    RequiredButMissing(RequiredButMissing),
    TranslationUnit(TranslationUnit),
    Expr(expr::Expr),
    Type(ty::Type),
    Decl(decl::Decl),
    Stmt(stmt::Stmt),
    Global(global::Global),
}

/// An optional part that is not present
#[derive(Debug, Clone, PartialEq)]
pub struct Empty {
    pub location: Location,
}

/// A required part that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredButMissing {
    pub location: Location,
}

/// A complete source file
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub location: Location,
    /// `global::Module`, or `RequiredButMissing`
    pub module: Box<Node>,
    /// `global::ImportGroup`
    pub imports: Box<Node>,
    pub definitions: Vec<Node>,
}

impl TranslationUnit {
    pub fn children(&self) -> Vec<&Node> {
        [self.module.as_ref(), self.imports.as_ref()]
            .into_iter()
            .chain(self.definitions.iter())
            .collect()
    }
}

impl Node {
    pub fn empty(location: Location) -> Node {
        Node::Empty(Empty { location })
    }

    pub fn missing(location: Location) -> Node {
        Node::RequiredButMissing(RequiredButMissing { location })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::RequiredButMissing(_))
    }

    /// Qualified name of the active variant
    pub fn name(&self) -> &'static str {
        match self {
            Node::Empty(_) => Empty::NAME,
            Node::RequiredButMissing(_) => RequiredButMissing::NAME,
            Node::TranslationUnit(_) => TranslationUnit::NAME,
            Node::Expr(e) => e.name(),
            Node::Type(t) => t.name(),
            Node::Decl(d) => d.name(),
            Node::Stmt(s) => s.name(),
            Node::Global(g) => g.name(),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Node::Empty(n) => n.location,
            Node::RequiredButMissing(n) => n.location,
            Node::TranslationUnit(n) => n.location,
            Node::Expr(e) => e.location(),
            Node::Type(t) => t.location(),
            Node::Decl(d) => d.location(),
            Node::Stmt(s) => s.location(),
            Node::Global(g) => g.location(),
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Empty(_) | Node::RequiredButMissing(_) => Vec::new(),
            Node::TranslationUnit(unit) => unit.children(),
            Node::Expr(e) => e.children(),
            Node::Type(t) => t.children(),
            Node::Decl(d) => d.children(),
            Node::Stmt(s) => s.children(),
            Node::Global(g) => g.children(),
        }
    }

    pub fn is<T: Variant>(&self) -> bool {
        T::from_node(self).is_some()
    }

    pub fn try_cast<T: Variant>(&self) -> Result<&T, InternalError> {
        T::from_node(self).ok_or(InternalError::BadCast {
            expected: T::NAME,
            found: self.name(),
        })
    }

    /// Downcasts to a concrete variant.
    ///
    /// # Panics
    ///
    /// Panics if the node holds a different variant. That is a bug in the
    /// caller, never a property of the parsed program.
    pub fn cast<T: Variant>(&self) -> &T {
        match self.try_cast::<T>() {
            Ok(node) => node,
            Err(err) => panic!("{}", err),
        }
    }
}

impl Variant for Empty {
    const NAME: &'static str = "Empty";

    fn from_node(node: &Node) -> Option<&Self> {
        match node {
            Node::Empty(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Variant for RequiredButMissing {
    const NAME: &'static str = "RequiredButMissing";

    fn from_node(node: &Node) -> Option<&Self> {
        match node {
            Node::RequiredButMissing(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Variant for TranslationUnit {
    const NAME: &'static str = "TranslationUnit";

    fn from_node(node: &Node) -> Option<&Self> {
        match node {
            Node::TranslationUnit(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<TranslationUnit> for Node {
    fn from(unit: TranslationUnit) -> Self {
        Node::TranslationUnit(unit)
    }
}

/// Implements naming, location, downcasting and conversion for every
/// variant of a namespace enum.
macro_rules! namespace {
    ($ns:ident, $enum_:ident, [$($variant:ident),* $(,)?]) => {
        impl $enum_ {
            pub fn name(&self) -> &'static str {
                match self {
                    $($enum_::$variant(_) => <$variant as Variant>::NAME,)*
                }
            }

            pub fn location(&self) -> Location {
                match self {
                    $($enum_::$variant(inner) => inner.location,)*
                }
            }
        }

        $(
            impl Variant for $variant {
                const NAME: &'static str = concat!(stringify!($ns), "::", stringify!($variant));

                fn from_node(node: &Node) -> Option<&Self> {
                    match node {
                        Node::$enum_($enum_::$variant(inner)) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for Node {
                fn from(inner: $variant) -> Self {
                    Node::$enum_($enum_::$variant(inner))
                }
            }
        )*
    };
}

#[allow(clippy::borrowed_box)]
fn boxed<'a>(nodes: &[&'a Box<Node>]) -> Vec<&'a Node> {
    nodes.iter().map(|&node| node.as_ref()).collect()
}

/// Expressions
pub mod expr {
    use super::{boxed, Node, Variant};
    use tern_error::Location;
    use tern_lexer::Lexeme;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Expr {
        Integer(Integer),
        Float(Float),
        Boolean(Boolean),
        StringFragment(StringFragment),
        String(String),
        Identifier(Identifier),
        Anonymous(Anonymous),
        Tuple(Tuple),
        Array(Array),
        Record(Record),
        Field(Field),
        Prefix(Prefix),
        Binary(Binary),
        FnApp(FnApp),
        Subscript(Subscript),
        Try(Try),
        Function(Function),
    }

    namespace!(
        expr,
        Expr,
        [
            Integer,
            Float,
            Boolean,
            StringFragment,
            String,
            Identifier,
            Anonymous,
            Tuple,
            Array,
            Record,
            Field,
            Prefix,
            Binary,
            FnApp,
            Subscript,
            Try,
            Function,
        ]
    );

    /// Base an integer literal was written in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Base {
        Binary,
        Octal,
        Decimal,
        Hexadecimal,
    }

    impl Base {
        pub fn from_lexeme(lexeme: Lexeme) -> Option<Base> {
            match lexeme {
                Lexeme::Binary => Some(Base::Binary),
                Lexeme::Octal => Some(Base::Octal),
                Lexeme::Decimal => Some(Base::Decimal),
                Lexeme::Hexadecimal => Some(Base::Hexadecimal),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Integer {
        pub location: Location,
        pub value: u64,
        pub base: Base,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Float {
        pub location: Location,
        pub value: f64,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Boolean {
        pub location: Location,
        pub value: bool,
    }

    /// Literal text of a string, escapes already decoded
    #[derive(Debug, Clone, PartialEq)]
    pub struct StringFragment {
        pub location: Location,
        pub value: std::string::String,
    }

    /// `"text {expr} text"`: fragments alternating with placeholder expressions
    #[derive(Debug, Clone, PartialEq)]
    pub struct String {
        pub location: Location,
        pub parts: Vec<Node>,
    }

    /// `name` or `module.name`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Identifier {
        pub location: Location,
        pub path: Vec<std::string::String>,
    }

    /// `_`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Anonymous {
        pub location: Location,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Tuple {
        pub location: Location,
        pub elements: Vec<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Array {
        pub location: Location,
        pub elements: Vec<Node>,
    }

    /// `{ name: value, ... }`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Record {
        pub location: Location,
        pub fields: Vec<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Field {
        pub location: Location,
        pub name: std::string::String,
        pub value: Box<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Prefix {
        pub location: Location,
        pub op: Lexeme,
        pub operand: Box<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Binary {
        pub location: Location,
        pub op: Lexeme,
        pub lhs: Box<Node>,
        pub rhs: Box<Node>,
    }

    /// `callee(args)`
    #[derive(Debug, Clone, PartialEq)]
    pub struct FnApp {
        pub location: Location,
        pub callee: Box<Node>,
        pub args: Vec<Node>,
    }

    /// `target[indices]`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Subscript {
        pub location: Location,
        pub target: Box<Node>,
        pub indices: Vec<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Try {
        pub location: Location,
        pub operand: Box<Node>,
    }

    /// `fn [T] (params) -> Ret { body }`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Function {
        pub location: Location,
        /// `decl::Generic` or `Empty`
        pub generics: Box<Node>,
        /// `decl::Tuple`
        pub params: Box<Node>,
        /// A type or `Empty`
        pub ret: Box<Node>,
        /// `stmt::Block`
        pub body: Box<Node>,
    }

    impl Expr {
        pub fn children(&self) -> Vec<&Node> {
            match self {
                Expr::Integer(_)
                | Expr::Float(_)
                | Expr::Boolean(_)
                | Expr::StringFragment(_)
                | Expr::Identifier(_)
                | Expr::Anonymous(_) => Vec::new(),
                Expr::String(e) => e.parts.iter().collect(),
                Expr::Tuple(e) => e.elements.iter().collect(),
                Expr::Array(e) => e.elements.iter().collect(),
                Expr::Record(e) => e.fields.iter().collect(),
                Expr::Field(e) => boxed(&[&e.value]),
                Expr::Prefix(e) => boxed(&[&e.operand]),
                Expr::Binary(e) => boxed(&[&e.lhs, &e.rhs]),
                Expr::FnApp(e) => std::iter::once(e.callee.as_ref())
                    .chain(e.args.iter())
                    .collect(),
                Expr::Subscript(e) => std::iter::once(e.target.as_ref())
                    .chain(e.indices.iter())
                    .collect(),
                Expr::Try(e) => boxed(&[&e.operand]),
                Expr::Function(e) => boxed(&[&e.generics, &e.params, &e.ret, &e.body]),
            }
        }
    }
}

/// Type expressions
pub mod ty {
    use super::{boxed, Node, Variant};
    use tern_error::Location;
    use tern_lexer::Lexeme;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Type {
        Identifier(Identifier),
        Tuple(Tuple),
        Array(Array),
        Generic(Generic),
        Binary(Binary),
        Function(Function),
        Inference(Inference),
    }

    namespace!(
        ty,
        Type,
        [Identifier, Tuple, Array, Generic, Binary, Function, Inference]
    );

    /// `Int`, `$Point`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Identifier {
        pub location: Location,
        pub name: String,
        /// Cleared by a leading `$`
        pub constant: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Tuple {
        pub location: Location,
        pub elements: Vec<Node>,
    }

    /// `Int[3, _]`: dimensions are expressions, `_` for a dynamic one
    #[derive(Debug, Clone, PartialEq)]
    pub struct Array {
        pub location: Location,
        pub element: Box<Node>,
        pub dims: Vec<Node>,
    }

    /// `Map[Str, Int]`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Generic {
        pub location: Location,
        pub base: Box<Node>,
        pub args: Vec<Node>,
    }

    /// `A | B`, `A & B`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Binary {
        pub location: Location,
        pub op: Lexeme,
        pub lhs: Box<Node>,
        pub rhs: Box<Node>,
    }

    /// `Param -> Ret`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Function {
        pub location: Location,
        pub param: Box<Node>,
        pub ret: Box<Node>,
    }

    /// `[[expr]]`: the type of an expression
    #[derive(Debug, Clone, PartialEq)]
    pub struct Inference {
        pub location: Location,
        pub expr: Box<Node>,
    }

    impl Type {
        pub fn children(&self) -> Vec<&Node> {
            match self {
                Type::Identifier(_) => Vec::new(),
                Type::Tuple(t) => t.elements.iter().collect(),
                Type::Array(t) => std::iter::once(t.element.as_ref())
                    .chain(t.dims.iter())
                    .collect(),
                Type::Generic(t) => std::iter::once(t.base.as_ref())
                    .chain(t.args.iter())
                    .collect(),
                Type::Binary(t) => boxed(&[&t.lhs, &t.rhs]),
                Type::Function(t) => boxed(&[&t.param, &t.ret]),
                Type::Inference(t) => boxed(&[&t.expr]),
            }
        }
    }
}

/// Declarations: the left-hand side of definitions, parameters and bindings
pub mod decl {
    use super::{Node, Variant};
    use tern_error::Location;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Decl {
        Identifier(Identifier),
        Tuple(Tuple),
        Generic(Generic),
    }

    namespace!(decl, Decl, [Identifier, Tuple, Generic]);

    /// `$name: Type`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Identifier {
        pub location: Location,
        /// `_` for an anonymous binding
        pub name: String,
        /// Cleared by a leading `$`
        pub constant: bool,
        /// A type or `Empty`
        pub ty: Box<Node>,
    }

    /// `$(a, b): Type`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Tuple {
        pub location: Location,
        pub elements: Vec<Node>,
        pub constant: bool,
        pub ty: Box<Node>,
    }

    /// `[T, U]`: type parameters
    #[derive(Debug, Clone, PartialEq)]
    pub struct Generic {
        pub location: Location,
        pub params: Vec<Node>,
    }

    impl Decl {
        pub fn children(&self) -> Vec<&Node> {
            match self {
                Decl::Identifier(d) => vec![d.ty.as_ref()],
                Decl::Tuple(d) => d
                    .elements
                    .iter()
                    .chain(std::iter::once(d.ty.as_ref()))
                    .collect(),
                Decl::Generic(d) => d.params.iter().collect(),
            }
        }

        /// Whether the declaration carries a `$` or a type
        pub fn is_explicit(&self) -> bool {
            match self {
                Decl::Identifier(d) => !d.constant || !d.ty.is_empty(),
                Decl::Tuple(d) => !d.constant || !d.ty.is_empty(),
                Decl::Generic(_) => true,
            }
        }
    }
}

/// Statements
pub mod stmt {
    use super::{boxed, Node, Variant};
    use tern_error::Location;
    use tern_lexer::Lexeme;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Stmt {
        Block(Block),
        Return(Return),
        Yield(Yield),
        Defer(Defer),
        Preface(Preface),
        Loop(Loop),
        Match(Match),
        Assign(Assign),
        Conditional(Conditional),
        Declaration(Declaration),
        Expression(Expression),
    }

    namespace!(
        stmt,
        Stmt,
        [
            Block,
            Return,
            Yield,
            Defer,
            Preface,
            Loop,
            Match,
            Assign,
            Conditional,
            Declaration,
            Expression,
        ]
    );

    #[derive(Debug, Clone, PartialEq)]
    pub struct Block {
        pub location: Location,
        pub statements: Vec<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Return {
        pub location: Location,
        /// An expression or `Empty`
        pub value: Box<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Yield {
        pub location: Location,
        pub value: Box<Node>,
    }

    /// Runs `body` when the enclosing block exits
    #[derive(Debug, Clone, PartialEq)]
    pub struct Defer {
        pub location: Location,
        pub body: Box<Node>,
    }

    /// Runs `body` when the enclosing block is entered
    #[derive(Debug, Clone, PartialEq)]
    pub struct Preface {
        pub location: Location,
        pub body: Box<Node>,
    }

    /// `loop x in xs {}`, `loop cond {}` or `loop {}`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Loop {
        pub location: Location,
        /// A declaration or `Empty`
        pub binding: Box<Node>,
        /// An expression or `Empty`
        pub source: Box<Node>,
        pub body: Box<Node>,
    }

    /// `match subject { pattern => stmt; ... }`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Match {
        pub location: Location,
        pub subject: Box<Node>,
        pub arms: Vec<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Assign {
        pub location: Location,
        pub op: Lexeme,
        pub target: Box<Node>,
        pub value: Box<Node>,
    }

    /// `condition => body`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Conditional {
        pub location: Location,
        pub condition: Box<Node>,
        pub body: Box<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Declaration {
        pub location: Location,
        pub decl: Box<Node>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Expression {
        pub location: Location,
        pub expr: Box<Node>,
    }

    impl Stmt {
        pub fn children(&self) -> Vec<&Node> {
            match self {
                Stmt::Block(s) => s.statements.iter().collect(),
                Stmt::Return(s) => boxed(&[&s.value]),
                Stmt::Yield(s) => boxed(&[&s.value]),
                Stmt::Defer(s) => boxed(&[&s.body]),
                Stmt::Preface(s) => boxed(&[&s.body]),
                Stmt::Loop(s) => boxed(&[&s.binding, &s.source, &s.body]),
                Stmt::Match(s) => std::iter::once(s.subject.as_ref())
                    .chain(s.arms.iter())
                    .collect(),
                Stmt::Assign(s) => boxed(&[&s.target, &s.value]),
                Stmt::Conditional(s) => boxed(&[&s.condition, &s.body]),
                Stmt::Declaration(s) => boxed(&[&s.decl]),
                Stmt::Expression(s) => boxed(&[&s.expr]),
            }
        }
    }
}

/// Top-level items
pub mod global {
    use super::{boxed, Node, Variant, Visibility};
    use tern_error::Location;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Global {
        Module(Module),
        Import(Import),
        ImportGroup(ImportGroup),
        Definition(Definition),
    }

    namespace!(global, Global, [Module, Import, ImportGroup, Definition]);

    /// `module a.b;`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Module {
        pub location: Location,
        pub path: Vec<String>,
    }

    /// `import a.b;` or `import alias = a.b;`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Import {
        pub location: Location,
        pub path: Vec<String>,
        pub alias: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ImportGroup {
        pub location: Location,
        pub imports: Vec<Node>,
    }

    /// `export name: Type = value;`
    #[derive(Debug, Clone, PartialEq)]
    pub struct Definition {
        pub location: Location,
        pub visibility: Visibility,
        pub decl: Box<Node>,
        pub value: Box<Node>,
    }

    impl Global {
        pub fn children(&self) -> Vec<&Node> {
            match self {
                Global::Module(_) | Global::Import(_) => Vec::new(),
                Global::ImportGroup(g) => g.imports.iter().collect(),
                Global::Definition(g) => boxed(&[&g.decl, &g.value]),
            }
        }
    }
}
