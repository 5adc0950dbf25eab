//! Top-level productions: the module header, imports and definitions

use super::decl::handle_decl;
use super::expr::handle_expr;
use super::stmt::handle_terminator;
use crate::ast::{global, Node, TranslationUnit, Visibility};
use crate::context::Context;
use tern_error::{ErrorContext, ErrorReason};
use tern_lexer::Lexeme;

/// `module path; import...; definition...`
pub(crate) fn handle_translation_unit(ctx: &mut Context<'_, '_>) -> Node {
    let location = ctx.location();

    let module = handle_module_decl(ctx);
    let module = ctx.emit_if_node_missing(module, ErrorReason::MissingDecl);
    if module.is_missing() && ctx.check(Lexeme::Module) {
        // A header without a path is reported once, as a missing declaration
        ctx.synchronize(&[Lexeme::Semicolon]);
        ctx.match_lexeme(Lexeme::Semicolon);
    }

    let imports = handle_import_group(ctx);

    let mut definitions = Vec::new();
    while !ctx.done() {
        match handle_definition(ctx) {
            Some(definition) => definitions.push(definition),
            None => {
                ctx.emit(ErrorReason::MissingDecl);
                ctx.synchronize(&[Lexeme::Semicolon]);
                ctx.match_lexeme(Lexeme::Semicolon);
            }
        }
    }

    TranslationUnit {
        location,
        module: Box::new(module),
        imports: Box::new(imports),
        definitions,
    }
    .into()
}

/// `a.b.c`
fn handle_path(ctx: &mut Context<'_, '_>) -> Option<Vec<String>> {
    let first = ctx.match_lexeme(Lexeme::Identifier)?;
    let mut path = vec![first.text.clone()];
    while ctx.match_lexeme(Lexeme::Dot).is_some() {
        match ctx.match_lexeme(Lexeme::Identifier) {
            Some(segment) => path.push(segment.text.clone()),
            None => {
                ctx.emit(ErrorReason::MissingIdentifier);
                break;
            }
        }
    }
    Some(path)
}

fn handle_module_decl(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::ModuleDecl);
    let keyword = ctx.match_lexeme(Lexeme::Module)?;
    let Some(path) = handle_path(&mut ctx) else {
        return ctx.fail();
    };
    ctx.emit_if_lexeme_not_present(Lexeme::Semicolon, ErrorReason::MissingSemicolon);

    Some(
        global::Module {
            location: keyword.location,
            path,
        }
        .into(),
    )
}

fn handle_import_group(ctx: &mut Context<'_, '_>) -> Node {
    let location = ctx.location();
    let mut imports = Vec::new();
    while let Some(import) = handle_import(ctx) {
        imports.push(import);
    }
    global::ImportGroup { location, imports }.into()
}

/// `import a.b;` or `import alias = a.b;`
fn handle_import(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Import);
    let keyword = ctx.match_lexeme(Lexeme::Import)?;

    let Some(first) = handle_path(&mut ctx) else {
        ctx.emit(ErrorReason::MissingIdentifier);
        ctx.synchronize(&[Lexeme::Semicolon]);
        ctx.match_lexeme(Lexeme::Semicolon);
        return Some(Node::missing(keyword.location));
    };

    let (path, alias) = if ctx.match_lexeme(Lexeme::Assign).is_some() {
        let target = handle_path(&mut ctx).unwrap_or_else(|| {
            ctx.emit(ErrorReason::MissingIdentifier);
            Vec::new()
        });
        (target, Some(first.join(".")))
    } else {
        (first, None)
    };
    ctx.emit_if_lexeme_not_present(Lexeme::Semicolon, ErrorReason::MissingSemicolon);

    Some(
        global::Import {
            location: keyword.location,
            path,
            alias,
        }
        .into(),
    )
}

/// `[export] decl = value;`
fn handle_definition(parent: &mut Context<'_, '_>) -> Option<Node> {
    let visibility = if parent.check(Lexeme::Export) {
        Visibility::Exported
    } else {
        parent.visibility()
    };
    let mut ctx = parent.enter_with_visibility(ErrorContext::Definition, visibility);
    let location = ctx.location();
    ctx.match_lexeme(Lexeme::Export);

    let Some(decl) = handle_decl(&mut ctx) else {
        return ctx.fail();
    };

    let value = if ctx.emit_if_lexeme_not_present(Lexeme::Assign, ErrorReason::MissingAssignment) {
        let value = handle_expr(&mut ctx);
        ctx.emit_if_node_missing(value, ErrorReason::MissingExpr)
    } else {
        let missing = Node::missing(ctx.location());
        ctx.synchronize(&[Lexeme::Semicolon]);
        missing
    };
    handle_terminator(&mut ctx);

    Some(
        global::Definition {
            location,
            visibility: ctx.visibility(),
            decl: Box::new(decl),
            value: Box::new(value),
        }
        .into(),
    )
}

#[cfg(test)]
mod tests {
    use crate::ast::{global, Node, TranslationUnit, Visibility};
    use crate::parser::parse;
    use crate::shape::shape;
    use tern_error::{ErrorContext, ErrorReason};

    fn reasons(source: &str) -> Vec<(ErrorContext, ErrorReason)> {
        parse(source)
            .errors
            .iter()
            .map(|e| (e.context, e.reason))
            .collect()
    }

    #[test]
    fn test_complete_unit() {
        let result = parse(
            "module app.main;\n\
             import io;\n\
             import fmt = std.format;\n\
             export main = fn () { io.print(\"hi\"); };\n\
             $limit: Int = 10;\n",
        );
        assert!(result.is_clean(), "{:?}", result.errors);
        assert_eq!(
            shape(&result.unit),
            "(unit (module app.main) (imports (import io) (import std.format as fmt)) \
             (export (decl main ()) (fn () (dtuple) () (block (call io.print (str \"hi\"))))) \
             (def (decl $limit Int) 10))"
        );

        let unit = result.unit.cast::<TranslationUnit>();
        let main = unit.definitions[0].cast::<global::Definition>();
        assert_eq!(main.visibility, Visibility::Exported);
        let limit = unit.definitions[1].cast::<global::Definition>();
        assert_eq!(limit.visibility, Visibility::Local);
    }

    #[test]
    fn test_module_without_path() {
        let result = parse("module;");
        assert_eq!(
            reasons("module;"),
            [(ErrorContext::TranslationUnit, ErrorReason::MissingDecl)]
        );
        let unit = result.unit.cast::<TranslationUnit>();
        assert!(unit.module.is_missing());
        assert!(unit.definitions.is_empty());
    }

    #[test]
    fn test_missing_header_still_parses_definitions() {
        let result = parse("x = 1;");
        assert_eq!(
            reasons("x = 1;"),
            [(ErrorContext::TranslationUnit, ErrorReason::MissingDecl)]
        );
        assert_eq!(result.unit.cast::<TranslationUnit>().definitions.len(), 1);
    }

    #[test]
    fn test_import_without_path() {
        let result = parse("module m; import ; x = 1;");
        assert_eq!(
            reasons("module m; import ; x = 1;"),
            [(ErrorContext::Import, ErrorReason::MissingIdentifier)]
        );
        let unit = result.unit.cast::<TranslationUnit>();
        let imports = unit.imports.cast::<global::ImportGroup>();
        assert!(matches!(imports.imports[0], Node::RequiredButMissing(_)));
        assert_eq!(unit.definitions.len(), 1);
    }

    #[test]
    fn test_definition_without_assignment() {
        let result = parse("module m; x: Int 5; y = 2;");
        assert_eq!(
            reasons("module m; x: Int 5; y = 2;"),
            [(ErrorContext::Definition, ErrorReason::MissingAssignment)]
        );
        let unit = result.unit.cast::<TranslationUnit>();
        assert_eq!(unit.definitions.len(), 2);
        assert!(unit.definitions[0]
            .cast::<global::Definition>()
            .value
            .is_missing());
    }

    #[test]
    fn test_garbage_between_definitions() {
        let result = parse("module m; a = 1; ) ) ; b = 2;");
        assert_eq!(
            reasons("module m; a = 1; ) ) ; b = 2;"),
            [(ErrorContext::TranslationUnit, ErrorReason::MissingDecl)]
        );
        assert_eq!(result.unit.cast::<TranslationUnit>().definitions.len(), 2);
    }

    #[test]
    fn test_semicolon_optional_after_brace() {
        assert!(parse("module m; f = fn () {} g = 1;").is_clean());
        assert_eq!(
            reasons("module m; a = 1 b = 2;"),
            [(ErrorContext::Definition, ErrorReason::MissingSemicolon)]
        );
    }
}
