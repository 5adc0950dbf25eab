//! Grammar productions
//!
//! Every production has the shape
//! `fn handle_x(ctx: &mut Context) -> Option<Node>`. `None` means the
//! production does not start here and nothing was consumed; once a
//! production has committed to a construct it returns a node and reports
//! the missing parts through its context.

mod decl;
mod expr;
mod global;
mod list;
mod stmt;
mod types;

pub(crate) use decl::handle_decl;
pub(crate) use expr::handle_expr;
pub(crate) use global::handle_translation_unit;
pub(crate) use stmt::handle_stmt;
pub(crate) use types::handle_type;
