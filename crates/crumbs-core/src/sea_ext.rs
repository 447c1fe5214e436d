use sea_orm::{
    ColumnTrait,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match: `LOWER(col) LIKE '%needle%'`.
///
/// Portable across backends (no `ILIKE`). A NULL column never matches.
pub fn contains_ci<C>(col: C, needle: &str) -> SimpleExpr
where
    C: ColumnTrait,
{
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((col.entity_name(), col))))
        .like(LikeExpr::new(pattern).escape('\\'))
}
