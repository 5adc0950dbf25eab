//! End-to-end tests for the Tern front end
//!
//! Source → Scanner → Parser → Printer / Shape / Diagnostics

use tern_error::{DiagnosticRenderer, ErrorContext, ErrorReason, SourceCache, SyntaxError};
use tern_parser::{parse, print, shape, ParseResult};

/// A program touching every production
pub const SAMPLE: &str = r#"module demo.shapes;

import io;
import fmt = std.format;

$origin: Point = {x: 0, y: 0};
copy: [[origin]] = origin;
$(left, right): Pair = split(origin);
handler: (Int, Str) -> Bool | Void = check;

identity = fn [T] (x: T) -> T {
    return x;
};

area = fn (w: Float, h: Float) -> Float {
    return w * h;
};

export main = fn () -> Int {
    total: Int = 0;
    preface io.print("start");
    defer io.print("done: {total}");
    loop i in range(0, 10) {
        total += i ** 2;
    }
    loop total > 100 {
        total -= 1;
    }
    loop {
        yield;
    }
    match total % 3 {
        0 => io.print("fizz");
        _ => {
            yield total;
        }
    }
    values: Int[3, _] = [[1, 2], [3, 4], [5, 6]];
    table: Map[Str, Int[]] = make();
    (a, b) = (b, a);
    ok: Bool = try check(values[0, 1]) && !done;
    ratio: Float = 00.0314 * -area(2.0, 3.5);
    return 0x1f | 0b101 ^ 017;
};
"#;

/// Parses `source`, panicking with rendered diagnostics if it has errors
pub fn parse_clean(source: &str) -> ParseResult {
    let result = parse(source);
    if !result.is_clean() {
        panic!(
            "expected a clean parse, but got:\n{}",
            render("input.tn", source, &result)
        );
    }
    result
}

/// `(context, reason)` of each error
pub fn reasons(errors: &[SyntaxError]) -> Vec<(ErrorContext, ErrorReason)> {
    errors.iter().map(|e| (e.context, e.reason)).collect()
}

/// Renders every diagnostic of `result` without colors
pub fn render(name: &str, source: &str, result: &ParseResult) -> String {
    let mut cache = SourceCache::new();
    let file_id = cache.add(name, source);
    let renderer = DiagnosticRenderer::new(&cache).without_colors();
    result.diagnostics(file_id).render(&renderer)
}

/// Asserts that printing a clean parse and parsing it again gives the same
/// tree, and that printing is a fixed point
pub fn assert_round_trip(source: &str) {
    let first = parse_clean(source);
    let printed = print(&first.unit);
    let second = parse_clean(&printed);

    assert_eq!(
        shape(&first.unit),
        shape(&second.unit),
        "printed source:\n{printed}"
    );
    assert_eq!(print(&second.unit), printed);
}

#[cfg(test)]
mod pipeline_tests;
