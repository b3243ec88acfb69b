use std::fmt::Write;

pub mod dashboard;
pub mod form;
pub mod list;
pub mod session;

/// Appends `line` and a newline to a view's text output.
fn push_line(out: &mut String, line: std::fmt::Arguments<'_>) {
    // writing into a String cannot fail
    let _ = out.write_fmt(line);
    out.push('\n');
}
