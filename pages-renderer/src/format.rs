//! Markup formatting applied to every rendered page before it is written.

/// Reformats rendered markup. Must be pure and infallible.
pub trait Formatter {
    fn format(&self, markup: &str) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&str) -> String,
{
    fn format(&self, markup: &str) -> String {
        self(markup)
    }
}

/// Whitespace tidy-up for template output.
///
/// Template directives leave behind trailing spaces and stacks of empty
/// lines; this normalises line endings to LF, strips trailing whitespace,
/// condenses blank-line runs to a single blank line, drops leading blank
/// lines and ends the document with exactly one newline. Line content and
/// indentation are left alone, so `<pre>` blocks survive unchanged apart from
/// trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyFormatter;

impl Formatter for PrettyFormatter {
    fn format(&self, markup: &str) -> String {
        let mut out = String::with_capacity(markup.len());
        let mut pending_blank = false;
        for line in markup.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                pending_blank = !out.is_empty();
                continue;
            }
            if pending_blank {
                out.push('\n');
                pending_blank = false;
            }
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
