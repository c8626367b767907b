// ============================================================
// Layer 4 — Context Preprocessor
// ============================================================
// Cleans text loaded from context files before it reaches the
// tokenizer. Word exports and copy-pasted text carry characters
// that the BERT normaliser would otherwise turn into stray
// whitespace tokens or [UNK]s:
//   - tabs, non-breaking spaces (U+00A0), zero-width spaces
//     (U+200B) and byte order marks (U+FEFF)
//   - Windows carriage returns
//   - other control characters
//
// Cleaning steps (applied in order):
//   1. Map those characters to a plain space ("\r\n" and '\r' → '\n')
//   2. Collapse runs of spaces and trim each line
//   3. Keep at most one blank line between paragraphs
//   4. Trim the whole text
//
// Inline --context strings are NOT cleaned; they reach the
// tokenizer exactly as typed.
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text.replace("\r\n", "\n").chars().map(normalise_char).collect();

        let mut out   = String::with_capacity(normalised.len());
        let mut blank = 0usize;

        for line in normalised.lines().map(collapse_spaces) {
            if line.is_empty() {
                blank += 1;
                continue;
            }
            if !out.is_empty() {
                // One newline between lines, two if any blank line came between
                out.push_str(if blank > 0 { "\n\n" } else { "\n" });
            }
            out.push_str(&line);
            blank = 0;
        }

        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn normalise_char(c: char) -> char {
    match c {
        '\t' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
        '\r'                                        => '\n',
        c if c.is_control() && c != '\n'            => ' ',
        c                                           => c,
    }
}

/// Collapse consecutive spaces into one and trim the line
fn collapse_spaces(line: &str) -> String {
    line.split(' ')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
