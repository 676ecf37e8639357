//! Greedy line wrapping and layout of multi-line cells.
//!
//! Wrapping is independent of any font: callers pass a `measure` closure
//! returning the rendered width of a string in millimetres.

use crate::model::{Alignment, Point, TextFrame};

/// One output line of [`wrap_text`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedLine {
    pub text: String,
    /// The line ends an explicit line of the input (or the input itself).
    pub last_of_line: bool,
}

/// Wraps `content` so that every line measures at most `max_width`.
///
/// Explicit newlines always end a line and a single trailing newline is
/// ignored. Words wider than `max_width` are split between characters. Empty
/// content still produces one (empty) line.
pub fn wrap_text<F>(content: &str, max_width: f64, mut measure: F) -> Vec<WrappedLine>
where
    F: FnMut(&str) -> f64,
{
    let content = content.strip_suffix('\n').unwrap_or(content);
    let mut lines = Vec::new();
    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        wrap_line(line, max_width, &mut measure, &mut lines);
    }
    lines
}

fn wrap_line<F>(line: &str, max_width: f64, measure: &mut F, out: &mut Vec<WrappedLine>)
where
    F: FnMut(&str) -> f64,
{
    let mut current = String::new();
    let mut started = false;

    for word in line.split(' ') {
        let candidate = if started {
            format!("{current} {word}")
        } else {
            word.to_owned()
        };

        if measure(&candidate) <= max_width {
            current = candidate;
            started = true;
            continue;
        }

        if started && !current.is_empty() {
            out.push(WrappedLine {
                text: std::mem::take(&mut current),
                last_of_line: false,
            });
        }

        let mut pieces = break_word(word, max_width, measure);
        current = pieces.pop().unwrap_or_default();
        out.extend(pieces.into_iter().map(|text| WrappedLine {
            text,
            last_of_line: false,
        }));
        started = true;
    }

    out.push(WrappedLine {
        text: current,
        last_of_line: true,
    });
}

fn break_word<F>(word: &str, max_width: f64, measure: &mut F) -> Vec<String>
where
    F: FnMut(&str) -> f64,
{
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        // a lone glyph wider than the cell still has to go somewhere
        if measure(&piece) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    pieces.push(piece);
    pieces
}

/// Spreads the words of `line` across `target_width`.
///
/// Returns each word with its x offset from the start of the line. Lines with
/// a single word keep it at offset zero.
pub fn justify<F>(line: &str, target_width: f64, mut measure: F) -> Vec<(f64, String)>
where
    F: FnMut(&str) -> f64,
{
    let words: Vec<&str> = line.split(' ').filter(|word| !word.is_empty()).collect();
    if words.len() < 2 {
        return words.into_iter().map(|word| (0.0, word.to_owned())).collect();
    }

    let widths: Vec<f64> = words.iter().map(|word| measure(word)).collect();
    let total: f64 = widths.iter().sum();
    let gap = ((target_width - total) / (words.len() - 1) as f64).max(0.0);

    let mut x = 0.0;
    words
        .into_iter()
        .zip(widths)
        .map(|(word, width)| {
            let placed = (x, word.to_owned());
            x += width + gap;
            placed
        })
        .collect()
}

/// A run of text placed inside a cell; `position` is the left edge of the run
/// and the top of its line box.
#[derive(Clone, Debug, PartialEq)]
pub struct CellRun {
    pub position: Point,
    pub text: String,
}

/// Result of [`layout_cell`].
#[derive(Clone, Debug, PartialEq)]
pub struct CellLayout {
    pub runs: Vec<CellRun>,
    /// Wrapped line count times the frame's line height.
    pub height: f64,
    /// Closed outline around the cell when the frame asks for a border.
    pub border: Option<Vec<Point>>,
}

/// Wraps `content` inside `frame` and positions every line for `alignment`.
///
/// Text is inset by `padding` on both sides. Justified lines are split into
/// one run per word, except the last wrapped line of each explicit line.
pub fn layout_cell<F>(
    frame: &TextFrame,
    content: &str,
    alignment: Alignment,
    padding: f64,
    mut measure: F,
) -> CellLayout
where
    F: FnMut(&str) -> f64,
{
    let inner_left = frame.x + padding;
    let inner_width = frame.width - padding * 2.0;
    let lines = wrap_text(content, inner_width, &mut measure);

    let mut runs = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let top = frame.y + index as f64 * frame.line_height;
        let pieces = match alignment {
            Alignment::Left => vec![(0.0, line.text.clone())],
            Alignment::Center => {
                vec![((inner_width - measure(&line.text)) / 2.0, line.text.clone())]
            }
            Alignment::Right => vec![(inner_width - measure(&line.text), line.text.clone())],
            Alignment::Justified if line.last_of_line => vec![(0.0, line.text.clone())],
            Alignment::Justified => justify(&line.text, inner_width, &mut measure),
        };
        runs.extend(pieces.into_iter().map(|(offset, text)| CellRun {
            position: Point::new(inner_left + offset, top),
            text,
        }));
    }

    let height = lines.len() as f64 * frame.line_height;
    let border = frame.border.then(|| {
        let (left, top) = (frame.x, frame.y);
        let (right, bottom) = (frame.x + frame.width, frame.y + height);
        vec![
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
            Point::new(left, top),
        ]
    });

    CellLayout {
        runs,
        height,
        border,
    }
}
