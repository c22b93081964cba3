//! Grammar for SVG path data.
//!
//! Parses the `d` attribute of a path element into [`PathCommand`]s. The
//! parser recovers from errors by resuming at the next command letter, so a
//! single pass reports every malformed command in the input.

use winnow::{
    Parser as _,
    ascii::{digit0, digit1},
    combinator::{alt, cut_err, opt, peek, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{one_of, take_while},
};

use calliper_core::geometry::Point;

use crate::{
    command::{PathCommand, Segment, argument_help, is_command_letter},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<PathDiagnostic>>;

fn is_wsp(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn wsp0(input: &mut Input<'_>) -> IResult<()> {
    take_while(0.., is_wsp).void().parse_next(input)
}

/// Optional whitespace with at most one comma.
fn comma_wsp(input: &mut Input<'_>) -> IResult<()> {
    (wsp0, opt(','), wsp0).void().parse_next(input)
}

/// Parse a number: optional sign, digits with an optional fraction, and
/// an optional exponent. `1.5.5` reads as `1.5` followed by `.5`.
fn number(input: &mut Input<'_>) -> IResult<f64> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(|text: &str| text.parse::<f64>())
        .verify(|value: &f64| value.is_finite())
        .parse_next(input)
}

fn number_start(input: &mut Input<'_>) -> IResult<char> {
    one_of(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.')).parse_next(input)
}

fn next_number(input: &mut Input<'_>) -> IResult<f64> {
    preceded(comma_wsp, number).parse_next(input)
}

fn point(input: &mut Input<'_>) -> IResult<Point> {
    (number, next_number)
        .map(|(x, y)| Point::new(x, y))
        .parse_next(input)
}

fn next_point(input: &mut Input<'_>) -> IResult<Point> {
    preceded(comma_wsp, point).parse_next(input)
}

/// Parse an arc flag. Flags are single characters, so `110` is three tokens.
fn flag(input: &mut Input<'_>) -> IResult<bool> {
    comma_wsp.parse_next(input)?;
    let start = input.current_token_start();
    one_of(['0', '1'])
        .map(|c: char| c == '1')
        .context(PathDiagnostic {
            code: ErrorCode::E005,
            message: "invalid arc flag",
            help: Some("the large-arc and sweep flags must each be `0` or `1`"),
            start,
        })
        .parse_next(input)
}

/// Parse one argument group of the command `letter`.
fn arguments(input: &mut Input<'_>, letter: char) -> IResult<Segment> {
    match letter.to_ascii_lowercase() {
        'm' => point.map(Segment::MoveTo).parse_next(input),
        'l' => point.map(Segment::LineTo).parse_next(input),
        'h' => number.map(Segment::Horizontal).parse_next(input),
        'v' => number.map(Segment::Vertical).parse_next(input),
        'c' => (point, next_point, next_point)
            .map(|(control1, control2, end)| Segment::Cubic {
                control1,
                control2,
                end,
            })
            .parse_next(input),
        's' => (point, next_point)
            .map(|(control2, end)| Segment::SmoothCubic { control2, end })
            .parse_next(input),
        'q' => (point, next_point)
            .map(|(control, end)| Segment::Quadratic { control, end })
            .parse_next(input),
        't' => point.map(Segment::SmoothQuadratic).parse_next(input),
        'a' => (point, next_number, flag, flag, next_point)
            .map(|(radii, rotation, large_arc, sweep, end)| Segment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                end,
            })
            .parse_next(input),
        _ => Ok(Segment::Close),
    }
}

/// Parse one argument group, committing to it.
fn group<'a>(input: &mut Input<'a>, letter: char) -> IResult<Segment> {
    let start = input.current_token_start();
    cut_err(move |i: &mut Input<'a>| arguments(i, letter))
        .context(PathDiagnostic {
            code: ErrorCode::E002,
            message: "missing or malformed coordinate",
            help: Some(argument_help(letter)),
            start,
        })
        .parse_next(input)
}

/// Parse a command letter and every argument group repeated after it.
fn command<'a>(input: &mut Input<'a>) -> IResult<PathCommand> {
    let start = input.current_token_start();

    let letter = one_of(is_command_letter)
        .context(PathDiagnostic {
            code: ErrorCode::E001,
            message: "unexpected character",
            help: Some("path data consists of command letters, numbers, commas and whitespace"),
            start,
        })
        .parse_next(input)?;

    let mut segments = Vec::new();
    if letter.eq_ignore_ascii_case(&'z') {
        segments.push(Segment::Close);
    } else {
        wsp0.parse_next(input)?;
        segments.push(group(input, letter)?);

        // A further group only starts where a number does
        let rest: Vec<Segment> = repeat(
            0..,
            preceded(
                (comma_wsp, peek(number_start)),
                move |i: &mut Input<'a>| group(i, letter),
            ),
        )
        .parse_next(input)?;
        segments.extend(rest);
    }

    if letter.eq_ignore_ascii_case(&'m') {
        for segment in segments.iter_mut().skip(1) {
            if let Segment::MoveTo(p) = *segment {
                *segment = Segment::LineTo(p);
            }
        }
    }

    let end = input.current_token_start();
    Ok(PathCommand::new(letter, segments, Span::new(start..end)))
}

fn skip_whitespace(input: &mut Input<'_>) {
    while input.peek_token().is_some_and(is_wsp) {
        input.next_token();
    }
}

/// Parser state accumulating commands and diagnostics.
struct PathParser<'a> {
    source: &'a str,
    commands: Vec<PathCommand>,
    diagnostics: DiagnosticCollector,
}

impl<'a> PathParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            commands: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn parse(&mut self, mut input: Input<'a>) {
        skip_whitespace(&mut input);
        if input.is_empty() {
            self.diagnostics.emit(
                Diagnostic::error("empty path data")
                    .with_code(ErrorCode::E004)
                    .with_label(Span::new(0..self.source.len()), ErrorCode::E004.description())
                    .with_help("a path needs at least a moveto such as `M 0 0`"),
            );
            return;
        }

        self.check_leading_moveto(&input);

        while !input.is_empty() {
            let command_start = input.current_token_start();
            match command(&mut input) {
                Ok(command) => self.commands.push(command),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = self.convert_err_mode(e, error_pos);
                    self.diagnostics.emit(diagnostic);
                    Self::recover(&mut input, command_start);
                }
            }
            skip_whitespace(&mut input);
        }
    }

    fn check_leading_moveto(&mut self, input: &Input<'a>) {
        match input.peek_token() {
            Some(first) if is_command_letter(first) && !first.eq_ignore_ascii_case(&'m') => {
                let pos = input.current_token_start();
                self.diagnostics.emit(
                    Diagnostic::error(format!("path data starts with `{first}`"))
                        .with_code(ErrorCode::E003)
                        .with_label(Span::new(pos..self.char_end(pos)), "expected `M` or `m`")
                        .with_help("start the path with a moveto such as `M 0 0`"),
                );
            }
            _ => {}
        }
    }

    /// Skip to the next command letter, always making progress.
    fn recover(input: &mut Input<'a>, command_start: usize) {
        if input.current_token_start() == command_start {
            input.next_token();
        }
        while input.peek_token().is_some_and(|c| !is_command_letter(c)) {
            input.next_token();
        }
    }

    /// Returns the offset just past the character at `pos`.
    fn char_end(&self, pos: usize) -> usize {
        self.source
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(pos, |c| pos + c.len_utf8())
    }

    /// Convert a winnow error into a Diagnostic.
    ///
    /// Uses the innermost `PathDiagnostic` context; falls back to E001 at
    /// the error position when none is attached.
    fn convert_err_mode(&self, err: ErrMode<ContextError<PathDiagnostic>>, error_pos: usize) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        let Some(PathDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        else {
            let span = Span::new(error_pos..self.char_end(error_pos));
            return Diagnostic::error("unexpected character")
                .with_code(ErrorCode::E001)
                .with_label(span, ErrorCode::E001.description());
        };

        let end = if error_pos > *start {
            error_pos
        } else {
            self.char_end(*start)
        };
        let span = Span::new(*start..end);

        let message = match (code, self.source.get(*start..end)) {
            (ErrorCode::E001, Some(text)) if !text.is_empty() => {
                format!("unexpected character `{text}`")
            }
            _ => message.to_string(),
        };

        let mut diag = Diagnostic::error(message)
            .with_code(*code)
            .with_label(span, code.description());
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        diag
    }

    fn finish(self) -> Result<Vec<PathCommand>, ParseError> {
        self.diagnostics.finish(self.commands)
    }
}

/// Parse path data into commands, collecting every error.
pub(crate) fn parse_commands(source: &str) -> Result<Vec<PathCommand>, ParseError> {
    let mut parser = PathParser::new(source);
    parser.parse(LocatingSlice::new(source));
    parser.finish()
}
