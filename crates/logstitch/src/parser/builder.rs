use super::formats::{ErpFormat, WebFormat};
use super::model::{ErpRecord, HeaderFields, ParseOutput, ParseStats, WebRecord};
use super::traits::{LineClass, ParseError, RecordFormat};

/// What the next non-blank line means for the record currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    Opener,
    Other,
    EndOfInput,
}

impl Lookahead {
    fn closes_record(self) -> bool {
        matches!(self, Lookahead::Opener | Lookahead::EndOfInput)
    }
}

#[derive(Debug)]
pub enum BuilderState {
    Idle,
    Accumulating(PendingRecord),
}

/// Record under construction. Never leaves the builder; only the finished
/// record does.
#[derive(Debug)]
pub struct PendingRecord {
    opened_at: usize,
    fields: Option<HeaderFields>,
    /// Message text from the header line itself
    head: String,
    /// Continuation lines, concatenated as-is
    body: String,
}

impl PendingRecord {
    fn new(opened_at: usize, opened: Option<(HeaderFields, String)>) -> Self {
        let (fields, head) = match opened {
            Some((fields, head)) => (Some(fields), head),
            None => (None, String::new()),
        };
        Self {
            opened_at,
            fields,
            head,
            body: String::new(),
        }
    }

    fn append(&mut self, text: &str) {
        self.body.push_str(text);
    }

    fn into_record<F: RecordFormat>(self, format: &F) -> Result<F::Record, ParseError> {
        let fields = self.fields.ok_or_else(|| {
            ParseError::malformed(self.opened_at, "event closed before its time line")
        })?;

        let message = match (self.head.is_empty(), self.body.is_empty()) {
            (_, true) => self.head,
            (true, false) => self.body,
            (false, false) => format!("{} {}", self.head, self.body),
        };

        Ok(format.finish(fields, message))
    }
}

/// Turns a sequence of physical lines into records of one format.
///
/// Each non-blank line is fed through [`RecordBuilder::step`] together with a
/// [`Lookahead`] computed from the next non-blank line. A record is closed
/// when the next line opens another one or the input ends.
pub struct RecordBuilder<F> {
    format: F,
}

impl<F: RecordFormat> RecordBuilder<F> {
    pub fn new(format: F) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    /// Parse the whole input. Fails on the first malformed line.
    pub fn parse<I, S>(&self, lines: I) -> Result<ParseOutput<F::Record>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = ParseStats::default();
        let mut records = Vec::new();
        let mut state = BuilderState::Idle;
        let mut lines = lines.into_iter().enumerate();

        let mut current = self.next_line(&mut lines, &mut stats);
        while let Some((index, line)) = current {
            let next = self.next_line(&mut lines, &mut stats);
            let lookahead = match &next {
                None => Lookahead::EndOfInput,
                Some((_, text)) if self.format.classify(text.as_ref()).opens_record() => {
                    Lookahead::Opener
                }
                Some(_) => Lookahead::Other,
            };

            let class = self.format.classify(line.as_ref());
            let (next_state, emitted) = self.step(state, index + 1, class, lookahead, &mut stats)?;
            state = next_state;
            records.extend(emitted);

            current = next;
        }
        debug_assert!(matches!(state, BuilderState::Idle));

        stats.records = records.len();
        tracing::debug!(
            format = self.format.format().as_str(),
            lines = stats.lines,
            records = stats.records,
            orphans = stats.orphan_lines,
            "parse complete"
        );

        Ok(ParseOutput { records, stats })
    }

    /// Advance one physical line. `line` is the 1-based line number used in errors.
    pub fn step(
        &self,
        state: BuilderState,
        line: usize,
        class: LineClass<'_>,
        next: Lookahead,
        stats: &mut ParseStats,
    ) -> Result<(BuilderState, Option<F::Record>), ParseError> {
        let state = match class {
            LineClass::Blank => return Ok((state, None)),
            LineClass::Header(text) => {
                stats.header_lines += 1;
                // A header only arrives in Idle when the previous step saw it as lookahead
                if let BuilderState::Accumulating(pending) = state {
                    return Err(ParseError::malformed(
                        line,
                        format!(
                            "event opened at line {} was not closed before this header",
                            pending.opened_at
                        ),
                    ));
                }
                tracing::trace!(line, "record: header opens new record");
                let opened = self.format.open(text, line)?;
                BuilderState::Accumulating(PendingRecord::new(line, opened))
            }
            LineClass::Fields(text) => {
                stats.field_lines += 1;
                let mut pending = match state {
                    BuilderState::Accumulating(pending) => pending,
                    BuilderState::Idle => return Err(ParseError::OrphanFieldLine { line }),
                };
                if pending.fields.is_some() {
                    return Err(ParseError::malformed(
                        line,
                        format!(
                            "event opened at line {} already has a time line",
                            pending.opened_at
                        ),
                    ));
                }
                pending.fields = Some(self.format.fields(text, line)?);
                BuilderState::Accumulating(pending)
            }
            LineClass::Continuation(text) => {
                stats.continuation_lines += 1;
                match state {
                    BuilderState::Accumulating(mut pending) => {
                        pending.append(text);
                        BuilderState::Accumulating(pending)
                    }
                    BuilderState::Idle => {
                        stats.orphan_lines += 1;
                        tracing::debug!(line, "record: dropping line before first header");
                        return Ok((BuilderState::Idle, None));
                    }
                }
            }
        };

        match state {
            BuilderState::Accumulating(pending) if next.closes_record() => {
                tracing::trace!(
                    opened_at = pending.opened_at,
                    lookahead = ?next,
                    "record: boundary, emitting"
                );
                let record = pending.into_record(&self.format)?;
                Ok((BuilderState::Idle, Some(record)))
            }
            state => Ok((state, None)),
        }
    }

    /// Next non-blank line, counting every physical line consumed.
    fn next_line<I, S>(&self, lines: &mut I, stats: &mut ParseStats) -> Option<(usize, S)>
    where
        I: Iterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        for (index, line) in lines.by_ref() {
            stats.lines += 1;
            if self.format.classify(line.as_ref()) == LineClass::Blank {
                stats.blank_lines += 1;
                continue;
            }
            return Some((index, line));
        }
        None
    }
}

/// Parse a web log into records.
pub fn parse_web_log<I, S>(lines: I) -> Result<Vec<WebRecord>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RecordBuilder::new(WebFormat).parse(lines).map(|output| output.records)
}

/// Parse an ERP log into records.
pub fn parse_erp_log<I, S>(lines: I) -> Result<Vec<ErpRecord>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RecordBuilder::new(ErpFormat).parse(lines).map(|output| output.records)
}
