//! Edit dispatcher
//!
//! The single entry point an editor host calls after each buffer change.
//! The dispatcher classifies the edit, plans a rewrite (quote-to-backtick
//! conversion, reversion, or markup brace wrapping) and applies it
//! atomically, handing back the cursor position the host should restore.
//!
//! Ordering inside one edit is fixed: backtick attribute wrapping is tried
//! first, then the quote region and comment checks gate everything else,
//! with reversion checked ahead of any forward conversion. At most one
//! rewrite happens per edit.

use crate::buffer::{LineSource, Replacement, TextBuffer, TextBufferMut};
use crate::config::ConverterConfig;
use crate::context;
use crate::interpolation::{self, template_string_info};
use crate::markup;
use crate::position::Position;
use crate::quote::{self, QuoteRegion};
use crate::rewrite::{self, RewriteResult};
use crate::snapshot::DocumentSnapshot;

/// One host edit, reported after it has been applied to the buffer.
///
/// `position` is where the change started: the first inserted character now
/// sits at that position, and for deletions it is where the removed text
/// used to begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub position: Position,
    pub inserted: String,
    pub deleted_len: usize,
}

impl EditEvent {
    pub fn insertion(position: Position, inserted: impl Into<String>) -> Self {
        Self {
            position,
            inserted: inserted.into(),
            deleted_len: 0,
        }
    }

    pub fn deletion(position: Position, deleted_len: usize) -> Self {
        Self {
            position,
            inserted: String::new(),
            deleted_len,
        }
    }
}

/// Identity of the document being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub language_id: String,
    pub file_name: String,
}

impl DocumentMeta {
    pub fn new(language_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            language_id: language_id.into(),
            file_name: file_name.into(),
        }
    }
}

/// What the dispatcher did with an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The buffer was rewritten; move the cursor here.
    Rewritten { cursor: Position },
    NoAction,
}

/// A planned rewrite plus the optional follow-up insertion that must land
/// as a second apply (the auto-closing brace).
struct Plan {
    result: RewriteResult,
    follow_up: Option<Replacement>,
    cursor: Position,
}

impl Plan {
    fn new(result: RewriteResult, cursor: Position) -> Self {
        Self {
            result,
            follow_up: None,
            cursor,
        }
    }

    fn with_follow_up(mut self, extra: Replacement) -> Self {
        self.follow_up = Some(extra);
        self
    }
}

/// Per-document rewrite engine.
///
/// Holds the configuration and the shadow snapshot of the document as it
/// was before the most recent edit, which the reversion check compares
/// against.
#[derive(Debug, Default)]
pub struct ChangeDispatcher {
    config: ConverterConfig,
    previous: Option<DocumentSnapshot>,
}

impl ChangeDispatcher {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            previous: None,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Drop the shadow snapshot, e.g. when the document is closed or
    /// replaced wholesale.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Start tracking a document: capture the shadow snapshot without
    /// handling an edit. Call when a document is opened.
    pub fn track<B: TextBuffer>(&mut self, buffer: &B) {
        self.previous = Some(DocumentSnapshot::capture(buffer));
    }

    /// Handle one edit. Returns what was rewritten, if anything.
    pub fn on_edit<B: TextBufferMut>(
        &mut self,
        buffer: &mut B,
        meta: &DocumentMeta,
        event: &EditEvent,
    ) -> Outcome {
        if !self.config.enabled
            || !self.config.is_language_supported(&meta.language_id)
            || self.config.is_file_excluded(&meta.file_name)
        {
            return Outcome::NoAction;
        }
        // Bulk edits (paste, refactor) are never rewritten.
        if event.inserted.chars().count() > 2 || event.deleted_len > 1 {
            return self.finish(buffer, Outcome::NoAction);
        }
        if meta.language_id == "svelte"
            && !context::is_within_script_block(&*buffer, event.position)
        {
            return self.finish(buffer, Outcome::NoAction);
        }

        let outcome = match self.plan(&*buffer, meta, event) {
            Some(plan) => apply_plan(buffer, plan),
            None => Outcome::NoAction,
        };
        self.finish(buffer, outcome)
    }

    /// Refresh the shadow snapshot once the edit (and any rewrite) has
    /// settled.
    fn finish<B: TextBufferMut>(&mut self, buffer: &B, outcome: Outcome) -> Outcome {
        if self.config.auto_remove_template_string {
            self.previous = Some(DocumentSnapshot::capture(buffer));
        }
        outcome
    }

    fn plan<B: TextBufferMut>(
        &self,
        buffer: &B,
        meta: &DocumentMeta,
        event: &EditEvent,
    ) -> Option<Plan> {
        let line_no = event.position.line;
        let line = buffer.line(line_no)?.into_owned();
        let cur = event.position.column;
        if cur < 1 {
            return None;
        }

        let chars: Vec<char> = line.chars().collect();
        let inserted = event.inserted.as_str();
        let prior = chars.get(cur.wrapping_sub(1)).copied();
        let next = chars.get(cur + 1).copied();
        let next_two: String = chars.iter().skip(cur + 1).take(2).collect();
        // Escape guards: a backslash just before the trigger pair (or just
        // before a typed `$`) means the user is writing a literal.
        let escaped_pair = cur >= 2 && chars.get(cur - 2) == Some(&'\\');
        let escaped_dollar = prior == Some('\\');

        // Backtick attribute values get brace-wrapped regardless of any
        // quote region on the line.
        if markup::is_markup_language(&meta.language_id)
            && markup::should_trigger_brace_wrap(inserted)
        {
            if let Some(attr) = markup::backtick_attribute_range(&line, line_no, cur) {
                if let Ok(result) = rewrite::wrap_backtick_attribute(&attr) {
                    return Some(Plan::new(result, Position::new(line_no, cur + 1)));
                }
            }
        }

        let region = quote::locate(
            &line,
            line_no,
            cur,
            self.config.delimiter_preference(),
            self.config.convert_outermost_quotes,
        )?;
        if !region.is_matched() {
            return None;
        }
        if !context::is_eligible_at(&line, cur, &region) {
            return None;
        }

        // Reversion runs only once the region and comment checks pass, and
        // ahead of any forward conversion.
        if let Some(plan) = self.plan_reversion(buffer, &line, line_no, cur, event) {
            return Some(plan);
        }
        if inserted.is_empty() {
            return None;
        }

        let in_markup = markup::is_markup_language(&meta.language_id)
            && markup::window_is_markup(buffer, event.position);

        if in_markup && self.config.add_brackets_to_props {
            if inserted == "{" && prior == Some('$') && !escaped_pair {
                let result = rewrite::to_braces(&region);
                return Some(
                    Plan::new(result, Position::new(line_no, cur + 1))
                        .with_follow_up(Replacement::insert_at(line_no, cur + 1, "}")),
                );
            }
            if inserted == "{}" && prior == Some('$') && !escaped_pair {
                return Some(Plan::new(
                    rewrite::to_braces(&region),
                    Position::new(line_no, cur + 1),
                ));
            }
            if inserted == "}"
                && interpolation::has_unescaped_interpolation(&region.content)
                && !interpolation::has_backticks(&region.content)
            {
                return Some(Plan::new(
                    rewrite::to_braces(&region),
                    Position::new(line_no, cur + 1),
                ));
            }
            // Prop wrapping and template conversion never mix: an edit that
            // is not a brace trigger does nothing here.
            return None;
        }

        let info = template_string_info(
            &line,
            cur,
            line_no,
            buffer as &dyn LineSource,
            self.config.convert_within_template_string,
        );
        if info.within_backticks {
            return None;
        }

        let auto_close = self.config.auto_closing_brackets;
        match inserted {
            "{}" if prior == Some('$') && !escaped_pair => Some(Plan::new(
                rewrite::to_backticks(&region),
                Position::new(line_no, cur + 1),
            )),
            "{" if prior == Some('$') && !escaped_pair => {
                let plan = Plan::new(
                    rewrite::to_backticks(&region),
                    Position::new(line_no, cur + 1),
                );
                Some(if auto_close {
                    plan.with_follow_up(Replacement::insert_at(line_no, cur + 1, "}"))
                } else {
                    plan
                })
            }
            "$" if next_two == "{}" && !escaped_dollar => Some(Plan::new(
                rewrite::to_backticks(&region),
                Position::new(line_no, cur + 2),
            )),
            "$" if next == Some('{') && auto_close && !escaped_dollar => Some(
                Plan::new(
                    rewrite::to_backticks(&region),
                    Position::new(line_no, cur + 2),
                )
                .with_follow_up(Replacement::insert_at(line_no, cur + 2, "}")),
            ),
            "}" if interpolation::has_unescaped_interpolation(&region.content)
                && !interpolation::has_backticks(&region.content) =>
            {
                Some(Plan::new(
                    rewrite::to_backticks(&region),
                    Position::new(line_no, cur + 1),
                ))
            }
            _ => None,
        }
    }

    /// Backtick-to-quote reversion: the deletion just broke the last
    /// interpolation of a template string that was live before the edit.
    fn plan_reversion<B: TextBufferMut>(
        &self,
        buffer: &B,
        line: &str,
        line_no: usize,
        cur: usize,
        event: &EditEvent,
    ) -> Option<Plan> {
        if !self.config.auto_remove_template_string
            || !event.inserted.is_empty()
            || event.deleted_len == 0
        {
            return None;
        }
        let previous = self.previous.as_ref()?;
        let prev_line = previous.line(line_no)?;

        let current = template_string_info(line, cur, line_no, buffer as &dyn LineSource, false);
        let before = template_string_info(prev_line, cur, line_no, previous, false);
        if !current.within_backticks || current.in_template_string || !before.in_template_string {
            return None;
        }
        let (start, end) = current.backtick_positions?;

        let chars: Vec<char> = line.chars().collect();
        let region = QuoteRegion {
            line: line_no,
            start_col: start.column,
            end_col: end.column,
            delimiter: '`',
            end_delimiter: '`',
            content: chars.get(start.column + 1..end.column)?.iter().collect(),
        };
        let result = rewrite::to_quotes(&region, self.config.quote_type.ch());
        Some(Plan::new(result, Position::new(line_no, cur)))
    }

    /// Explicit command: wrap the quote-delimited attribute value at the
    /// position in braces.
    pub fn wrap_attribute_at<B: TextBufferMut>(
        &mut self,
        buffer: &mut B,
        position: Position,
    ) -> Outcome {
        let Some(plan) = self.plan_attribute_wrap(&*buffer, position) else {
            return Outcome::NoAction;
        };
        let outcome = apply_plan(buffer, plan);
        self.finish(buffer, outcome)
    }

    /// Explicit command: unwrap a brace-delimited attribute value back to
    /// quotes. Values still carrying an interpolation are left alone.
    pub fn unwrap_attribute_at<B: TextBufferMut>(
        &mut self,
        buffer: &mut B,
        position: Position,
    ) -> Outcome {
        let Some(plan) = self.plan_attribute_unwrap(&*buffer, position) else {
            return Outcome::NoAction;
        };
        let outcome = apply_plan(buffer, plan);
        self.finish(buffer, outcome)
    }

    fn plan_attribute_wrap<B: TextBufferMut>(&self, buffer: &B, position: Position) -> Option<Plan> {
        let line = buffer.line(position.line)?.into_owned();
        let attr = markup::find_attribute_at(&line, position.line, position.column)?;
        if !attr.quote_delimited() {
            return None;
        }
        let result = rewrite::wrap_attribute_in_braces(&attr, &line).ok()?;
        Some(Plan::new(result, position))
    }

    fn plan_attribute_unwrap<B: TextBufferMut>(
        &self,
        buffer: &B,
        position: Position,
    ) -> Option<Plan> {
        let line = buffer.line(position.line)?.into_owned();
        let attr = markup::find_attribute_at(&line, position.line, position.column)?;
        if !attr.brace_delimited || attr.has_interpolation {
            return None;
        }
        let result =
            rewrite::unwrap_attribute_braces(&attr, &line, self.config.quote_type.ch()).ok()?;
        Some(Plan::new(result, position))
    }
}

fn apply_plan<B: TextBufferMut>(buffer: &mut B, plan: Plan) -> Outcome {
    if let Err(e) = buffer.apply_edits(&plan.result.replacements) {
        tracing::warn!("rewrite rejected: {e}");
        return Outcome::NoAction;
    }
    if let Some(extra) = plan.follow_up {
        if let Err(e) = buffer.apply_edits(&[extra]) {
            tracing::warn!("follow-up insertion rejected: {e}");
        }
    }
    Outcome::Rewritten {
        cursor: plan.cursor,
    }
}
