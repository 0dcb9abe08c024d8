//! Message reading and bundle assembly
//!
//! `MessageReader` turns a text stream into a [`ParsedMessage`];
//! `MessageService` feeds the records through the label tables into a
//! [`BundleBuilder`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Cursor};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::BundleBuilder;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::tokenizer::{parse_header_record, parse_record};
use crate::domain::{
    Customer, DomainError, OrderBundle, ParsedMessage, Record, SeparatorSpec, SeparatorState,
};
use crate::infrastructure::traits::{Repository, SegmentMapping};

/// Reads messages of one format, described by its [`SeparatorSpec`].
#[derive(Debug, Clone, Default)]
pub struct MessageReader {
    spec: SeparatorSpec,
}

impl MessageReader {
    pub fn new(spec: SeparatorSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &SeparatorSpec {
        &self.spec
    }

    /// Parse a complete message from `reader`.
    ///
    /// The first line is the header: it declares the separators and is also
    /// returned as the first record.
    pub fn read_text<R: BufRead>(&self, reader: R) -> ApplicationResult<ParsedMessage> {
        let mut lines = Lines::new(reader);

        let header = lines.next_line()?.ok_or(DomainError::MissingHeader)?;
        let state = SeparatorState::from_header(&self.spec, &header)?;
        debug!(special_chars = %state.special_chars(), "separators resolved");

        let mut message = ParsedMessage::default();
        message.push(parse_header_record(&state, &header));
        while let Some(line) = lines.next_line()? {
            message.push(parse_record(&state, &line));
        }

        debug!(records = message.len(), "message read");
        Ok(message)
    }

    pub fn read_str(&self, text: &str) -> ApplicationResult<ParsedMessage> {
        self.read_text(Cursor::new(text))
    }
}

/// Line splitter accepting `\n`, `\r\n` and a lone `\r` as terminators.
struct Lines<R> {
    reader: R,
    pending: VecDeque<String>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            line_number: 0,
            done: false,
        }
    }

    fn next_line(&mut self) -> ApplicationResult<Option<String>> {
        while self.pending.is_empty() && !self.done {
            self.fill()?;
        }
        let line = self.pending.pop_front();
        if line.is_some() {
            self.line_number += 1;
        }
        Ok(line)
    }

    fn fill(&mut self) -> ApplicationResult<()> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .with_line_context("read message", self.line_number + 1)?;
        if read == 0 {
            self.done = true;
            return Ok(());
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        let chunk = String::from_utf8(buf).map_err(|e| ApplicationError::OperationFailed {
            context: format!("read message: line {}", self.line_number + 1),
            source: Box::new(io::Error::new(io::ErrorKind::InvalidData, e)),
        })?;
        self.pending.extend(chunk.split('\r').map(str::to_string));
        Ok(())
    }
}

/// Parses messages into order bundles.
pub struct MessageService {
    reader: MessageReader,
    mapping: Arc<dyn SegmentMapping>,
    customers: Arc<dyn Repository<Customer>>,
}

impl MessageService {
    pub fn new(
        reader: MessageReader,
        mapping: Arc<dyn SegmentMapping>,
        customers: Arc<dyn Repository<Customer>>,
    ) -> Self {
        Self {
            reader,
            mapping,
            customers,
        }
    }

    pub fn reader(&self) -> &MessageReader {
        &self.reader
    }

    #[instrument(level = "debug", skip_all)]
    pub fn parse_bundle<R: BufRead>(&self, reader: R) -> ApplicationResult<OrderBundle> {
        let message = self.reader.read_text(reader)?;
        self.build_bundle(&message)
    }

    pub fn parse_bundle_str(&self, text: &str) -> ApplicationResult<OrderBundle> {
        self.parse_bundle(Cursor::new(text))
    }

    /// Run every record of an already parsed message through the builder.
    pub fn build_bundle(&self, message: &ParsedMessage) -> ApplicationResult<OrderBundle> {
        let mut builder = BundleBuilder::new(self.customers.clone());
        for record in message {
            self.apply_record(&mut builder, record)?;
        }
        builder.build()
    }

    fn apply_record(&self, builder: &mut BundleBuilder, record: &Record) -> ApplicationResult<()> {
        let segment = self.mapping.resolve_segment(record.label())?;
        builder.new_segment(segment)?;

        for rule in self.mapping.field_actions_for(record.label()) {
            let value = record
                .value_at(rule.field_index, rule.subfield_index, 0)
                .map_err(|e| match e {
                    DomainError::FieldIndexOutOfRange { .. }
                    | DomainError::SubfieldIndexOutOfRange { .. }
                    | DomainError::NoValue => DomainError::FieldHasNoValue {
                        label: record.label().to_string(),
                        field_index: rule.field_index,
                        subfield_index: rule.subfield_index,
                    },
                    other => other,
                })?;
            builder.set_field(rule.action, value)?;
        }
        Ok(())
    }
}
