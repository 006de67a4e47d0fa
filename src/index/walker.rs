//! Depth-first walk over the part tree that fills the document.
//!
//! Numbering: every leaf gets `part-<depth>.<rank>`. The depth grows by one
//! when a leaf is the first node visited after its multipart or embedded
//! message parent, and the rank restarts at 1 there. Depth never goes back
//! down when the walk leaves a nested level, so later siblings of a deep
//! subtree keep the deeper number.
//!
//! Inside `multipart/alternative`, each leaf removes the entry emitted just
//! before it, so only the last (preferred) rendering stays in the document.

use tracing::{debug, warn};

use crate::index::classify::{classify, Classification};
use crate::index::normalize::{lossy_text, normalize, source_charset};
use crate::model::document::{Document, PartEntry, PartId};
use crate::model::part::{Part, PartBody, PartKind};

/// One step of the walk, reported to a [`DiagnosticSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A node was reached from `parent` (content-type labels).
    Visit {
        depth: u32,
        parent: String,
        part: String,
        kind: PartKind,
    },
    /// A leaf received its identifier.
    Assigned(PartId),
    /// A previous alternative was dropped from the document.
    Replaced(PartId),
    /// A leaf was numbered but not indexed.
    Skipped { id: PartId, content_type: String },
    /// A text part kept its raw octets because its charset is unsupported.
    CharsetFallback { id: PartId, charset: String },
}

/// Receiver for walk diagnostics.
pub trait DiagnosticSink {
    fn record(&mut self, event: TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::Visit {
                depth,
                parent,
                part,
                kind,
            } => debug!(depth, %parent, %part, ?kind, "found part"),
            TraceEvent::Assigned(id) => debug!(id = %id, "assigned id"),
            TraceEvent::Replaced(id) => debug!(replaced = %id, "alternative replaces previous entry"),
            TraceEvent::Skipped { id, content_type } => {
                debug!(id = %id, %content_type, "not indexable, skipped")
            }
            TraceEvent::CharsetFallback { id, charset } => {
                debug!(id = %id, %charset, "charset fallback to raw octets")
            }
        }
    }
}

/// Collects events, mostly for tests.
impl DiagnosticSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn record(&mut self, event: TraceEvent) {
        (**self).record(event);
    }
}

/// Numbering and replacement bookkeeping for one message.
#[derive(Debug, Default, Clone)]
pub struct TraversalState<'p> {
    /// Current nesting depth.
    pub depth: u32,
    /// Number of leaves numbered so far at this depth.
    pub rank: u32,
    /// Variant of the node visited last.
    pub last_kind: Option<PartKind>,
    /// Identifier assigned to the most recent leaf.
    pub last_entry: Option<PartId>,
    last_part: Option<&'p Part>,
}

impl<'p> TraversalState<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note `part` as the last visited node.
    pub fn record_visit(&mut self, part: &'p Part) {
        self.last_part = Some(part);
        self.last_kind = Some(part.kind());
    }

    /// `true` when the node visited just before is `parent` itself and
    /// `parent` opens a nesting level.
    pub fn enters_level(&self, parent: Option<&Part>) -> bool {
        match (parent, self.last_part) {
            (Some(parent), Some(last)) => parent.is_nesting() && std::ptr::eq(parent, last),
            _ => false,
        }
    }

    /// Step into a new nesting level.
    pub fn descend(&mut self) {
        self.depth += 1;
        self.rank = 0;
    }

    /// Hand out the next identifier at the current depth.
    pub fn next_id(&mut self) -> PartId {
        self.rank += 1;
        PartId::new(self.depth, self.rank)
    }
}

/// Walks a part tree into a [`Document`].
#[derive(Debug, Default)]
pub struct Walker<S = NoopSink> {
    sink: S,
}

impl Walker<NoopSink> {
    pub fn new() -> Self {
        Self { sink: NoopSink }
    }
}

impl<S: DiagnosticSink> Walker<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Walk a whole message from its root with fresh state.
    pub fn walk_message(&mut self, document: &mut Document, root: &Part) {
        let mut state = TraversalState::new();
        self.walk(document, root, None, &mut state);
    }

    /// Visit `part` (whose parent is `parent`) and everything below it.
    pub fn walk<'p>(
        &mut self,
        document: &mut Document,
        part: &'p Part,
        parent: Option<&'p Part>,
        state: &mut TraversalState<'p>,
    ) {
        self.sink.record(TraceEvent::Visit {
            depth: state.depth,
            parent: parent.map_or_else(|| "null".to_string(), Part::content_type_label),
            part: part.content_type_label(),
            kind: part.kind(),
        });

        match &part.body {
            PartBody::Container(inner) => {
                // The embedded message is numbered as part of this one.
                state.record_visit(part);
                self.walk(document, inner, Some(part), state);
            }
            PartBody::Leaf(octets) => self.visit_leaf(document, part, octets, parent, state),
            PartBody::Partial | PartBody::Multipart(_) | PartBody::Unknown => {}
        }

        state.record_visit(part);

        if let PartBody::Multipart(children) = &part.body {
            for child in children {
                self.walk(document, child, Some(part), state);
            }
        }
    }

    fn visit_leaf<'p>(
        &mut self,
        document: &mut Document,
        part: &'p Part,
        octets: &[u8],
        parent: Option<&'p Part>,
        state: &mut TraversalState<'p>,
    ) {
        if state.enters_level(parent) {
            state.descend();
        } else if parent.is_some_and(|p| p.is_nesting() && p.is_alternative()) {
            if let Some(previous) = state.last_entry {
                if document.remove_part(previous).is_some() {
                    self.sink.record(TraceEvent::Replaced(previous));
                }
            }
        }

        let id = state.next_id();
        state.last_entry = Some(id);
        self.sink.record(TraceEvent::Assigned(id));

        let Classification {
            indexable,
            content_type,
        } = classify(part.content_type.as_ref(), part.filename.as_deref());

        let Some(content_type) = content_type.filter(|_| indexable) else {
            self.sink.record(TraceEvent::Skipped {
                id,
                content_type: part.content_type_label(),
            });
            return;
        };

        let body = match normalize(octets, Some(&content_type)) {
            Ok(body) => body,
            Err(err) => {
                let charset = source_charset(&content_type).to_string();
                warn!(part = %id, error = %err, "Keeping raw octets for undecodable text part");
                self.sink.record(TraceEvent::CharsetFallback { id, charset });
                lossy_text(octets)
            }
        };

        document.insert_part(
            id,
            PartEntry {
                content_type: content_type.to_string(),
                filename: part.filename.clone(),
                body,
            },
        );
    }
}
