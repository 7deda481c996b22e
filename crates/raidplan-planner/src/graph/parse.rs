use raidplan_core::{Encounter, EventId, EventInfo};
use serde_json::{Map, Value};
use smallvec::smallvec;
use std::collections::BTreeMap;

use crate::graph::model::{NodeSet, TimelineGraph, ROOT};

pub const MAX_BRANCH_DEPTH: u32 = 64;
/// Latest accepted event time, in seconds (one day).
pub const MAX_EVENT_TIME: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{path}: expected an array of events and branches")]
    NotASequence { path: String },
    #[error("{path}: expected an event object or a nested branch")]
    InvalidElement { path: String },
    #[error("{path}: event has no numeric `time`")]
    MissingTime { path: String },
    #[error("{path}: time must be finite and non-negative, got {time}")]
    InvalidTime { path: String, time: f64 },
    #[error("{path}: time {time} is past the {max}s limit")]
    TimeOutOfRange { path: String, time: f64, max: f64 },
    #[error("{path}: event has no `id` or `name`")]
    MissingId { path: String },
    #[error("{path}: branch is empty")]
    EmptyBranch { path: String },
    #[error("{path}: branches nested deeper than {max}")]
    TooDeep { path: String, max: u32 },
    #[error("{path}: unknown event `{id}`")]
    UnknownEvent { path: String, id: String },
}

impl ValidationError {
    pub fn path(&self) -> &str {
        match self {
            Self::NotASequence { path }
            | Self::InvalidElement { path }
            | Self::MissingTime { path }
            | Self::InvalidTime { path, .. }
            | Self::TimeOutOfRange { path, .. }
            | Self::MissingId { path }
            | Self::EmptyBranch { path }
            | Self::TooDeep { path, .. }
            | Self::UnknownEvent { path, .. } => path,
        }
    }
}

/// Builds the event DAG from the nested timeline description.
///
/// A sequence is chronological; a nested sequence inside it is a parallel
/// branch forking from the last event before it. The next plain event after
/// one or more branches joins all of their open ends.
pub struct TimelineParser<'a> {
    known_events: Option<&'a BTreeMap<String, EventInfo>>,
    graph: TimelineGraph,
}

impl<'a> TimelineParser<'a> {
    pub fn new() -> Self {
        Self {
            known_events: None,
            graph: TimelineGraph::new(),
        }
    }

    /// Reject events whose key is missing from `events`.
    pub fn with_known_events(mut self, events: &'a BTreeMap<String, EventInfo>) -> Self {
        self.known_events = Some(events);
        self
    }

    pub fn parse(mut self, raw: &Value) -> Result<TimelineGraph, ValidationError> {
        let path = "timeline";
        let Value::Array(items) = raw else {
            return Err(ValidationError::NotASequence {
                path: path.to_string(),
            });
        };
        self.descend(items, smallvec![ROOT], 0, path)?;
        tracing::debug!(events = self.graph.len(), "timeline parsed");
        Ok(self.graph)
    }

    // Returns the open ends of this level: the branch terminals still waiting
    // for a joining event, or the last event created here.
    fn descend(
        &mut self,
        items: &[Value],
        mut previous: NodeSet,
        depth: u32,
        path: &str,
    ) -> Result<NodeSet, ValidationError> {
        let mut precurse = NodeSet::new();
        let mut last = None;

        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{i}]");
            match item {
                Value::Array(branch) => {
                    if branch.is_empty() {
                        return Err(ValidationError::EmptyBranch { path: item_path });
                    }
                    if depth + 1 > MAX_BRANCH_DEPTH {
                        return Err(ValidationError::TooDeep {
                            path: item_path,
                            max: MAX_BRANCH_DEPTH,
                        });
                    }
                    let open = self.descend(branch, previous.clone(), depth + 1, &item_path)?;
                    precurse.extend(open);
                }
                Value::Object(fields) => {
                    let (id, info, time) = self.leaf(fields, &item_path)?;
                    let parents = if precurse.is_empty() {
                        previous.clone()
                    } else {
                        std::mem::take(&mut precurse)
                    };
                    let idx = self.graph.push_event(id, info, time, depth, &parents);
                    previous = smallvec![idx];
                    last = Some(idx);
                }
                _ => return Err(ValidationError::InvalidElement { path: item_path }),
            }
        }

        if precurse.is_empty() {
            Ok(last.into_iter().collect())
        } else {
            Ok(precurse)
        }
    }

    fn leaf(
        &self,
        fields: &Map<String, Value>,
        path: &str,
    ) -> Result<(EventId, Option<String>, f64), ValidationError> {
        let time = fields
            .get("time")
            .and_then(Value::as_f64)
            .ok_or_else(|| ValidationError::MissingTime {
                path: path.to_string(),
            })?;
        if !time.is_finite() || time < 0.0 {
            return Err(ValidationError::InvalidTime {
                path: path.to_string(),
                time,
            });
        }
        if time > MAX_EVENT_TIME {
            return Err(ValidationError::TimeOutOfRange {
                path: path.to_string(),
                time,
                max: MAX_EVENT_TIME,
            });
        }
        // -0.0 must share collision buckets with 0.0
        let time = time + 0.0;

        let id = fields
            .get("id")
            .or_else(|| fields.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::MissingId {
                path: path.to_string(),
            })?;
        if let Some(known) = self.known_events {
            if !known.contains_key(id) {
                return Err(ValidationError::UnknownEvent {
                    path: path.to_string(),
                    id: id.to_string(),
                });
            }
        }

        let info = fields
            .get("info")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok((EventId(id.to_string()), info, time))
    }
}

impl Default for TimelineParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse(raw: &Value) -> Result<TimelineGraph, ValidationError> {
    TimelineParser::new().parse(raw)
}

/// Parses the encounter timeline; event keys are checked against the
/// encounter's event table when it has one.
pub fn parse_encounter(enc: &Encounter) -> Result<TimelineGraph, ValidationError> {
    let parser = TimelineParser::new();
    let parser = if enc.events.is_empty() {
        parser
    } else {
        parser.with_known_events(&enc.events)
    };
    parser.parse(&enc.timeline)
}
