// ── Per-item reports ──
//
// Every inventory item a step touches ends as one `ItemReport`. Steps
// return these instead of printing, so callers decide how to render them
// and tests can assert on the aggregate.

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    HostGroup,
    Host,
}

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Already present remotely; nothing sent.
    Existing { id: String },
    /// Created by this run.
    Created { id: String },
    /// Interface swapped for one of the target type.
    Replaced {
        old_id: String,
        new_id: String,
        address: String,
    },
    /// Dry run: this change would be made.
    Planned { detail: String },
    /// Already in the desired state.
    Unchanged { detail: String },
    /// Not attempted.
    Skipped { reason: String },
    /// Attempted and rejected; the run moved on.
    Failed { reason: String },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Existing { .. } => "exists",
            Self::Created { .. } => "created",
            Self::Replaced { .. } => "replaced",
            Self::Planned { .. } => "planned",
            Self::Unchanged { .. } => "unchanged",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    /// Remote id the item ended with, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Existing { id } | Self::Created { id } => Some(id),
            Self::Replaced { new_id, .. } => Some(new_id),
            _ => None,
        }
    }

    /// Human-readable detail for progress lines and tables.
    pub fn detail(&self) -> String {
        match self {
            Self::Existing { id } | Self::Created { id } => id.clone(),
            Self::Replaced {
                old_id,
                new_id,
                address,
            } => format!("{address} (interface {old_id} -> {new_id})"),
            Self::Planned { detail } | Self::Unchanged { detail } => detail.clone(),
            Self::Skipped { reason } | Self::Failed { reason } => reason.clone(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the run changed remote state for this item.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Replaced { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub kind: EntityKind,
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ItemReport {
    pub fn new(kind: EntityKind, name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome,
        }
    }
}

/// Ordered outcomes of one pipeline step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepReport {
    items: Vec<ItemReport>,
}

impl StepReport {
    pub fn push(&mut self, item: ItemReport) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ItemReport] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_failure()).count()
    }

    pub fn changes(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_change()).count()
    }

    /// Report for the item named `name`, if the step touched it.
    pub fn get(&self, name: &str) -> Option<&ItemReport> {
        self.items.iter().find(|i| i.name == name)
    }
}
