//! Output slots and the rendering target
//!
//! A slot is one named element of the dashboard page. Updaters never look
//! elements up themselves; they write into a [`RenderTarget`] by slot.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use super::html;

/// Named output targets of the dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    TotalRooms,
    TotalPeople,
    RoomsStatus,
    ActiveVisitsList,
    /// Counter of active visits
    ActiveVisitsCount,
    /// Body rows of the movements table
    MovementsTable,
    /// Body rows of the group movements table
    GroupMovementsTable,
    LastUpdate,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::TotalRooms,
        Slot::TotalPeople,
        Slot::RoomsStatus,
        Slot::ActiveVisitsList,
        Slot::ActiveVisitsCount,
        Slot::MovementsTable,
        Slot::GroupMovementsTable,
        Slot::LastUpdate,
    ];

    /// Element id on the page
    pub fn id(self) -> &'static str {
        match self {
            Slot::TotalRooms => "total-rooms",
            Slot::TotalPeople => "total-people",
            Slot::RoomsStatus => "rooms-status",
            Slot::ActiveVisitsList => "active-visits-list",
            Slot::ActiveVisitsCount => "active-visits",
            Slot::MovementsTable => "movements-table",
            Slot::GroupMovementsTable => "group-movements-table",
            Slot::LastUpdate => "last-update",
        }
    }

    pub fn from_id(id: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.id() == id)
    }

    /// Content shown before the first successful update
    pub fn initial(self) -> SlotContent {
        match self {
            Slot::TotalRooms | Slot::TotalPeople | Slot::ActiveVisitsCount => {
                SlotContent::Text("0".to_string())
            }
            Slot::LastUpdate => SlotContent::Text("--:--:--".to_string()),
            Slot::RoomsStatus | Slot::ActiveVisitsList => {
                SlotContent::Html(r#"<div class="loading">Загрузка...</div>"#.to_string())
            }
            Slot::MovementsTable => SlotContent::Html(
                r#"<tr><td colspan="4" class="loading">Загрузка...</td></tr>"#.to_string(),
            ),
            Slot::GroupMovementsTable => SlotContent::Html(
                r#"<tr><td colspan="5" class="loading">Загрузка...</td></tr>"#.to_string(),
            ),
        }
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Content of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum SlotContent {
    /// Plain text, escaped when placed on the page
    Text(String),
    /// Markup fragment, placed as-is
    Html(String),
}

impl SlotContent {
    /// Raw content as written
    pub fn as_str(&self) -> &str {
        match self {
            SlotContent::Text(text) | SlotContent::Html(text) => text,
        }
    }

    /// Content ready to embed in the page
    pub fn to_html(&self) -> Cow<'_, str> {
        match self {
            SlotContent::Text(text) => html::escape(text),
            SlotContent::Html(markup) => Cow::Borrowed(markup),
        }
    }
}

/// Where updaters write their output
pub trait RenderTarget: Send + Sync {
    /// Replace a slot with plain text
    fn set_text(&self, slot: Slot, text: String);

    /// Replace a slot with a markup fragment
    fn set_html(&self, slot: Slot, html: String);
}

/// In-memory dashboard page.
///
/// Shared between the updaters, which write it, and the HTTP server,
/// which reads it.
#[derive(Debug)]
pub struct Page {
    slots: RwLock<BTreeMap<Slot, SlotContent>>,
}

impl Page {
    /// Create a page with every slot at its initial content
    pub fn new() -> Self {
        let slots = Slot::ALL
            .into_iter()
            .map(|slot| (slot, slot.initial()))
            .collect();

        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Current content of a slot
    pub fn get(&self, slot: Slot) -> SlotContent {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&slot)
            .cloned()
            .unwrap_or_else(|| slot.initial())
    }

    /// Convenience accessor for the raw text of a slot
    pub fn text(&self, slot: Slot) -> String {
        self.get(slot).as_str().to_string()
    }

    /// Every slot in page order
    pub fn snapshot(&self) -> Vec<(Slot, SlotContent)> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .map(|(slot, content)| (*slot, content.clone()))
            .collect()
    }

    fn set(&self, slot: Slot, content: SlotContent) {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot, content);
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTarget for Page {
    fn set_text(&self, slot: Slot, text: String) {
        self.set(slot, SlotContent::Text(text));
    }

    fn set_html(&self, slot: Slot, html: String) {
        self.set(slot, SlotContent::Html(html));
    }
}
