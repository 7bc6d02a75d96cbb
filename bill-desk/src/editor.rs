//! Extra-dish editor
//!
//! Holds the dishes a waiter adds to a bill before it is finalized. Extras
//! never touch the order itself; they are merged into the order lines only
//! when the bill is previewed or committed.

use crate::error::{BillingError, BillingResult};
use shared::{ExtraDish, Order, OrderLine, Product};

/// Dish being composed, not yet part of the extras list
#[derive(Debug, Clone, PartialEq)]
pub struct DishDraft {
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl DishDraft {
    fn validate(&self) -> BillingResult<()> {
        if self.name.trim().is_empty() {
            return Err(BillingError::EmptyDishName);
        }
        if self.quantity <= 0 {
            return Err(BillingError::InvalidQuantity(self.quantity));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(BillingError::InvalidPrice(self.unit_price));
        }
        Ok(())
    }

    fn into_extra(self) -> ExtraDish {
        ExtraDish::new(self.name.trim(), self.quantity, self.unit_price)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Idle,
    Composing(DishDraft),
}

#[derive(Debug, Clone, Default)]
pub struct ExtraDishEditor {
    state: EditorState,
    extras: Vec<ExtraDish>,
    preview_modified: bool,
}

impl ExtraDishEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn extras(&self) -> &[ExtraDish] {
        &self.extras
    }

    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }

    pub fn is_preview(&self) -> bool {
        self.preview_modified
    }

    /// Extras are pushed to the server only when they are being previewed
    pub fn has_pending_changes(&self) -> bool {
        self.preview_modified && self.has_extras()
    }

    // === Composing ===

    /// Start composing from a catalog product, quantity defaults to 1
    pub fn choose_dish(&mut self, product: &Product) {
        self.compose(product.name.clone(), product.price);
    }

    /// Start composing a free-form dish, replacing any draft in progress
    pub fn compose(&mut self, name: impl Into<String>, unit_price: f64) {
        self.state = EditorState::Composing(DishDraft {
            name: name.into(),
            quantity: 1,
            unit_price,
        });
    }

    pub fn set_quantity(&mut self, quantity: i32) -> BillingResult<()> {
        self.draft_mut()?.quantity = quantity;
        Ok(())
    }

    pub fn set_unit_price(&mut self, unit_price: f64) -> BillingResult<()> {
        self.draft_mut()?.unit_price = unit_price;
        Ok(())
    }

    /// Validate the draft and append it
    ///
    /// On error the draft stays in place so it can be corrected.
    pub fn confirm(&mut self) -> BillingResult<&ExtraDish> {
        let draft = match &self.state {
            EditorState::Composing(draft) => draft,
            EditorState::Idle => return Err(BillingError::NoDishSelected),
        };
        draft.validate()?;

        let EditorState::Composing(draft) = std::mem::take(&mut self.state) else {
            return Err(BillingError::NoDishSelected);
        };
        let extra = draft.into_extra();
        tracing::debug!(name = %extra.name, quantity = extra.quantity, "Extra dish added");
        self.extras.push(extra);
        self.last_extra()
    }

    /// Compose and confirm in one step
    pub fn add_extra(
        &mut self,
        name: impl Into<String>,
        quantity: i32,
        unit_price: f64,
    ) -> BillingResult<&ExtraDish> {
        let draft = DishDraft {
            name: name.into(),
            quantity,
            unit_price,
        };
        draft.validate()?;
        self.state = EditorState::Idle;
        self.extras.push(draft.into_extra());
        self.last_extra()
    }

    pub fn cancel(&mut self) {
        self.state = EditorState::Idle;
    }

    pub fn remove_extra(&mut self, index: usize) -> BillingResult<ExtraDish> {
        if index >= self.extras.len() {
            return Err(BillingError::ExtraIndexOutOfRange {
                index,
                len: self.extras.len(),
            });
        }
        Ok(self.extras.remove(index))
    }

    // === Preview ===

    pub fn set_preview(&mut self, on: bool) {
        self.preview_modified = on;
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview_modified = !self.preview_modified;
        self.preview_modified
    }

    // === Commit ===

    /// Order lines followed by every extra (product id 0)
    pub fn merged_lines(&self, order: &Order) -> Vec<OrderLine> {
        order
            .lines
            .iter()
            .cloned()
            .chain(self.extras.iter().map(ExtraDish::to_line))
            .collect()
    }

    /// Reset after a fully successful commit
    pub fn finish_commit(&mut self) {
        self.extras.clear();
        self.preview_modified = false;
        self.state = EditorState::Idle;
    }

    fn draft_mut(&mut self) -> BillingResult<&mut DishDraft> {
        match &mut self.state {
            EditorState::Composing(draft) => Ok(draft),
            EditorState::Idle => Err(BillingError::NoDishSelected),
        }
    }

    fn last_extra(&self) -> BillingResult<&ExtraDish> {
        self.extras.last().ok_or(BillingError::NoDishSelected)
    }
}
