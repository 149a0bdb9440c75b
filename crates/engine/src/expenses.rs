//! The expense manager component.
//!
//! Operates only while the session holds a user: collects a new record,
//! keeps the owner's records in memory, supports a staged edit draft
//! and optimistic delete, and derives the dashboard aggregates.

use api_types::{
    Category,
    expense::{ExpenseFields, ExpensePatch, ExpenseRecord},
};
use chrono::{DateTime, Utc};

use crate::{
    error::EngineError, gateway::RecordStore, money::MoneyCents, session::Session,
};

/// Category filter for the list view. `All` is the sentinel that
/// disables filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.as_str(),
        }
    }

    /// Cycles All -> Food -> ... -> Others -> All.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Category::ALL[0]),
            Self::Only(category) => {
                let pos = Category::ALL
                    .iter()
                    .position(|c| *c == category)
                    .unwrap_or(0);
                match Category::ALL.get(pos + 1) {
                    Some(next) => Self::Only(*next),
                    None => Self::All,
                }
            }
        }
    }
}

/// A staged copy of a record being edited. Mutating the draft never
/// touches the store; only [`ExpenseManager::update_expense`] does.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub id: String,
    pub amount_input: String,
    pub category: Category,
    pub description: String,
    pub amount_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ExpenseState {
    pub amount_input: String,
    pub description_input: String,
    pub category_input: Category,
    /// Set when the amount input cannot be parsed; cleared on edit.
    pub amount_error: Option<String>,
    /// The owner's records as last fetched, in store order.
    pub expenses: Vec<ExpenseRecord>,
    /// An edit session is open iff a draft is staged.
    pub editing: Option<ExpenseDraft>,
    pub filter: CategoryFilter,
}

pub struct ExpenseManager<S> {
    store: S,
    session: Session,
    pub state: ExpenseState,
}

impl<S: RecordStore> ExpenseManager<S> {
    pub fn new(store: S, session: Session) -> Self {
        Self {
            store,
            session,
            state: ExpenseState::default(),
        }
    }

    /// Creates a record from the three inputs, resets them to defaults
    /// and refreshes the list. No-op without a current user or with an
    /// empty amount; an unparseable amount sets a field error instead
    /// of calling the store.
    pub async fn add_expense(&mut self) -> Result<(), EngineError> {
        let Some(user) = self.session.current_user() else {
            return Ok(());
        };
        if self.state.amount_input.is_empty() {
            return Ok(());
        }
        let amount = match self.state.amount_input.parse::<MoneyCents>() {
            Ok(amount) => amount,
            Err(err) => {
                self.state.amount_error = Some(err.to_string());
                return Ok(());
            }
        };
        self.state.amount_error = None;

        let fields = ExpenseFields {
            owner: user.id,
            amount_cents: amount.cents(),
            category: self.state.category_input,
            description: self.state.description_input.clone(),
            created_at: Utc::now(),
        };
        self.store.create(fields).await?;

        self.state.amount_input.clear();
        self.state.description_input.clear();
        self.state.category_input = Category::default();

        self.fetch_expenses().await
    }

    /// Replaces the in-memory list with the store's answer for the
    /// current owner. No-op without a current user.
    pub async fn fetch_expenses(&mut self) -> Result<(), EngineError> {
        let Some(user) = self.session.current_user() else {
            return Ok(());
        };
        self.state.expenses = self.store.list_for_owner(&user.id).await?;
        Ok(())
    }

    /// Issues one delete, then removes the record locally by id. No
    /// re-fetch; on store failure the list stays untouched.
    pub async fn delete_expense(&mut self, id: &str) -> Result<(), EngineError> {
        self.store.delete(id).await?;
        self.state.expenses.retain(|record| record.id != id);
        Ok(())
    }

    /// Stages a copy of the record for editing. No store call.
    pub fn start_editing(&mut self, record: &ExpenseRecord) {
        self.state.editing = Some(ExpenseDraft {
            id: record.id.clone(),
            amount_input: MoneyCents::new(record.fields.amount_cents).to_decimal_string(),
            category: record.fields.category,
            description: record.fields.description.clone(),
            amount_error: None,
        });
    }

    /// Drops the staged draft without touching the store.
    pub fn cancel_editing(&mut self) {
        self.state.editing = None;
    }

    /// Issues one update with the staged draft, clears it and refreshes
    /// the full list. No-op without a draft; an unparseable amount sets
    /// the draft's field error instead of calling the store.
    pub async fn update_expense(&mut self) -> Result<(), EngineError> {
        let Some(draft) = self.state.editing.clone() else {
            return Ok(());
        };
        let amount = match draft.amount_input.parse::<MoneyCents>() {
            Ok(amount) => amount,
            Err(err) => {
                if let Some(staged) = self.state.editing.as_mut() {
                    staged.amount_error = Some(err.to_string());
                }
                return Ok(());
            }
        };

        let patch = ExpensePatch {
            amount_cents: amount.cents(),
            category: draft.category,
            description: draft.description,
        };
        self.store.update(&draft.id, patch).await?;
        self.state.editing = None;

        self.fetch_expenses().await
    }

    /// The list as the table shows it: filtered by category unless the
    /// filter is `All`. Store order is preserved.
    #[must_use]
    pub fn filtered(&self) -> Vec<&ExpenseRecord> {
        match self.state.filter {
            CategoryFilter::All => self.state.expenses.iter().collect(),
            CategoryFilter::Only(category) => self
                .state
                .expenses
                .iter()
                .filter(|record| record.fields.category == category)
                .collect(),
        }
    }

    /// Sum over the unfiltered list; the category filter never affects
    /// the total.
    #[must_use]
    pub fn total(&self) -> MoneyCents {
        MoneyCents::new(
            self.state
                .expenses
                .iter()
                .map(|record| record.fields.amount_cents)
                .sum(),
        )
    }

    /// Unfiltered record count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.expenses.len()
    }

    /// Timestamp of the record at index 0. The store does not guarantee
    /// chronological order, so this is "most recent" only insofar as
    /// the store returns it first.
    #[must_use]
    pub fn last_expense_date(&self) -> Option<DateTime<Utc>> {
        self.state
            .expenses
            .first()
            .map(|record| record.fields.created_at)
    }
}
