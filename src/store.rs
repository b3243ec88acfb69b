use std::collections::HashSet;

use crate::errors::TrackerError;
use crate::expenses::{Expense, ExpenseId, ExpenseInput, ExpenseStatus};
use crate::storage::SnapshotStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(ExpenseId),
    Updated(ExpenseId),
    Deleted(ExpenseId),
    Confirmed(ExpenseId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&StoreEvent, &[Expense])>;

/// Owns the canonical expense collection.
///
/// Every mutation that changes something is written through to the storage
/// backend as a full snapshot and then announced to subscribers, who receive
/// the new snapshot. Mutations that change nothing (unknown id, already
/// confirmed, ...) neither persist nor notify and report `false`.
pub struct ExpenseStore<S> {
    records: Vec<Expense>,
    storage: S,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl<S: SnapshotStorage> ExpenseStore<S> {
    pub fn open(storage: S) -> Self {
        let mut records = storage.load();
        let mut seen = HashSet::new();
        let loaded = records.len();
        records.retain(|expense| seen.insert(expense.id));
        if records.len() != loaded {
            tracing::warn!(
                "dropped {} stored expenses with duplicate ids",
                loaded - records.len()
            );
        }
        Self {
            records,
            storage,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.records.iter().find(|expense| expense.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&StoreEvent, &[Expense]) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(subscription, _)| *subscription != id);
    }

    /// Adds a new draft in front of the existing expenses.
    pub fn create(&mut self, input: ExpenseInput) -> Result<Expense, TrackerError> {
        let expense = Expense::draft(input);
        tracing::debug!("creating expense {}", expense.id);
        self.records.insert(0, expense.clone());
        self.commit(StoreEvent::Created(expense.id))?;
        Ok(expense)
    }

    /// Replaces the editable fields of a draft. Confirmed expenses are frozen.
    pub fn update(&mut self, id: ExpenseId, input: ExpenseInput) -> Result<bool, TrackerError> {
        let Some(expense) = self.records.iter_mut().find(|expense| expense.id == id) else {
            tracing::debug!("update of unknown expense {id} ignored");
            return Ok(false);
        };
        if !expense.is_draft() {
            tracing::debug!("update of confirmed expense {id} ignored");
            return Ok(false);
        }
        expense.apply(input);
        self.commit(StoreEvent::Updated(id))?;
        Ok(true)
    }

    pub fn delete(&mut self, id: ExpenseId) -> Result<bool, TrackerError> {
        let Some(index) = self.records.iter().position(|expense| expense.id == id) else {
            tracing::debug!("delete of unknown expense {id} ignored");
            return Ok(false);
        };
        self.records.remove(index);
        self.commit(StoreEvent::Deleted(id))?;
        Ok(true)
    }

    pub fn confirm(&mut self, id: ExpenseId) -> Result<bool, TrackerError> {
        match self.records.iter_mut().find(|expense| expense.id == id) {
            Some(expense) if expense.is_draft() => {
                expense.status = ExpenseStatus::Confirmed;
            }
            Some(_) => return Ok(false),
            None => {
                tracing::debug!("confirm of unknown expense {id} ignored");
                return Ok(false);
            }
        }
        self.commit(StoreEvent::Confirmed(id))?;
        Ok(true)
    }

    /// The in-memory collection stays canonical: subscribers hear about the
    /// change even when the snapshot could not be written, and the write
    /// error is handed back afterwards.
    fn commit(&mut self, event: StoreEvent) -> Result<(), TrackerError> {
        let saved = self.storage.save(&self.records);
        if let Err(err) = &saved {
            tracing::warn!(?event, "expense snapshot not saved: {err}");
        }
        tracing::debug!(?event, "expense store changed");
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event, &self.records);
        }
        saved
    }
}
