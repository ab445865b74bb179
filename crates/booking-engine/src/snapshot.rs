//! Local copies of store collections and how they are reconciled.
//!
//! A snapshot is replaced wholesale after a refetch and patched by id after a
//! successful create, update or delete. Nothing orders a patch against a
//! refetch that is already in flight: whichever is applied last wins.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::model::{Meeting, Room};
use crate::validate;

/// Anything the store identifies by a string id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Meeting {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Room {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An ordered local copy of a store collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    items: Vec<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Identified> Snapshot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh fetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Insert `item`, or replace the element with the same id in place.
    ///
    /// Returns `true` when an existing element was replaced.
    pub fn upsert(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => {
                self.items.push(item);
                false
            }
        }
    }

    /// Remove and return the element with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let idx = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Snapshot<Meeting> {
    /// Meetings ordered by start time; ties keep snapshot order.
    pub fn sorted_by_start(&self) -> Vec<&Meeting> {
        let mut sorted: Vec<&Meeting> = self.items.iter().collect();
        sorted.sort_by_key(|m| m.start_time);
        sorted
    }

    pub fn has_active_booking(&self, now: DateTime<Utc>) -> bool {
        validate::has_active_booking(&self.items, now)
    }

    /// Meetings starting on `day` as seen in `tz`, ordered by start time.
    pub fn on_day(&self, day: NaiveDate, tz: Tz) -> Vec<&Meeting> {
        self.sorted_by_start()
            .into_iter()
            .filter(|m| m.start_time.with_timezone(&tz).date_naive() == day)
            .collect()
    }

    /// The next `limit` meetings that start after `now`.
    pub fn upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<&Meeting> {
        self.sorted_by_start()
            .into_iter()
            .filter(|m| validate::is_active(m, now))
            .take(limit)
            .collect()
    }

    /// Meetings of one room, in snapshot order.
    pub fn for_room(&self, room_id: &str) -> Vec<Meeting> {
        self.items
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect()
    }
}
