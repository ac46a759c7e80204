//! Record store
//!
//! Owns the volunteers, events and hours collections and every rule that
//! spans them. Each mutation is read-whole-collection, check, write-whole-
//! collection, performed while holding that collection's lock. Locks are
//! per collection, so work on different collections runs in parallel.

use crate::fields::{optional_text, parse_capacity, parse_hours};
use crate::import::{self, VolunteerCandidate};
use crate::ports::CollectionBackend;
use crate::{split_full_name, Collection, Event, HoursEntry, Result, StoreError, Volunteer};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Raw event fields as received from a request
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub date: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<String>,
}

/// Raw hours fields as received from a request
#[derive(Debug, Clone, Default)]
pub struct NewHoursEntry {
    pub volunteer_email: String,
    pub event_id: Option<String>,
    pub hours: String,
    pub notes: Option<String>,
}

/// Fresh record identifier. UUID v7 stays unique regardless of clock
/// resolution and sorts roughly by creation time.
pub fn new_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

pub struct RecordStore {
    backend: Arc<dyn CollectionBackend>,
    volunteers_lock: Mutex<()>,
    events_lock: Mutex<()>,
    hours_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn CollectionBackend>) -> Self {
        Self {
            backend,
            volunteers_lock: Mutex::new(()),
            events_lock: Mutex::new(()),
            hours_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // Volunteers

    pub async fn create_volunteer(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Volunteer> {
        let email = email.trim();
        if email.is_empty() {
            return Err(StoreError::Validation("email is required".to_string()));
        }

        let _guard = self.lock(Collection::Volunteers).await;
        let mut volunteers: Vec<Volunteer> = self.load(Collection::Volunteers).await?;

        if volunteers.iter().any(|v| v.email == email) {
            warn!("Rejected duplicate volunteer email: {}", email);
            return Err(StoreError::Conflict(format!(
                "a volunteer with email {} already exists",
                email
            )));
        }

        let volunteer = Volunteer::new(
            new_record_id(),
            first_name.trim().to_string(),
            last_name.trim().to_string(),
            email.to_string(),
        );
        volunteers.push(volunteer.clone());
        self.save(Collection::Volunteers, &volunteers).await?;

        info!("Created volunteer {} <{}>", volunteer.id, volunteer.email);
        Ok(volunteer)
    }

    pub async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
        self.load(Collection::Volunteers).await
    }

    pub async fn find_volunteer_by_email(&self, email: &str) -> Result<Option<Volunteer>> {
        let volunteers: Vec<Volunteer> = self.load(Collection::Volunteers).await?;
        Ok(volunteers.into_iter().find(|v| v.email == email))
    }

    /// Parse raw import lines and insert the well-formed ones
    pub async fn bulk_import_volunteers<I, S>(&self, lines: I) -> Result<Vec<Volunteer>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates = import::parse_lines(lines);
        self.create_volunteers(candidates).await
    }

    /// Bulk create path: one read and at most one write for the whole batch.
    ///
    /// Candidates whose email is already stored, or repeats an earlier
    /// candidate in the same batch, are skipped rather than failing the batch.
    pub async fn create_volunteers(
        &self,
        candidates: Vec<VolunteerCandidate>,
    ) -> Result<Vec<Volunteer>> {
        let _guard = self.lock(Collection::Volunteers).await;
        let mut volunteers: Vec<Volunteer> = self.load(Collection::Volunteers).await?;

        let mut seen: HashSet<String> = volunteers.iter().map(|v| v.email.clone()).collect();
        let mut created = Vec::new();

        for candidate in candidates {
            if !seen.insert(candidate.email.clone()) {
                debug!("Skipping import of duplicate email {}", candidate.email);
                continue;
            }
            created.push(Volunteer::new(
                new_record_id(),
                candidate.first_name,
                candidate.last_name,
                candidate.email,
            ));
        }

        if created.is_empty() {
            return Ok(created);
        }

        volunteers.extend(created.iter().cloned());
        self.save(Collection::Volunteers, &volunteers).await?;

        info!("Imported {} volunteers", created.len());
        Ok(created)
    }

    // Events

    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let title = new_event.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title is required".to_string()));
        }

        let event = Event::new(
            new_record_id(),
            title.to_string(),
            optional_text(new_event.date.as_deref()),
            optional_text(new_event.location.as_deref()),
            parse_capacity(new_event.capacity.as_deref()),
        );

        let _guard = self.lock(Collection::Events).await;
        let mut events: Vec<Event> = self.load(Collection::Events).await?;
        events.push(event.clone());
        self.save(Collection::Events, &events).await?;

        info!(
            "Created event {} \"{}\" (capacity {})",
            event.id, event.title, event.capacity
        );
        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.load(Collection::Events).await
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>> {
        let events: Vec<Event> = self.load(Collection::Events).await?;
        Ok(events.into_iter().find(|e| e.id == event_id))
    }

    /// Add a volunteer to an event's attendee list.
    ///
    /// Checks run in a fixed order and the first failure wins: event exists,
    /// email given, volunteer exists, not already registered, room left.
    /// The events lock is held from the read through the write.
    pub async fn register_for_event(&self, event_id: &str, volunteer_email: &str) -> Result<Event> {
        let _guard = self.lock(Collection::Events).await;
        let mut events: Vec<Event> = self.load(Collection::Events).await?;

        let index = events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| StoreError::NotFound(format!("event {} not found", event_id)))?;

        let email = volunteer_email.trim();
        if email.is_empty() {
            return Err(StoreError::Validation("email is required".to_string()));
        }

        // Volunteers are append-only, so a snapshot read needs no lock
        let volunteer = self.find_volunteer_by_email(email).await?.ok_or_else(|| {
            StoreError::NotFound(format!("no volunteer with email {}", email))
        })?;

        let event = &mut events[index];
        if event.has_attendee(&volunteer.id) {
            return Err(StoreError::Conflict("already registered".to_string()));
        }
        if event.is_full() {
            return Err(StoreError::Conflict("event full".to_string()));
        }

        event.attendees.push(volunteer.id.clone());
        let updated = event.clone();
        self.save(Collection::Events, &events).await?;

        info!(
            "Registered volunteer {} for event {} (remaining {:?})",
            volunteer.id,
            updated.id,
            updated.remaining()
        );
        Ok(updated)
    }

    // Hours

    pub async fn log_hours(&self, entry: NewHoursEntry) -> Result<HoursEntry> {
        let email = entry.volunteer_email.trim();
        if email.is_empty() {
            return Err(StoreError::Validation("email is required".to_string()));
        }
        let hours = parse_hours(&entry.hours)?;

        let volunteer = self.find_volunteer_by_email(email).await?.ok_or_else(|| {
            StoreError::NotFound(format!("no volunteer with email {}", email))
        })?;

        let event_id = optional_text(entry.event_id.as_deref());
        let event_title = match &event_id {
            Some(id) => {
                let title = self.get_event(id).await?.map(|e| e.title);
                if title.is_none() {
                    debug!("Hours logged against unknown event {}", id);
                }
                title
            }
            None => None,
        };

        let record = HoursEntry {
            id: new_record_id(),
            volunteer_id: volunteer.id,
            volunteer_email: volunteer.email,
            event_id,
            event_title,
            hours,
            notes: entry.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
            created_at: Utc::now(),
        };

        let _guard = self.lock(Collection::Hours).await;
        let mut all_hours: Vec<HoursEntry> = self.load(Collection::Hours).await?;
        all_hours.push(record.clone());
        self.save(Collection::Hours, &all_hours).await?;

        info!(
            "Logged {} hours for {} (entry {})",
            record.hours, record.volunteer_email, record.id
        );
        Ok(record)
    }

    pub async fn list_hours(&self) -> Result<Vec<HoursEntry>> {
        self.load(Collection::Hours).await
    }

    // Startup

    /// Bring records written by the earlier single-file server up to the
    /// current layout: volunteers and events without an `id` get one, and a
    /// volunteer's single `name` is split into first and last name. Each
    /// changed collection is written back once, so assigned ids stay stable.
    /// Returns the number of records changed.
    pub async fn upgrade_legacy_records(&self) -> Result<usize> {
        let mut changed = 0;
        for collection in [Collection::Volunteers, Collection::Events] {
            let _guard = self.lock(collection).await;
            let mut records = self.backend.read_collection(collection).await?;

            let mut touched = 0;
            for (index, record) in records.iter_mut().enumerate() {
                let Value::Object(fields) = record else {
                    return Err(StoreError::Storage(format!(
                        "{} record {} is not a JSON object",
                        collection, index
                    )));
                };
                if upgrade_record(collection, fields) {
                    touched += 1;
                }
            }

            if touched > 0 {
                self.backend.replace_collection(collection, records).await?;
                info!("Upgraded {} legacy {} records", touched, collection);
            }
            changed += touched;
        }
        Ok(changed)
    }

    // Helpers

    async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        match collection {
            Collection::Volunteers => self.volunteers_lock.lock().await,
            Collection::Events => self.events_lock.lock().await,
            Collection::Hours => self.hours_lock.lock().await,
        }
    }

    async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        self.backend
            .read_collection(collection)
            .await?
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(StoreError::from))
            .collect()
    }

    async fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.backend.replace_collection(collection, values).await
    }
}

fn upgrade_record(collection: Collection, fields: &mut Map<String, Value>) -> bool {
    let mut touched = false;

    let has_id = matches!(fields.get("id"), Some(Value::String(id)) if !id.is_empty());
    if !has_id {
        fields.insert("id".to_string(), Value::String(new_record_id()));
        touched = true;
    }

    if collection == Collection::Volunteers
        && !fields.contains_key("firstName")
        && !fields.contains_key("lastName")
    {
        if let Some(Value::String(name)) = fields.get("name") {
            let (first, last) = split_full_name(name);
            fields.insert("firstName".to_string(), Value::String(first));
            fields.insert("lastName".to_string(), Value::String(last));
            touched = true;
        }
    }

    touched
}
