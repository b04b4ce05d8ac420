//! Populate / Refresh Engine
//!
//! One pass over the entity source. Each entity is resolved on its own and
//! any failure is confined to that entity: a bad id skips it, a bad name
//! falls back to the sentinel, a bad age leaves the bracket unset.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::classification::{AgeBracket, Gender, Kind};
use super::entry::{EntityId, EntityRecord};
use super::store::{IndexSet, IndexStore};
use crate::domain::ports::{EntityHandle, EntitySource};
use crate::error::{Error, Result};

/// Outcome of one populate call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulateReport {
    /// Store was already ready; nothing was read
    pub skipped_ready: bool,
    /// Store was rebuilt from nothing
    pub forced: bool,
    /// Entities added to the store
    pub indexed: usize,
    /// Entities already present (or repeated in the source)
    pub skipped_existing: usize,
    /// Entities without a usable id
    pub skipped_invalid: usize,
    /// Entities stored under the sentinel name
    pub name_fallbacks: usize,
    /// Entities stored without an age bracket
    pub age_failures: usize,
}

impl IndexStore {
    /// Populate from `source`.
    ///
    /// - `force_refresh`: rebuild from nothing and swap the result in.
    /// - otherwise a ready store is left untouched, and a stale store is
    ///   extended with ids it does not hold yet.
    ///
    /// The store is marked ready only if this pass indexed at least one
    /// entity. Only a failure to enumerate the source is returned as an
    /// error; a forced pass that fails this way leaves the store cleared.
    pub fn populate<S>(&self, source: &S, force_refresh: bool) -> Result<PopulateReport>
    where
        S: EntitySource + ?Sized,
    {
        let _writer = self.lock_writer();
        let mut report = PopulateReport {
            forced: force_refresh,
            ..Default::default()
        };

        if !force_refresh && self.is_ready() {
            report.skipped_ready = true;
            return Ok(report);
        }

        let entities = match source.entities() {
            Ok(entities) => entities,
            Err(e) => {
                error!(error = %e, "Failed to enumerate entities");
                if force_refresh {
                    self.clear();
                }
                return Err(e);
            }
        };

        // A forced pass rebuilds from nothing; readers keep the old set
        // until the commit below.
        let mut next = if force_refresh {
            IndexSet::new()
        } else {
            (*self.snapshot()).clone()
        };
        for handle in &entities {
            let id = match resolve_id(handle) {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Skipping entity");
                    report.skipped_invalid += 1;
                    continue;
                }
            };
            if next.contains(id) {
                report.skipped_existing += 1;
                continue;
            }

            let record = build_record(id, handle, &mut report);
            next.insert(record);
            report.indexed += 1;
        }

        let ready = report.indexed > 0;
        let total = next.len();
        self.commit(next, ready);

        info!(
            indexed = report.indexed,
            skipped_existing = report.skipped_existing,
            skipped_invalid = report.skipped_invalid,
            total,
            ready,
            "Populated entity cache"
        );
        Ok(report)
    }
}

fn resolve_id<H: EntityHandle>(handle: &H) -> Result<EntityId> {
    match handle.id() {
        Some(id) if id != 0 => Ok(id),
        _ => Err(Error::MissingId),
    }
}

fn resolve_name<H: EntityHandle>(id: EntityId, handle: &H) -> Result<EntityRecord> {
    let first = handle.first_name().map_err(|e| Error::NameUnavailable {
        entity_id: id,
        reason: e.to_string(),
    })?;
    let last = handle.last_name().map_err(|e| Error::NameUnavailable {
        entity_id: id,
        reason: e.to_string(),
    })?;
    Ok(EntityRecord::new(id, &first, &last))
}

fn resolve_age<H: EntityHandle>(id: EntityId, handle: &H) -> Result<AgeBracket> {
    handle.age_bracket().map_err(|e| Error::AgeUnavailable {
        entity_id: id,
        reason: e.to_string(),
    })
}

fn build_record<H: EntityHandle>(
    id: EntityId,
    handle: &H,
    report: &mut PopulateReport,
) -> EntityRecord {
    let mut record = resolve_name(id, handle).unwrap_or_else(|e| {
        warn!(entity_id = id, error = %e, "Using fallback name");
        report.name_fallbacks += 1;
        EntityRecord::unnamed(id)
    });

    record.gender = if handle.is_female() {
        Some(Gender::Female)
    } else if handle.is_male() {
        Some(Gender::Male)
    } else {
        None
    };

    record.kinds = Kind::ALL
        .into_iter()
        .filter(|&kind| handle.has_kind(kind))
        .collect();

    match resolve_age(id, handle) {
        Ok(age) => record.age = Some(age),
        Err(e) => {
            warn!(entity_id = id, error = %e, "Leaving age unset");
            report.age_failures += 1;
        }
    }

    debug!(entity_id = id, name = %record.name, "Indexed entity");
    record
}

// =============================================================================
// Tests
// =============================================================================
