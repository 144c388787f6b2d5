//! Single-slot repositories for the weekly, monthly and yearly records.
//!
//! # Invariants
//! - Each record type owns exactly one storage key.
//! - Absent or undecodable payloads load as the type's initial record; the
//!   initial record is not written until it is first changed.

use crate::model::monthly::MonthlyRecord;
use crate::model::weekly::WeeklyRecord;
use crate::model::yearly::YearlyRecord;
use crate::store::codec::{decode_record, encode_record, StoredRecord};
use crate::store::{RecordStore, StoreError, StoreResult};
use chrono::NaiveDate;
use log::warn;
use std::marker::PhantomData;

/// A record with one global storage slot.
pub trait GlobalRecord: StoredRecord + Clone {
    /// Durable storage key; must never change.
    const STORAGE_KEY: &'static str;
    /// Short name used in log events.
    const KIND: &'static str;

    /// Record used when nothing usable is stored.
    fn initial(today: NaiveDate) -> Self;
}

impl GlobalRecord for WeeklyRecord {
    const STORAGE_KEY: &'static str = "planner_weekly";
    const KIND: &'static str = "weekly";

    fn initial(_today: NaiveDate) -> Self {
        Self::default()
    }
}

impl GlobalRecord for MonthlyRecord {
    const STORAGE_KEY: &'static str = "planner_monthly";
    const KIND: &'static str = "monthly";

    fn initial(today: NaiveDate) -> Self {
        Self::for_date(today)
    }
}

impl GlobalRecord for YearlyRecord {
    const STORAGE_KEY: &'static str = "planner_yearly";
    const KIND: &'static str = "yearly";

    fn initial(today: NaiveDate) -> Self {
        Self::for_date(today)
    }
}

pub struct GlobalRecordRepository<'s, S: RecordStore + ?Sized, R: GlobalRecord> {
    store: &'s S,
    _record: PhantomData<R>,
}

impl<'s, S: RecordStore + ?Sized, R: GlobalRecord> GlobalRecordRepository<'s, S, R> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Loads the stored record or builds the initial one for `today`.
    pub fn load_or_init(&self, today: NaiveDate) -> R {
        let raw = match self.store.get(R::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return R::initial(today),
            Err(err) => {
                warn!(
                    "event=record_load module=repo status=fallback kind={} reason=read_failed error={}",
                    R::KIND,
                    err
                );
                return R::initial(today);
            }
        };

        decode_record::<R>(&raw).unwrap_or_else(|err| {
            warn!(
                "event=record_load module=repo status=fallback kind={} reason=decode_failed error={}",
                R::KIND,
                err
            );
            R::initial(today)
        })
    }

    pub fn save(&self, record: &R) -> StoreResult<()> {
        let raw = encode_record(record).map_err(StoreError::Encode)?;
        self.store.set(R::STORAGE_KEY, &raw)
    }
}
