use serde::{Deserialize, Serialize};

use super::record::NotificationRecord;
use crate::ids::NotificationId;

/// In-memory notification inbox, newest first.
///
/// 内存中的通知收件箱，按接收时间倒序排列。
///
/// The inbox is session-scoped: it is rebuilt from the backend on each
/// bootstrap and dropped on logout. All mutation goes through the
/// synchronizer, which owns the lock around this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInbox {
    records: Vec<NotificationRecord>,
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly delivered record at the top of the inbox.
    pub fn append(&mut self, record: NotificationRecord) {
        self.records.insert(0, record);
    }

    /// Insert only when no record with the same id exists yet.
    ///
    /// Returns `true` when the record was inserted. Used for delivery paths
    /// that can observe a message the foreground handler already stored.
    pub fn append_if_absent(&mut self, record: NotificationRecord) -> bool {
        if self.contains(&record.id) {
            return false;
        }
        self.append(record);
        true
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.records.iter().any(|record| record.id == *id)
    }

    /// Returns `true` when a record with this id existed and was marked.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.records.iter_mut().find(|record| record.id == *id) {
            Some(record) => {
                record.mark_read();
                true
            }
            None => false,
        }
    }

    /// Marks every unread record, returning how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for record in self.records.iter_mut().filter(|record| !record.read) {
            record.mark_read();
            changed += 1;
        }
        changed
    }

    /// Replace the whole inbox with the backend's canonical list.
    ///
    /// The server view wins: local-only records are dropped and read state
    /// is taken from the canonical records. Ordering is re-established here
    /// rather than trusted from the wire.
    pub fn reconcile(&mut self, mut canonical: Vec<NotificationRecord>) {
        canonical.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        self.records = canonical;
    }

    /// Drop every record. Called when the session ends so the next
    /// customer never sees the previous one's inbox.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|record| !record.read).count()
    }

    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
