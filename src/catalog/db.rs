use redb::{Database as RedbDatabase, ReadTransaction, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::OBJECTS;

/// File name of the catalog database inside `DATA_DIR`.
pub const DB_FILE: &str = "storage-events.redb";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Catalog commit failed: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Catalog database could not be opened: {0}")]
    Open(Box<redb::DatabaseError>),
    #[error("Corrupt catalog record: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Catalog directory error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog record could not be encoded: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Catalog storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Catalog table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Catalog transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

// redb's error types are large, so they are boxed on the way in.
macro_rules! boxed_redb_error {
    ($($source:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<redb::$source> for DatabaseError {
                fn from(e: redb::$source) -> Self {
                    DatabaseError::$variant(Box::new(e))
                }
            }
        )*
    };
}

boxed_redb_error! {
    CommitError => Commit,
    DatabaseError => Open,
    StorageError => Storage,
    TableError => Table,
    TransactionError => Transaction,
}

/// Object catalog backed by an embedded redb database.
#[derive(Clone)]
pub struct Catalog {
    db: Arc<RedbDatabase>,
}

impl Catalog {
    /// Open the catalog in `data_dir`, creating the directory, the database
    /// file and the objects table as needed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;
        let db = RedbDatabase::create(data_dir.join(DB_FILE))?;

        let write_txn = db.begin_write()?;
        write_txn.open_table(OBJECTS)?;
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }
}
