//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all tank operations, whatever the client.
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** to the appropriate command function
//! - **Applies defaults** the client configured once (the listing filter)
//! - **Records** one [`LogEntry`] per call on the configured [`LogSink`]
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal I/O**: No stdout or stderr
//! - **Status codes**: Errors keep their [`ErrorKind`](crate::error::ErrorKind)
//!
//! ## Generic Over DataStore
//!
//! `TankApi<S: DataStore>` is generic over the storage backend:
//! - Production: `TankApi<FileStore>`
//! - Testing: `TankApi<InMemoryStore>`

use crate::commands::{self, CmdMessage, CmdResult, ListFilter};
use crate::error::Result;
use crate::model::RawFish;
use crate::oplog::{LogEntry, LogSink, Operation};
use crate::store::DataStore;

pub struct TankApi<S: DataStore> {
    store: S,
    list_filter: ListFilter,
    sink: Option<Box<dyn LogSink>>,
}

impl<S: DataStore> TankApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            list_filter: ListFilter::default(),
            sink: None,
        }
    }

    pub fn with_log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Filter applied by [`TankApi::list_fish`].
    pub fn with_list_filter(mut self, filter: ListFilter) -> Self {
        self.list_filter = filter;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_fish(&self, input: RawFish) -> Result<CmdResult> {
        self.logged(Operation::Create, commands::create::run(&self.store, input))
    }

    pub fn list_fish(&self) -> Result<CmdResult> {
        self.logged(
            Operation::List,
            commands::list::run(&self.store, self.list_filter),
        )
    }

    pub fn get_fish(&self, name: &str) -> Result<CmdResult> {
        self.logged(Operation::Get, commands::get::run(&self.store, name))
    }

    pub fn update_fish(&self, input: RawFish) -> Result<CmdResult> {
        self.logged(Operation::Update, commands::update::run(&self.store, input))
    }

    pub fn delete_fish(&self, name: &str) -> Result<CmdResult> {
        self.logged(Operation::Delete, commands::delete::run(&self.store, name))
    }

    pub fn sweep(&self) -> Result<CmdResult> {
        self.logged(Operation::Sweep, commands::sweep::run(&self.store))
    }

    /// Touches no storage; only records that it was called.
    pub fn noop(&self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("noop called"));
        self.logged(Operation::Noop, Ok(result))
    }

    fn logged(&self, operation: Operation, result: Result<CmdResult>) -> Result<CmdResult> {
        if let Some(sink) = &self.sink {
            let outcome = match &result {
                Ok(res) if res.summary().is_empty() => "ok".to_string(),
                Ok(res) => format!("ok: {}", res.summary()),
                Err(e) => format!("error({}): {}", e.kind().as_str(), e),
            };
            sink.record(&LogEntry::now(operation, outcome));
        }
        result
    }
}
