use persist::errors::{ErrorKind, PersistError, PersistResult};
use persist::store::memory::InMemoryStoreConfig;
use persist::Database;
use std::backtrace::Backtrace;
use std::time::Instant;

/// Runs `test` between `before` and `after`, reporting the failing phase.
///
/// `after` also runs when the test returns an error. Panics inside any phase
/// are caught and reported together with a backtrace.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> PersistResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> PersistResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> PersistResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => match after(ctx) {
                    Ok(_) => Ok(()),
                    Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
                },
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let elapsed = start_time.elapsed();
    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Took {:?}", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed. Error: {}", error);
}

#[derive(Clone)]
pub struct TestContext {
    db: Database,
}

impl TestContext {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

pub fn create_test_context() -> PersistResult<TestContext> {
    let db = Database::builder()
        .in_memory(InMemoryStoreConfig::new())
        .open()?;
    log::debug!("Test database opened: {}", db.store().store_version()?);
    Ok(TestContext::new(db))
}

pub fn create_read_only_test_context() -> PersistResult<TestContext> {
    let db = Database::builder()
        .in_memory(InMemoryStoreConfig::new().with_read_only(true))
        .open()?;
    Ok(TestContext::new(db))
}

pub fn cleanup(ctx: TestContext) -> PersistResult<()> {
    ctx.db().close()
}

/// Turns a failed assertion on an error result into a test error.
pub fn expect_error_kind<T>(result: PersistResult<T>, kind: ErrorKind) -> PersistResult<PersistError> {
    match result {
        Ok(_) => Err(PersistError::new(
            &format!("Expected a {} error, got success", kind),
            ErrorKind::InternalError,
        )),
        Err(e) if e.kind() == &kind => Ok(e),
        Err(e) => Err(PersistError::new_with_cause(
            &format!("Expected a {} error", kind),
            ErrorKind::InternalError,
            e,
        )),
    }
}
