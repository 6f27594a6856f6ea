// ==========================================
// 工业固废交换 - 性能观测
// ==========================================
// 职责: 单次引擎调用的耗时 + SQL 语句计数 + 慢 SQL 日志
// 开关:
// - `SYMBIO_EXCHANGE_PERF_SQL=1` 开启 SQL 计数（Debug 默认开启）
// - `SYMBIO_EXCHANGE_SLOW_SQL_MS=50` 慢 SQL 阈值（毫秒）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const PERF_SQL_ENV: &str = "SYMBIO_EXCHANGE_PERF_SQL";
pub const SLOW_SQL_MS_ENV: &str = "SYMBIO_EXCHANGE_SLOW_SQL_MS";

static SQL_TRACING_ON: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

// SQL 计数按线程累计：一次引擎调用只在一个线程内完成
thread_local! {
    static OPEN_GUARDS: Cell<u32> = Cell::new(0);
    static STATEMENTS: Cell<u64> = Cell::new(0);
    static SLOW_STATEMENTS: Cell<u64> = Cell::new(0);
}

/// 解析布尔型环境变量
fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    Some(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    ))
}

/// 在连接上挂载 trace/profile 回调
///
/// 说明: 关闭时显式移除回调，避免复用连接残留旧回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = env_flag(PERF_SQL_ENV).unwrap_or(cfg!(debug_assertions));
    SQL_TRACING_ON.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    let default_ms = if cfg!(debug_assertions) { 50 } else { 200 };
    let slow_ms = std::env::var(SLOW_SQL_MS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default_ms);
    SLOW_SQL_MS.store(slow_ms, Ordering::Relaxed);

    conn.trace(Some(on_statement));
    conn.profile(Some(on_statement_done));
}

fn guard_open() -> bool {
    OPEN_GUARDS.with(|g| g.get() > 0)
}

fn on_statement(_sql: &str) {
    if SQL_TRACING_ON.load(Ordering::Relaxed) && guard_open() {
        STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

fn on_statement_done(sql: &str, elapsed: Duration) {
    if !SQL_TRACING_ON.load(Ordering::Relaxed) {
        return;
    }
    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    let ms = elapsed.as_millis() as u64;
    if threshold == 0 || ms < threshold {
        return;
    }

    let mut one_line = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.len() > 400 {
        let mut cut = 400;
        while !one_line.is_char_boundary(cut) {
            cut -= 1;
        }
        one_line.truncate(cut);
        one_line.push('…');
    }
    tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %one_line, "slow sql");

    if guard_open() {
        SLOW_STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 单次操作的性能统计 Guard
///
/// drop 时输出 `op / elapsed_ms / sql_count / slow_sql_count`（target = "perf"）
///
/// ```ignore
/// let _perf = symbio_exchange::perf::PerfGuard::new("match_buyers");
/// ```
pub struct PerfGuard {
    op: &'static str,
    started: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        OPEN_GUARDS.with(|g| g.set(g.get().saturating_add(1)));
        Self {
            op,
            started: Instant::now(),
            statements_at_start: STATEMENTS.with(|c| c.get()),
            slow_at_start: SLOW_STATEMENTS.with(|c| c.get()),
        }
    }

    /// 到目前为止本 Guard 观测到的 SQL 语句数
    pub fn sql_count(&self) -> u64 {
        STATEMENTS.with(|c| c.get()).saturating_sub(self.statements_at_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let sql_count = self.sql_count();
        let slow_sql_count = SLOW_STATEMENTS
            .with(|c| c.get())
            .saturating_sub(self.slow_at_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            sql_count,
            slow_sql_count,
            "done"
        );

        OPEN_GUARDS.with(|g| g.set(g.get().saturating_sub(1)));
    }
}
