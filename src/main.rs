use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

use filewarden::policy::{AuditLogger, PolicyEngine, SnapshotData};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let snapshot_path = std::env::var("WARDEN_SNAPSHOT").unwrap_or_else(|_| "policy.json".to_string());
    let audit_path = std::env::var("WARDEN_AUDIT_LOG").unwrap_or_else(|_| "audit.jsonl".to_string());
    info!(
        target: "filewarden",
        "filewarden starting: RUST_LOG='{}', snapshot='{}', audit_log='{}'",
        rust_log, snapshot_path, audit_path
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [user, operation, path] = args.as_slice() else {
        eprintln!("usage: filewarden <user> <operation> <path>");
        std::process::exit(2);
    };

    let raw = std::fs::read_to_string(&snapshot_path)
        .map_err(|e| anyhow::anyhow!("read {}: {}", snapshot_path, e))?;
    let data = SnapshotData::from_json(&raw)?;

    let mut engine = PolicyEngine::new(data, AuditLogger::to_file(&audit_path));
    let decision = engine.authorize(user, operation, path);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    engine.shutdown().await;

    std::process::exit(if decision.granted { 0 } else { 1 });
}
