//! End-to-end ingestion: files dropped into a watched directory end up in the
//! store exactly once, with their reports written alongside.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::oneshot;
use tsvwatch_core::DocumentStore;
use tsvwatch_ingest::{ChannelTicker, CycleConfig, IngestionCycle, Scheduler, SchedulerState};
use tsvwatch_store::InMemoryDocumentStore;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const HEADERS: &str = "N\tMQQT\tINVID\tUNIT_GUID\tMSG_ID\tTEXT\tCONTEXT\tCLASS\tLEVEL\tAREA\tADDR\tBLOCK\tTYPE\tBIT\tINVERT_BIT\n\
                       num\tstr\tstr\tstr\tstr\tstr\tstr\tstr\tnum\tstr\tstr\tstr\tstr\tnum\tnum\n";

fn drop_file(dir: &Path, name: &str, rows: &[&str]) -> std::io::Result<()> {
    let mut body = HEADERS.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(dir.join(name), body)
}

async fn wait_for_len(store: &InMemoryDocumentStore, want: usize) -> usize {
    for _ in 0..400 {
        let len = store.len().await;
        if len >= want {
            return len;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    store.len().await
}

#[tokio::test]
async fn test_scheduled_pipeline_ingests_each_file_once() -> TestResult {
    let root = TempDir::new()?;
    let source = root.path().join("files");
    let output = root.path().join("processed");
    fs::create_dir(&source)?;
    fs::create_dir(&output)?;

    drop_file(
        &source,
        "first.tsv",
        &[
            "1\tmq\tinv\tguid-1\tm1\tDoor open\tctx\talarm\t2\tnorth\t0x10\tB1\tbool\t3\t0",
            "x\tmq\tinv\tguid-2\tm2\tDoor shut\tctx\talarm\t1\tnorth\t0x11\tB1\tbool\t4\t1",
        ],
    )?;
    fs::write(source.join("notes.txt"), "ignored")?;

    let store = InMemoryDocumentStore::new();
    let config = CycleConfig {
        source_dir: source.clone(),
        output_dir: output.clone(),
        store_timeout: Duration::from_secs(1),
    };
    let cycle = IngestionCycle::new(config, Arc::new(store.clone()));
    let (ticks, ticker) = ChannelTicker::new();
    let scheduler = Scheduler::new(cycle, ticker);
    let state = scheduler.state_handle();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(scheduler.run(async {
        let _ = stop_rx.await;
    }));

    assert!(ticks.fire());
    assert_eq!(wait_for_len(&store, 1).await, 1);

    drop_file(&source, "second.tsv", &["7\ta\tb\tc\td\te\tf\tg\th\ti"])?;
    assert!(ticks.fire());
    assert_eq!(wait_for_len(&store, 2).await, 2);

    // nothing new: another tick leaves the store alone
    assert!(ticks.fire());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.len().await, 2);

    let _ = stop_tx.send(());
    handle.await?;
    assert_eq!(*state.read().await, SchedulerState::Stopped);

    let documents = store.list_documents(0, 10).await?;
    let first = documents.iter().find(|d| d.id == "first.tsv");
    assert!(first.is_some_and(|d| d.records.len() == 2
        && d.errors == vec!["line 4: field \"n\" must be an integer"]));
    let second = documents.iter().find(|d| d.id == "second.tsv");
    assert!(second.is_some_and(|d| d.errors
        == vec![
            "line 3: invalid number of columns: 10 (must be 15)",
            "line 3: field \"level\" must be an integer",
        ]));

    for report in ["first.tsv.txt", "first.tsv.pdf", "second.tsv.txt", "second.tsv.pdf"] {
        assert!(output.join(report).exists(), "{report} missing");
    }
    assert!(!output.join("notes.txt.txt").exists());
    Ok(())
}
